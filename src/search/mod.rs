//! Best-first game-tree search used to pick a movement for a computer player.
//!
//! The tree is grown one leaf at a time. From the root, the search repeatedly follows the most
//! promising line for whoever is to move at each level down to a leaf, expands that leaf by
//! playing out every available movement (including the mover's laser shot), scores the
//! resulting boards by material, and backs the scores up to the root. Once the evaluation
//! budget is spent, the best movement at the root is returned.

pub mod eval;
pub mod tree;

use crate::board::grid::CellGrid;
use crate::error::ConfigError;
use crate::game::logic::GameLogic;
use crate::pieces::PlayerType;
use crate::play::Movement;
use crate::search::eval::LOSS_SCORE;
use crate::search::tree::SearchTree;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default number of positions evaluated per search.
pub const DEFAULT_EVALUATION_BUDGET: usize = 1000;

/// Settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// The search stops once this many positions have been evaluated.
    pub evaluation_budget: usize,
    /// Whether the search also tries quarter turns. Off by default: only steps and swaps are
    /// searched.
    pub search_rotations: bool
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { evaluation_budget: DEFAULT_EVALUATION_BUDGET, search_rotations: false }
    }
}

impl SearchConfig {

    pub fn new(evaluation_budget: usize) -> Result<Self, ConfigError> {
        let config = Self { evaluation_budget, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// The same config, with rotation search switched on or off.
    pub fn with_rotations(self, search_rotations: bool) -> Self {
        Self { search_rotations, ..self }
    }

    /// Load a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluation_budget == 0 {
            return Err(ConfigError::ZeroBudget)
        }
        Ok(())
    }
}

/// Choose a movement for `player` on the given board. Returns `None` if the player has no
/// movement available (or the game is already decided).
pub fn compute_move(
    logic: &GameLogic,
    grid: &CellGrid,
    player: PlayerType,
    config: &SearchConfig
) -> Option<Movement> {
    compute_move_cancellable(logic, grid, player, config, &AtomicBool::new(false))
}

/// As [`compute_move`], but stops early once `cancel` is set, returning the best movement
/// found so far.
pub fn compute_move_cancellable(
    logic: &GameLogic,
    grid: &CellGrid,
    player: PlayerType,
    config: &SearchConfig,
    cancel: &AtomicBool
) -> Option<Movement> {
    let mut tree = SearchTree::new(*logic, *grid, player).with_rotations(config.search_rotations);
    let root = tree.root();
    let mut evaluations = tree.expand(root);
    tree.update_score(root);

    while evaluations < config.evaluation_budget {
        if cancel.load(Ordering::Relaxed) {
            debug!("Search cancelled after {evaluations} evaluations");
            break
        }
        let leaf = tree.minimum_leaf(root);
        if tree.node(leaf).score == LOSS_SCORE || tree.is_decisive(leaf) {
            break
        }
        let n_children = tree.expand(leaf);
        if n_children == 0 {
            break
        }
        evaluations += n_children;
        tree.update_score(leaf);
    }

    let best = tree.best_child().and_then(|child| tree.node(child).movement);
    debug!(
        "Search for {player:?}: {evaluations} evaluations, {} nodes, root score {:.3}, best {}",
        tree.len(),
        tree.node(root).score,
        best.map(|m| m.to_string()).unwrap_or_else(|| String::from("none"))
    );
    best
}
