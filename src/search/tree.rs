use crate::board::grid::CellGrid;
use crate::game::logic::GameLogic;
use crate::pieces::PlayerType;
use crate::pieces::PlayerType::{PlayerA, PlayerB};
use crate::play::Movement;
use crate::search::eval::score;
use log::trace;
use std::cmp::Ordering;

/// Index of a node within its [`SearchTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(usize);

/// A position in the search tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub grid: CellGrid,
    /// The player to move from this position.
    pub player: PlayerType,
    /// The movement that led here from the parent; `None` at the root.
    pub movement: Option<Movement>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Score from PlayerA's point of view (higher is better for PlayerA).
    pub score: f64
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a king or laser has been destroyed, ie, the game is over at this position.
    fn is_decisive(&self) -> bool {
        [PlayerA, PlayerB].iter().any(|p| !(self.grid.has_king(*p) && self.grid.has_laser(*p)))
    }
}

/// Pick the child with the best score for `player`: the highest for PlayerA, the lowest for
/// PlayerB. Ties go to the earliest child.
fn best_by_score(scores: impl Iterator<Item=(NodeId, f64)>, player: PlayerType) -> Option<(NodeId, f64)> {
    scores.reduce(|best, candidate| {
        let ordering = candidate.1.total_cmp(&best.1);
        let better = match player {
            PlayerA => ordering == Ordering::Greater,
            PlayerB => ordering == Ordering::Less
        };
        if better { candidate } else { best }
    })
}

/// A game tree grown one leaf at a time. Nodes live in an arena and refer to each other by
/// [`NodeId`]; the root is always the first node.
#[derive(Clone, Debug)]
pub struct SearchTree {
    logic: GameLogic,
    nodes: Vec<Node>,
    /// The player whose optimism is added to backed-up scores.
    bias_player: PlayerType,
    /// Whether expansion also tries quarter turns.
    rotations: bool
}

impl SearchTree {

    /// Create a tree containing only the root position, with `player` to move. The tree is
    /// biased towards `player` and expands steps and swaps only.
    pub fn new(logic: GameLogic, grid: CellGrid, player: PlayerType) -> Self {
        let root = Node {
            grid,
            player,
            movement: None,
            parent: None,
            children: vec![],
            score: score(&grid)
        };
        Self { logic, nodes: vec![root], bias_player: player, rotations: false }
    }

    /// Also expand the quarter turns of pieces whose orientation affects the beam.
    pub fn with_rotations(mut self, rotations: bool) -> Self {
        self.rotations = rotations;
        self
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child for every step and swap available to the node's player, piece by piece (and
    /// rotations too, if enabled). Each child's board is the result of the full turn: the
    /// movement, then the mover's laser firing. Returns the number of children added, which is
    /// zero for decisive positions, positions without any legal movement and nodes that have
    /// already been expanded.
    pub fn expand(&mut self, id: NodeId) -> usize {
        let node = &self.nodes[id.0];
        if !node.is_leaf() || node.is_decisive() {
            return 0
        }
        let (grid, player) = (node.grid, node.player);
        let movements = if self.rotations {
            self.logic.all_legal_moves(player, &grid)
        } else {
            self.logic.legal_moves(player, &grid)
        };
        let mut children = Vec::with_capacity(movements.len());
        for movement in movements {
            let turn = self.logic.resolve_turn(movement, player, &grid);
            let child = NodeId(self.nodes.len());
            self.nodes.push(Node {
                grid: turn.grid,
                player: player.other(),
                movement: Some(movement),
                parent: Some(id),
                children: vec![],
                score: score(&turn.grid)
            });
            children.push(child);
        }
        trace!("Expanded node {} ({player:?} to move) into {} children", id.0, children.len());
        let n_children = children.len();
        self.nodes[id.0].children = children;
        n_children
    }

    /// Back up scores from the given node to the root. Each node on the way takes the best of
    /// its children's scores for the player moving there. If every child is at least as good
    /// for the bias player as the node's previous score, the score is nudged further in the
    /// mover's favour by half the fraction of children that strictly improved on it.
    pub fn update_score(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if !node.is_leaf() {
                let prior = node.score;
                let scores: Vec<f64> = node.children.iter().map(|c| self.nodes[c.0].score).collect();
                let bias = self.bias(prior, &scores);
                let new_score = match node.player {
                    PlayerA => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max) + bias,
                    PlayerB => scores.iter().copied().fold(f64::INFINITY, f64::min) - bias
                };
                self.nodes[id.0].score = new_score;
            }
            current = self.nodes[id.0].parent;
        }
    }

    fn bias(&self, prior: f64, scores: &[f64]) -> f64 {
        let (all_hold, improving) = match self.bias_player {
            PlayerA => (
                scores.iter().all(|s| *s >= prior),
                scores.iter().filter(|s| **s > prior).count()
            ),
            PlayerB => (
                scores.iter().all(|s| *s <= prior),
                scores.iter().filter(|s| **s < prior).count()
            )
        };
        if all_hold && !scores.is_empty() {
            0.5 * improving as f64 / scores.len() as f64
        } else {
            0.0
        }
    }

    /// Follow the best child for the mover at each level, starting from the given node, until a
    /// leaf is reached.
    pub fn minimum_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let node = &self.nodes[current.0];
            let children = node.children.iter().map(|c| (*c, self.nodes[c.0].score));
            match best_by_score(children, node.player) {
                Some((child, _)) => current = child,
                None => return current
            }
        }
    }

    /// The root child that is best for the player to move at the root, if the root has any
    /// children.
    pub fn best_child(&self) -> Option<NodeId> {
        let root = self.node(self.root());
        let children = root.children.iter().map(|c| (*c, self.nodes[c.0].score));
        best_by_score(children, root.player).map(|(child, _)| child)
    }

    /// Whether the game is already decided at the given node.
    pub fn is_decisive(&self, id: NodeId) -> bool {
        self.node(id).is_decisive()
    }
}
