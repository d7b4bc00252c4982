pub mod logic;
pub mod state;

use crate::error::{ParseError, PlayInvalid};
use crate::game::logic::GameLogic;
use crate::game::state::GameState;
use crate::laser::LaserPath;
use crate::location::Location;
use crate::pieces::PieceType::Laser;
use crate::pieces::{PlacedPiece, PlayerType};
use crate::play::{Movement, MovementIterator};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// The reason why a game has been won.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinReason {
    /// The other player's king has been destroyed by a laser (possibly its own).
    KingKilled,
    /// The other player's laser has been destroyed.
    LaserKilled
}

/// The reason why a game has been drawn.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawReason {
    /// Player has no legal movements available.
    NoPlays
}

/// The outcome of a single game.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOutcome {
    /// Game has been won by the specified player.
    Win(WinReason, PlayerType),
    /// Game has ended in a draw.
    Draw(DrawReason)
}

/// The current status of the game.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// Game is still ongoing.
    Ongoing,
    /// Game is over, with the given outcome.
    Over(GameOutcome)
}

/// Everything a single turn did: the movement made, the beam fired afterwards and the piece it
/// destroyed, if any. This is what a presentation layer needs to animate the turn.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TurnEffects {
    pub movement: Movement,
    pub laser_path: LaserPath,
    pub killed: Option<PlacedPiece>,
    /// The outcome of the game, if the turn has brought it to an end.
    pub game_outcome: Option<GameOutcome>
}

/// A struct representing a single game, including all state and the rules needed to play.
#[derive(Clone, Debug)]
pub struct Game {
    pub logic: GameLogic,
    pub state: GameState
}

impl Game {

    /// Create a new [`Game`] from setup notation, with the given player to move first.
    pub fn new(starting_board: &str, starting_side: PlayerType) -> Result<Self, ParseError> {
        let state = GameState::new(starting_board, starting_side)?;
        Ok(Self { logic: GameLogic::new(), state })
    }

    /// Actually "do" a play: check validity, apply the movement, fire the mover's laser, remove
    /// the piece it kills, switch the side to play and return a description of what happened.
    pub fn do_play(&mut self, movement: Movement) -> Result<TurnEffects, PlayInvalid> {
        let player = self.state.side_to_play;
        let (state, effects): (GameState, TurnEffects) = self.logic.do_play(movement, self.state)?.into();
        self.state = state;
        debug!("Turn {}: {player:?} plays {}", self.state.turn, effects.movement);
        if let Some(killed) = effects.killed {
            if killed.piece.piece_type == Laser {
                warn!("{:?} has lost its laser on {}", killed.piece.player, killed.location);
            } else {
                debug!("Laser destroys {:?} on {}", killed.piece.piece_type, killed.location);
            }
        }
        if let Some(outcome) = effects.game_outcome {
            info!("Game over after {} turns: {outcome:?}", self.state.turn);
        }
        Ok(effects)
    }

    /// Iterate over the steps and swaps that can be made by the piece at the given location.
    /// Order of iteration is not guaranteed.
    pub fn iter_moves(&self, location: Location) -> MovementIterator {
        self.logic.iter_moves(location, &self.state.grid)
    }

    /// Every movement available to the player whose turn it is.
    pub fn legal_moves(&self) -> Vec<Movement> {
        self.logic.all_legal_moves(self.state.side_to_play, &self.state.grid)
    }
}
