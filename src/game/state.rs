use crate::board::grid::CellGrid;
use crate::error::ParseError;
use crate::game::GameStatus;
use crate::game::GameStatus::Ongoing;
use crate::notation;
use crate::pieces::PlayerType;

/// This struct contains all state that changes over the course of a game. It is `Copy`, so
/// resolving a turn produces a new state and leaves the old one untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Current placement of the pieces.
    pub grid: CellGrid,
    /// The player whose turn it is.
    pub side_to_play: PlayerType,
    /// Current status of the game.
    pub status: GameStatus,
    /// Number of turns that have been taken by either player.
    pub turn: usize
}

impl GameState {
    /// Create the state at the start of a game from setup notation. The placement rules (lasers
    /// on their slots, no piece on a cell reserved for the other player) are enforced.
    pub fn new(notation: &str, side_to_play: PlayerType) -> Result<Self, ParseError> {
        Ok(Self {
            grid: notation::parse_setup(notation)?,
            side_to_play,
            status: Ongoing,
            turn: 0
        })
    }
}
