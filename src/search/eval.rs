//! Material evaluation of a board.

use crate::board::grid::CellGrid;
use crate::pieces::PieceType::{Defender, Deflector, King, Laser, Switch};
use crate::pieces::PlayerType::{PlayerA, PlayerB};
use crate::pieces::{PieceType, PlayerType};

/// Score given to a player whose king has been destroyed.
pub const LOSS_SCORE: f64 = -1000.0;

/// Material value of a piece. The king is not counted: losing it loses the game.
pub fn piece_value(piece_type: PieceType) -> f64 {
    match piece_type {
        Defender => 2.0,
        Deflector => 1.0,
        Switch | Laser | King => 0.0
    }
}

/// Total material value of the given player's pieces, or [`LOSS_SCORE`] if their king is gone.
pub fn evaluate(player: PlayerType, grid: &CellGrid) -> f64 {
    if !grid.has_king(player) {
        return LOSS_SCORE
    }
    grid.iter_pieces(player)
        .map(|placed| piece_value(placed.piece.piece_type))
        .sum()
}

/// Score of a board from PlayerA's point of view: PlayerA's material minus PlayerB's.
pub fn score(grid: &CellGrid) -> f64 {
    evaluate(PlayerA, grid) - evaluate(PlayerB, grid)
}
