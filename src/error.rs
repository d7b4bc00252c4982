use crate::location::{Direction, Location};
use crate::pieces::{Orientation, PieceType, PlayerType};
use thiserror::Error;

/// Errors that may be encountered when parsing a string (setup notation, locations or
/// movements).
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Setup notation may not contain any whitespace.
    #[error("notation contains whitespace")]
    Whitespace,
    /// Setup notation did not contain exactly eight rows. The given `usize` is the actual count.
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    /// Encountered an unexpected character in a string.
    #[error("unexpected character {0:?}")]
    BadChar(char),
    /// A row of setup notation did not describe exactly ten columns.
    #[error("row {row} describes {len} columns, expected 10")]
    BadRowLen { row: usize, len: usize },
    /// A `+` did not follow a piece letter.
    #[error("rotation marker in row {row} does not follow a piece")]
    DanglingRotation { row: usize },
    /// A piece was given more than three `+` markers.
    #[error("more than three rotation markers on a piece in row {row}")]
    TooManyRotations { row: usize },
    /// A piece was placed on a cell reserved for the other player.
    #[error("piece placed on {location}, which is reserved for the other player")]
    ReservedCell { location: Location },
    /// The given player has no laser on their laser slot.
    #[error("no laser on the laser slot of {0:?}")]
    MissingLaser(PlayerType),
    /// A laser was placed somewhere other than its owner's laser slot.
    #[error("laser placed on {location}, which is not its owner's laser slot")]
    MisplacedLaser { location: Location },
    /// Tried to parse a string which is not a valid algebraic location.
    #[error("invalid location {0:?}")]
    BadLocation(String),
    /// A column and row pair that lies off the board.
    #[error("column {col}, row {row} is off the board")]
    OffBoard { col: u8, row: u8 },
    /// Tried to parse a string which is not a valid movement.
    #[error("invalid movement {0:?}")]
    BadMovement(String),
    /// Tried to parse an empty string.
    #[error("empty string")]
    EmptyString,
}

/// Errors raised while loading a reflection table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("malformed reflection table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported reflection table version {0}")]
    UnsupportedVersion(u32),
    #[error("duplicate entry for {direction:?} / {piece_type:?} / {orientation:?}")]
    Duplicate { direction: Direction, piece_type: PieceType, orientation: Orientation },
    #[error("no entry for {direction:?} / {piece_type:?} / {orientation:?}")]
    Missing { direction: Direction, piece_type: PieceType, orientation: Orientation },
    #[error("unknown beam effect {0:?}")]
    BadEffect(String),
}

/// Errors raised while loading a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed search config: {0}")]
    Json(#[from] serde_json::Error),
    /// The evaluation budget must allow at least one expansion.
    #[error("evaluation budget must be greater than zero")]
    ZeroBudget,
}

/// Different ways a [`Movement`](crate::play::Movement) can be refused by a [`Game`](crate::game::Game).
#[derive(Error, Debug, Eq, PartialEq)]
pub enum PlayInvalid {
    /// The piece being moved does not belong to the player whose turn it is.
    #[error("piece belongs to the other player")]
    WrongPlayer,
    /// There is no piece to move at the given location.
    #[error("no piece at source location")]
    NoPiece,
    /// The movement is not legal on the current board.
    #[error("movement is not legal")]
    IllegalMovement,
    /// Game is already over.
    #[error("game is already over")]
    GameOver,
}
