//! This crate implements the rules of laser chess, a two-player strategy game played on a 10x8
//! board. Players move and rotate mirrored pieces, and at the end of each turn the mover's laser
//! fires. The beam travels through the board, is deflected by mirrors, and destroys the first
//! piece it strikes on an unprotected side. A player wins when the other player's king or laser
//! is destroyed.
//!
//! The crate provides the game data and logic (board setup notation, movement rules, laser
//! simulation) and a search that picks movements for a computer player. It does not provide any
//! user interface.
//!
//! # Getting started
//!
//! - [`game::logic::GameLogic`]: Holds the board geometry and the table describing how a beam
//!   interacts with each piece, and implements the logic required to check, apply and resolve
//!   movements. It does not keep the current piece placement; its methods take a reference to a
//!   [`board::grid::CellGrid`] as necessary.
//! - [`game::state::GameState`]: The data that changes over a game: the grid, the player to
//!   move, the game status and the turn count. It is `Copy`.
//! - [`game::Game`]: A `GameLogic` together with a `GameState`, with a single
//!   [`game::Game::do_play`] method that resolves a full turn. A helpful struct when building a
//!   game client.
//! - [`search::compute_move`]: Chooses a movement for a player.
//!
//! Boards are described with a compact setup notation (see [`notation`]); the standard opening
//! is [`preset::boards::CLASSIC`].

/// Miscellaneous utilities used elsewhere in the crate.
#[macro_use]
mod utils;

/// Code relating to game pieces and players.
pub mod pieces;

/// Errors used elsewhere in the crate.
pub mod error;

/// Code relating to board locations, coordinates and directions.
pub mod location;

/// An implementation of a bitfield, used to track which cells each player occupies.
pub mod bitfield;

/// Code relating to the board, including cell typing and the grid of cells.
pub mod board;

pub mod notation;

/// Code relating to movements (ie, game moves).
pub mod play;

pub mod laser;

/// Code for implementing a game, including game logic and state.
pub mod game;

pub mod search;

/// Pre-defined board positions.
pub mod preset;
