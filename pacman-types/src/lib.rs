#![warn(missing_debug_implementations, missing_docs)]
//! Game model shared by the search and minimax crates.
//!
//! This crate holds the board, the positions and actions agents deal in, and the
//! capability traits the search code is written against. [`PacmanGame`] is the
//! reference engine implementing those traits; the search crates never reach into it
//! directly, they only ever talk to the traits in [`types`].

mod board;
mod pacman;
mod position;
pub mod types;

pub use board::{Board, Marker};
pub use pacman::{LayoutError, Outcome, PacmanGame, SCARED_TIME};
pub use position::{manhattan_distance, Action, Position};
pub use types::PACMAN_AGENT_INDEX;
