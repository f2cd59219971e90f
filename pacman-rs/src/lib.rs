//! Search problems, solvers, evaluators and agents for the pacman game.
//!
//! [`search`] holds the classic graph searches (depth first, breadth first, uniform
//! cost and A*) along with the problems and heuristics they are run on. [`evaluation`]
//! turns game states into scores, and [`agents`] puts both of those (plus the minimax
//! stepper from `pacman-minimax`) behind a common [`agents::PacmanAgent`] trait that
//! [`runner::run_game`] drives.

pub mod agents;
pub mod evaluation;
pub mod runner;
pub mod search;

pub use pacman_minimax::{AdversaryModel, MinimaxOptions};
pub use pacman_types::{Action, Board, Marker, PacmanGame, Position};
