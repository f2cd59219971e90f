#![warn(missing_debug_implementations, missing_docs)]
//! This crate implements the minimax family of adversarial searches for the pacman game.
//! You provide a 'scoring' function that turns a game state into an `f64`, and the
//! stepper walks the game tree to a fixed number of full rounds.
//!
//! Agent 0 is always the maximizing player. Every other agent either minimizes the
//! score (plain minimax, optionally with alpha-beta pruning) or is treated as a
//! uniformly random chance node (expectimax).
//!
//! We lean on the `pacman-types` crate for the game logic, and in particular for
//! [`SimulableGame::generate_successor`](pacman_types::types::SimulableGame::generate_successor),
//! which is used to generate the next states.
//!
//! ```rust
//! use pacman_minimax::{MinimaxOptions, MinimaxStepper};
//! use pacman_types::{types::ScoreGettableGame, PacmanGame};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let game = PacmanGame::from_layout(
//!     "
//! %%%%%%%
//! %.P  G%
//! %%%%%%%
//! ",
//! )
//! .unwrap();
//!
//! // Here the score is just the game score, a real evaluator would look at
//! // food and ghost distances too
//! fn score_function(game: &PacmanGame) -> f64 {
//!     game.get_score()
//! }
//!
//! let options = MinimaxOptions {
//!     depth: 2,
//!     alphabeta_prune: true,
//!     ..Default::default()
//! };
//! let stepper = MinimaxStepper::new(score_function, "example", options);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let action = stepper.choose_action(&game, &mut rng).unwrap();
//!
//! assert_eq!(action.to_string(), "west");
//! ```

mod error;
pub use error::MinimaxError;

mod score;
pub use score::Scorable;

mod eval;
pub use eval::{AdversaryModel, MinimaxOptions, MinimaxStepper};
