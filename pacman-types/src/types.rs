//! Capability traits for game states.
//!
//! Search code asks for exactly the capabilities it needs, in the same way the
//! evaluators only require positions, food and ghosts while the minimax stepper only
//! requires [`SimulableGame`] and [`VictorDeterminableGame`].

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::{Action, Board, Marker, Position};

/// Index of the maximizing agent. Agents `1..num_agents` are its adversaries.
pub const PACMAN_AGENT_INDEX: usize = 0;

/// A game that exposes its board
pub trait BoardGettableGame {
    #[allow(missing_docs)]
    fn board(&self) -> &Board;
}

/// A game that keeps a running score
pub trait ScoreGettableGame {
    #[allow(missing_docs)]
    fn get_score(&self) -> f64;
}

/// A game where agents occupy board positions
pub trait AgentPositionGettableGame {
    /// `None` when the agent is no longer on the board (it has been eliminated)
    fn get_agent_position(&self, agent_index: usize) -> Option<Position>;
}

/// A game with food and capsules laid out on its board
pub trait FoodGettableGame: BoardGettableGame {
    #[allow(missing_docs)]
    fn get_food(&self) -> &BTreeSet<Position> {
        self.board().get_marker_positions(Marker::Pellet)
    }

    #[allow(missing_docs)]
    fn get_capsules(&self) -> &BTreeSet<Position> {
        self.board().get_marker_positions(Marker::Capsule)
    }
}

/// A game with ghosts that may be scared
pub trait GhostPositionGettableGame {
    /// Ghosts that are dangerous right now, keyed by agent index
    fn get_nonscared_ghost_positions(&self) -> BTreeMap<usize, Position>;

    /// Ghosts that can currently be eaten, keyed by agent index
    fn get_scared_ghost_positions(&self) -> BTreeMap<usize, Position>;
}

/// A game that knows when it has ended
pub trait VictorDeterminableGame {
    #[allow(missing_docs)]
    fn is_over(&self) -> bool;
}

/// A turn based game that can generate successor states
pub trait SimulableGame: Sized {
    #[allow(missing_docs)]
    fn num_agents(&self) -> usize;

    /// The agent whose turn it is
    fn agent_index(&self) -> usize;

    /// Legal actions for the agent whose turn it is
    fn get_legal_actions(&self) -> Vec<Action>;

    /// The state after the current agent takes `action`.
    ///
    /// `rng` drives any non-deterministic part of the transition. The current state is
    /// left untouched.
    fn generate_successor<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> Self;
}
