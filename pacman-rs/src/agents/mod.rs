//! Agents that pick an action for the agent whose turn it is.

use std::fmt::Debug;

use pacman_minimax::{MinimaxError, MinimaxOptions};
use pacman_types::{Action, LayoutError, PacmanGame};
use rand::rngs::StdRng;

use crate::search::SearchError;

mod minimax;
mod random;
mod reflex;
mod search;

pub use minimax::{AlphaBetaFactory, ExpectimaxFactory, MinimaxAgent, MinimaxFactory};
pub use random::{RandomAgent, RandomFactory};
pub use reflex::{ReflexAgent, ReflexFactory};
pub use search::{
    ApproximateSearchFactory, ClosestDotSearchFactory, GreedySubproblemSearchAgent,
    MarkerHeuristic,
};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Minimax(#[from] MinimaxError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("agent {agent_index} chose the illegal action {action}")]
    IllegalAction { agent_index: usize, action: Action },

    #[error("agent {agent_index} has no legal actions")]
    NoLegalActions { agent_index: usize },

    #[error("the game has {expected} agents but {found} were provided")]
    AgentCountMismatch { expected: usize, found: usize },
}

pub type BoxedAgent = Box<dyn PacmanAgent + Send + Sync>;
pub type BoxedFactory = Box<dyn AgentFactory + Send + Sync>;

pub trait PacmanAgent: Debug {
    fn name(&self) -> &str;

    /// Pick an action for the agent whose turn it is in `state`
    fn choose_action(&mut self, state: &PacmanGame, rng: &mut StdRng)
        -> Result<Action, AgentError>;

    /// Called once when the game is over
    fn end(&mut self, _state: &PacmanGame) {}
}

pub trait AgentFactory {
    fn name(&self) -> String;

    /// Build a fresh agent. Agents that do not search a game tree ignore `options`.
    fn create(&self, options: &MinimaxOptions) -> BoxedAgent;
}

pub fn all_factories() -> Vec<BoxedFactory> {
    vec![
        Box::new(ReflexFactory {}),
        Box::new(MinimaxFactory {}),
        Box::new(AlphaBetaFactory {}),
        Box::new(ExpectimaxFactory {}),
        Box::new(ClosestDotSearchFactory {}),
        Box::new(ApproximateSearchFactory {}),
        Box::new(RandomFactory {}),
    ]
}

pub fn factory_by_name(name: &str) -> Option<BoxedFactory> {
    all_factories().into_iter().find(|f| f.name() == name)
}
