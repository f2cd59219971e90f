/// Failures of the minimax stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MinimaxError {
    /// An expectation was requested over zero actions. Engines are expected to always
    /// offer at least a no-op action, so this points at a broken game implementation.
    #[error("agent {agent_index} has no legal actions to take an expectation over")]
    EmptyLegalActionSet {
        #[allow(missing_docs)]
        agent_index: usize,
    },

    /// The root state has nothing for the maximizing agent to choose from
    #[error("there are no legal actions to choose from")]
    NoLegalActions,

    /// A depth of zero evaluates the root as a leaf, leaving no action to pick
    #[error("minimax needs a search depth of at least 1")]
    ZeroDepth,
}
