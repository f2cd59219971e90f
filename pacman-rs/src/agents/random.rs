use pacman_types::types::SimulableGame;
use rand::seq::SliceRandom;

use super::*;

/// Picks uniformly among the legal actions. This is how ghosts play.
#[derive(Debug, Default)]
pub struct RandomAgent {}

impl PacmanAgent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(
        &mut self,
        state: &PacmanGame,
        rng: &mut StdRng,
    ) -> Result<Action, AgentError> {
        state
            .get_legal_actions()
            .choose(rng)
            .copied()
            .ok_or(AgentError::NoLegalActions {
                agent_index: state.agent_index(),
            })
    }
}

pub struct RandomFactory;

impl AgentFactory for RandomFactory {
    fn name(&self) -> String {
        "random".to_owned()
    }

    fn create(&self, _options: &MinimaxOptions) -> BoxedAgent {
        Box::new(RandomAgent {})
    }
}
