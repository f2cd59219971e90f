use decorum::N64;
use pacman_types::types::{AgentPositionGettableGame, SimulableGame};
use rand::seq::SliceRandom;
use tracing::debug;

use super::*;
use crate::evaluation::{reflex_state_eval, PositionHistory};

/// Looks one move ahead and takes whichever successor scores best.
///
/// Remembers where it has been recently so it does not dither between two cells.
#[derive(Debug, Default)]
pub struct ReflexAgent {
    recent_positions: PositionHistory,
}

impl ReflexAgent {
    pub fn recent_positions(&self) -> &PositionHistory {
        &self.recent_positions
    }
}

impl PacmanAgent for ReflexAgent {
    fn name(&self) -> &str {
        "reflex"
    }

    fn choose_action(
        &mut self,
        state: &PacmanGame,
        rng: &mut StdRng,
    ) -> Result<Action, AgentError> {
        let agent_index = state.agent_index();
        if let Some(position) = state.get_agent_position(agent_index) {
            self.recent_positions.push(position);
        }

        let mut best_score = N64::from(f64::NEG_INFINITY);
        let mut best_actions = vec![];

        for action in state.get_legal_actions() {
            let successor = state.generate_successor(action, rng);
            let score = N64::from(reflex_state_eval(
                &successor,
                agent_index,
                &self.recent_positions,
            ));

            if best_actions.is_empty() || score > best_score {
                best_score = score;
                best_actions = vec![action];
            } else if score == best_score {
                best_actions.push(action);
            }
        }

        let chosen = *best_actions
            .choose(rng)
            .ok_or(AgentError::NoLegalActions { agent_index })?;
        debug!(%chosen, score = best_score.into_inner(), candidates = best_actions.len(), "reflex choice");

        Ok(chosen)
    }
}

pub struct ReflexFactory;

impl AgentFactory for ReflexFactory {
    fn name(&self) -> String {
        "reflex".to_owned()
    }

    fn create(&self, _options: &MinimaxOptions) -> BoxedAgent {
        Box::new(ReflexAgent::default())
    }
}
