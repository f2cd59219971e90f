use pacman_minimax::{AdversaryModel, MinimaxStepper};
use pacman_types::PACMAN_AGENT_INDEX;

use super::*;
use crate::evaluation::better_state_eval;

type ScoreFn = fn(&PacmanGame) -> f64;

fn score_pacman(state: &PacmanGame) -> f64 {
    better_state_eval(state, PACMAN_AGENT_INDEX)
}

/// Plays pacman by searching the game tree with [better_state_eval] at the leaves
#[derive(Debug, Clone)]
pub struct MinimaxAgent {
    stepper: MinimaxStepper<PacmanGame, ScoreFn>,
}

impl MinimaxAgent {
    pub fn new(name: &'static str, options: MinimaxOptions) -> Self {
        Self {
            stepper: MinimaxStepper::new(score_pacman as ScoreFn, name, options),
        }
    }

    pub fn options(&self) -> &MinimaxOptions {
        self.stepper.options()
    }
}

impl PacmanAgent for MinimaxAgent {
    fn name(&self) -> &str {
        self.stepper.name
    }

    fn choose_action(
        &mut self,
        state: &PacmanGame,
        rng: &mut StdRng,
    ) -> Result<Action, AgentError> {
        Ok(self.stepper.choose_action(state, rng)?)
    }
}

/// Minimax with whatever pruning and adversary model the options ask for
pub struct MinimaxFactory;

impl AgentFactory for MinimaxFactory {
    fn name(&self) -> String {
        "minimax".to_owned()
    }

    fn create(&self, options: &MinimaxOptions) -> BoxedAgent {
        Box::new(MinimaxAgent::new("minimax", *options))
    }
}

pub struct AlphaBetaFactory;

impl AgentFactory for AlphaBetaFactory {
    fn name(&self) -> String {
        "alphabeta".to_owned()
    }

    fn create(&self, options: &MinimaxOptions) -> BoxedAgent {
        let options = MinimaxOptions {
            alphabeta_prune: true,
            adversary_model: AdversaryModel::Minimizing,
            ..*options
        };

        Box::new(MinimaxAgent::new("alphabeta", options))
    }
}

pub struct ExpectimaxFactory;

impl AgentFactory for ExpectimaxFactory {
    fn name(&self) -> String {
        "expectimax".to_owned()
    }

    fn create(&self, options: &MinimaxOptions) -> BoxedAgent {
        let options = MinimaxOptions {
            alphabeta_prune: false,
            adversary_model: AdversaryModel::Expecting,
            ..*options
        };

        Box::new(MinimaxAgent::new("expectimax", options))
    }
}
