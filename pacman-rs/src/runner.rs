use pacman_types::{
    types::{ScoreGettableGame, SimulableGame, VictorDeterminableGame},
    Outcome, PacmanGame,
};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::agents::{AgentError, BoxedAgent};

/// How a game played by [run_game] ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `None` when the move limit was hit first
    pub outcome: Option<Outcome>,
    pub score: f64,
    /// Moves made by every agent combined
    pub moves: usize,
}

/// Play `game` until it ends or `max_moves` moves have been made.
///
/// `agents[i]` plays agent `i`. Every chosen action is checked against the legal
/// actions before it is applied, and `observer` sees each state including the first
/// and the last.
pub fn run_game(
    mut game: PacmanGame,
    agents: &mut [BoxedAgent],
    max_moves: usize,
    rng: &mut StdRng,
    mut observer: impl FnMut(&PacmanGame),
) -> Result<GameOutcome, AgentError> {
    if agents.len() != game.num_agents() {
        return Err(AgentError::AgentCountMismatch {
            expected: game.num_agents(),
            found: agents.len(),
        });
    }

    let span = info_span!("run_game", pacman = agents[0].name(), max_moves);
    let _guard = span.enter();

    observer(&game);

    while !game.is_over() && game.turn() < max_moves {
        let agent_index = game.agent_index();
        let action = agents[agent_index].choose_action(&game, rng)?;

        if !game.get_legal_actions().contains(&action) {
            return Err(AgentError::IllegalAction {
                agent_index,
                action,
            });
        }

        debug!(turn = game.turn(), agent_index, %action, "applying action");
        game = game.generate_successor(action, rng);
        observer(&game);
    }

    for agent in agents.iter_mut() {
        agent.end(&game);
    }

    let result = GameOutcome {
        outcome: game.outcome(),
        score: game.get_score(),
        moves: game.turn(),
    };
    info!(outcome = ?result.outcome, score = result.score, moves = result.moves, "game over");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use pacman_types::Action;
    use rand::SeedableRng;

    use super::*;
    use crate::{
        agents::{PacmanAgent, RandomAgent},
        MinimaxOptions,
    };

    #[derive(Debug)]
    struct Always(Action);

    impl PacmanAgent for Always {
        fn name(&self) -> &str {
            "always"
        }

        fn choose_action(
            &mut self,
            _state: &PacmanGame,
            _rng: &mut StdRng,
        ) -> Result<Action, AgentError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_wins_the_corridor() {
        let game = PacmanGame::from_layout("%P..%").unwrap();
        let mut agents: Vec<BoxedAgent> = vec![Box::new(Always(Action::East))];
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = 0;

        let result = run_game(game, &mut agents, 100, &mut rng, |_| seen += 1).unwrap();

        assert_eq!(result.outcome, Some(Outcome::Won));
        assert_eq!(result.moves, 2);
        assert_eq!(result.score, 2.0 * 10.0 - 2.0 + 500.0);
        assert_eq!(seen, 3);

        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["outcome"], "Won");
        assert_eq!(json["moves"], 2);
    }

    #[test]
    fn test_move_limit() {
        let game = PacmanGame::from_layout("%P .%").unwrap();
        let mut agents: Vec<BoxedAgent> = vec![Box::new(Always(Action::Stop))];
        let mut rng = StdRng::seed_from_u64(0);

        let result = run_game(game, &mut agents, 5, &mut rng, |_| {}).unwrap();

        assert_eq!(result.outcome, None);
        assert_eq!(result.moves, 5);
        assert_eq!(result.score, -5.0);
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let game = PacmanGame::from_layout("%P .%").unwrap();
        let mut agents: Vec<BoxedAgent> = vec![Box::new(Always(Action::North))];
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            run_game(game, &mut agents, 5, &mut rng, |_| {}),
            Err(AgentError::IllegalAction {
                agent_index: 0,
                action: Action::North
            })
        ));
    }

    #[test]
    fn test_agent_count_must_match() {
        let game = PacmanGame::from_layout("%P G.%").unwrap();
        let mut agents: Vec<BoxedAgent> = vec![Box::new(RandomAgent::default())];
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            run_game(game, &mut agents, 5, &mut rng, |_| {}),
            Err(AgentError::AgentCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_ghosts_take_turns() {
        let game = PacmanGame::from_layout("%P  G .%").unwrap();
        let mut agents: Vec<BoxedAgent> = vec![
            crate::agents::factory_by_name("alphabeta")
                .unwrap()
                .create(&MinimaxOptions::default()),
            Box::new(RandomAgent::default()),
        ];
        let mut rng = StdRng::seed_from_u64(3);

        let result = run_game(game, &mut agents, 40, &mut rng, |_| {}).unwrap();

        assert!(result.moves <= 40);
        assert!(result.outcome.is_some() || result.moves == 40);
    }
}
