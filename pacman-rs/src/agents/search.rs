use std::collections::VecDeque;

use derivative::Derivative;
use pacman_types::{
    types::{AgentPositionGettableGame, BoardGettableGame, PACMAN_AGENT_INDEX},
    Marker,
};
use rand::Rng;
use tracing::{info, warn};

use super::*;
use crate::search::{
    nearest_marker_heuristic, AnyMarkerSearchProblem, PositionSearchNode, SearchSolution, Solver,
};

/// A heuristic over [AnyMarkerSearchProblem], usable with any board lifetime
pub type MarkerHeuristic = fn(&PositionSearchNode, &AnyMarkerSearchProblem<'_>) -> f64;

/// Plans a route through all the food by repeatedly searching for the next pellet.
///
/// Each leg is the solver's answer to "get to any pellet" from where the previous leg
/// ended, with every pellet eaten so far removed from the board. The plan is made once,
/// on the first turn, and ghosts are ignored.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct GreedySubproblemSearchAgent {
    name: &'static str,
    solver: Solver,
    #[derivative(Debug = "ignore")]
    heuristic: MarkerHeuristic,
    plan: Option<VecDeque<Action>>,
}

impl GreedySubproblemSearchAgent {
    pub fn new(name: &'static str, solver: Solver, heuristic: MarkerHeuristic) -> Self {
        Self {
            name,
            solver,
            heuristic,
            plan: None,
        }
    }

    /// Every leg of the tour, in order
    pub fn plan_tour<R: Rng + ?Sized>(
        &self,
        state: &PacmanGame,
        rng: &mut R,
    ) -> Result<Vec<Action>, AgentError> {
        let mut position = state.get_agent_position(PACMAN_AGENT_INDEX).ok_or(
            SearchError::UndefinedStartPosition {
                agent_index: PACMAN_AGENT_INDEX,
            },
        )?;
        let mut board = state.board().clone();
        let mut actions = vec![];
        let mut legs = 0;

        while !board.get_marker_positions(Marker::Pellet).is_empty() {
            let SearchSolution {
                actions: leg,
                goal_node,
                ..
            } = {
                let mut problem =
                    AnyMarkerSearchProblem::from_board(&board, position, Marker::Pellet);

                match self.solver.solve(&mut problem, self.heuristic, rng) {
                    Ok(solution) => solution,
                    Err(SearchError::SolutionNotFound) if legs > 0 => {
                        warn!(legs, "remaining pellets are unreachable, ending the tour early");
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            };

            for action in &leg {
                position = position.add_vec(*action);
                board.remove_marker(&position, Marker::Pellet);
            }
            debug_assert_eq!(position, goal_node);

            actions.extend(leg);
            legs += 1;
        }

        info!(legs, moves = actions.len(), agent = self.name, "planned food tour");

        Ok(actions)
    }
}

impl PacmanAgent for GreedySubproblemSearchAgent {
    fn name(&self) -> &str {
        self.name
    }

    fn choose_action(
        &mut self,
        state: &PacmanGame,
        rng: &mut StdRng,
    ) -> Result<Action, AgentError> {
        if self.plan.is_none() {
            self.plan = Some(self.plan_tour(state, rng)?.into());
        }

        Ok(self
            .plan
            .as_mut()
            .and_then(|plan| plan.pop_front())
            .unwrap_or(Action::Stop))
    }
}

/// Always walks to whichever pellet is closest, found with breadth first search
pub struct ClosestDotSearchFactory;

impl AgentFactory for ClosestDotSearchFactory {
    fn name(&self) -> String {
        "closest-dot".to_owned()
    }

    fn create(&self, _options: &MinimaxOptions) -> BoxedAgent {
        Box::new(GreedySubproblemSearchAgent::new(
            "closest-dot",
            Solver::Bfs,
            |_, _| 0.0,
        ))
    }
}

/// Like closest-dot, but each leg is found with A* guided by the nearest pellet
pub struct ApproximateSearchFactory;

impl AgentFactory for ApproximateSearchFactory {
    fn name(&self) -> String {
        "approximate".to_owned()
    }

    fn create(&self, _options: &MinimaxOptions) -> BoxedAgent {
        Box::new(GreedySubproblemSearchAgent::new(
            "approximate",
            Solver::AStar,
            nearest_marker_heuristic,
        ))
    }
}

#[cfg(test)]
mod tests {
    use pacman_types::{types::SimulableGame, Position};
    use rand::SeedableRng;

    use super::*;

    const CORRIDOR: &str = include_str!("../../fixtures/corridor.lay");

    #[test]
    fn test_closest_dot_tour() {
        let game = PacmanGame::from_layout(CORRIDOR).unwrap();
        let agent = GreedySubproblemSearchAgent::new("closest-dot", Solver::Bfs, |_, _| 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let tour = agent.plan_tour(&game, &mut rng).unwrap();

        // West to the nearer pellet first, then all the way back east
        assert_eq!(tour.len(), 9);
        assert_eq!(&tour[..2], &[Action::West, Action::West]);
        assert!(tour[2..].iter().all(|a| *a == Action::East));
    }

    #[test]
    fn test_playing_the_plan_clears_the_board() {
        let mut game = PacmanGame::from_layout(CORRIDOR).unwrap();
        let mut agent = ApproximateSearchFactory {}.create(&MinimaxOptions::default());
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..9 {
            let action = agent.choose_action(&game, &mut rng).unwrap();
            game = game.generate_successor(action, &mut rng);
        }

        assert!(game.is_won());
        assert_eq!(game.get_agent_position(0), Some(Position::new(1, 8)));
    }

    #[test]
    fn test_plan_runs_out_with_stop() {
        let game = PacmanGame::from_layout("%P.%").unwrap();
        let mut agent = GreedySubproblemSearchAgent::new("closest-dot", Solver::Bfs, |_, _| 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(agent.choose_action(&game, &mut rng).unwrap(), Action::East);
        assert_eq!(agent.choose_action(&game, &mut rng).unwrap(), Action::Stop);
    }

    #[test]
    fn test_unreachable_food() {
        let game = PacmanGame::from_layout(include_str!("../../fixtures/unreachable.lay")).unwrap();
        let agent = GreedySubproblemSearchAgent::new("closest-dot", Solver::Bfs, |_, _| 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            agent.plan_tour(&game, &mut rng),
            Err(AgentError::Search(SearchError::SolutionNotFound))
        ));
    }
}
