use pacman_types::{
    manhattan_distance,
    types::{AgentPositionGettableGame, BoardGettableGame, PACMAN_AGENT_INDEX},
    Board, Position,
};

use super::{grid_successors, SearchDiagnostics, SearchError, SearchProblem, SuccessorInfo};

/// A node that is nothing but where pacman stands
pub type PositionSearchNode = Position;

/// Walk from a start position to one fixed goal position
#[derive(Debug, Clone)]
pub struct PositionSearchProblem<'a> {
    board: &'a Board,
    start: Position,
    goal: Position,
    diagnostics: SearchDiagnostics,
}

impl<'a> PositionSearchProblem<'a> {
    pub fn new(board: &'a Board, start: Position, goal: Position) -> Self {
        Self {
            board,
            start,
            goal,
            diagnostics: SearchDiagnostics::default(),
        }
    }

    /// Starts at pacman's position and aims for the bottom right playable corner
    pub fn from_game<G>(state: &'a G) -> Result<Self, SearchError>
    where
        G: BoardGettableGame + AgentPositionGettableGame,
    {
        let start = state.get_agent_position(PACMAN_AGENT_INDEX).ok_or(
            SearchError::UndefinedStartPosition {
                agent_index: PACMAN_AGENT_INDEX,
            },
        )?;
        let goal = state.board().get_corners(1)[3];

        Ok(Self::new(state.board(), start, goal))
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Expands a position, shared with the problems that only change the goal test
    pub(crate) fn expand(&mut self, position: &Position) -> Vec<SuccessorInfo<Position>> {
        self.diagnostics.record_expansion(*position);

        grid_successors(self.board, position, |next| next)
    }
}

impl<'a> SearchProblem for PositionSearchProblem<'a> {
    type Node = PositionSearchNode;

    fn get_starting_node(&self) -> Self::Node {
        self.start
    }

    fn is_goal_node(&self, node: &Self::Node) -> bool {
        *node == self.goal
    }

    fn get_successor_nodes(&mut self, node: &Self::Node) -> Vec<SuccessorInfo<Self::Node>> {
        self.expand(node)
    }

    fn diagnostics(&self) -> Option<&SearchDiagnostics> {
        Some(&self.diagnostics)
    }
}

/// Manhattan distance to the goal. Admissible and consistent on a 4-connected grid.
pub fn manhattan_heuristic(node: &PositionSearchNode, problem: &PositionSearchProblem) -> f64 {
    manhattan_distance(node, &problem.goal)
}

#[cfg(test)]
mod tests {
    use pacman_types::{types::SimulableGame, Action, PacmanGame};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_default_goal_is_south_east_corner() {
        let game = PacmanGame::from_layout(
            "
%%%%%%
%P   %
%    %
%%%%%%
",
        )
        .unwrap();
        let problem = PositionSearchProblem::from_game(&game).unwrap();

        assert_eq!(problem.start(), Position::new(1, 1));
        assert_eq!(problem.goal(), Position::new(2, 4));
    }

    #[test]
    fn test_successors_skip_walls() {
        let game = PacmanGame::from_layout(
            "
%%%%%
%P %%
% % %
%%%%%
",
        )
        .unwrap();
        let mut problem = PositionSearchProblem::from_game(&game).unwrap();

        let successors = problem.get_successor_nodes(&Position::new(1, 1));

        assert_eq!(
            successors,
            vec![
                SuccessorInfo {
                    node: Position::new(1, 2),
                    action: Action::East,
                    cost: 1.0,
                },
                SuccessorInfo {
                    node: Position::new(2, 1),
                    action: Action::South,
                    cost: 1.0,
                },
            ]
        );
    }

    #[test]
    fn test_diagnostics_count_expansions() {
        let board = Board::new(3, 3);
        let mut problem =
            PositionSearchProblem::new(&board, Position::new(1, 1), Position::new(0, 0));

        problem.get_successor_nodes(&Position::new(1, 1));
        problem.get_successor_nodes(&Position::new(0, 1));
        problem.get_successor_nodes(&Position::new(1, 1));

        let diagnostics = problem.diagnostics().unwrap();
        assert_eq!(diagnostics.expanded_node_count, 3);
        assert_eq!(
            diagnostics.position_history,
            vec![Position::new(1, 1), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_manhattan_heuristic() {
        let board = Board::new(5, 5);
        let problem = PositionSearchProblem::new(&board, Position::new(0, 0), Position::new(3, 4));

        assert_eq!(manhattan_heuristic(&Position::new(0, 0), &problem), 7.0);
        assert_eq!(manhattan_heuristic(&Position::new(3, 4), &problem), 0.0);
    }

    #[test]
    fn test_eliminated_pacman_has_no_start() {
        let game = PacmanGame::from_layout("%PG.%").unwrap();
        let game = game.generate_successor(Action::East, &mut StdRng::seed_from_u64(0));

        assert_eq!(
            PositionSearchProblem::from_game(&game).unwrap_err(),
            SearchError::UndefinedStartPosition { agent_index: 0 }
        );
    }
}
