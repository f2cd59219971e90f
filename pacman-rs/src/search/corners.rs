use pacman_types::{
    manhattan_distance,
    types::{AgentPositionGettableGame, BoardGettableGame, PACMAN_AGENT_INDEX},
    Board, Position,
};

use super::{grid_successors, SearchDiagnostics, SearchError, SearchProblem, SuccessorInfo};

/// Where pacman is, plus which corners it has touched so far.
///
/// The visited corners are kept sorted and free of duplicates, so two nodes that
/// touched the same corners in a different order are the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornersSearchNode {
    position: Position,
    visited_corners: Vec<Position>,
}

impl CornersSearchNode {
    pub fn new(position: Position, mut visited_corners: Vec<Position>) -> Self {
        visited_corners.sort();
        visited_corners.dedup();

        Self {
            position,
            visited_corners,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn visited_corners(&self) -> &[Position] {
        &self.visited_corners
    }

    fn has_visited(&self, corner: &Position) -> bool {
        self.visited_corners.binary_search(corner).is_ok()
    }
}

/// Touch all four playable corners of a walled board
#[derive(Debug, Clone)]
pub struct CornersSearchProblem<'a> {
    board: &'a Board,
    corners: [Position; 4],
    start: Position,
    diagnostics: SearchDiagnostics,
}

impl<'a> CornersSearchProblem<'a> {
    pub fn new<G>(state: &'a G) -> Result<Self, SearchError>
    where
        G: BoardGettableGame + AgentPositionGettableGame,
    {
        let start = state.get_agent_position(PACMAN_AGENT_INDEX).ok_or(
            SearchError::UndefinedStartPosition {
                agent_index: PACMAN_AGENT_INDEX,
            },
        )?;

        Ok(Self::from_board(state.board(), start))
    }

    pub fn from_board(board: &'a Board, start: Position) -> Self {
        Self {
            board,
            corners: board.get_corners(1),
            start,
            diagnostics: SearchDiagnostics::default(),
        }
    }

    /// North-west, north-east, south-west, south-east
    pub fn corners(&self) -> &[Position; 4] {
        &self.corners
    }
}

impl<'a> SearchProblem for CornersSearchProblem<'a> {
    type Node = CornersSearchNode;

    fn get_starting_node(&self) -> Self::Node {
        let visited = if self.corners.contains(&self.start) {
            vec![self.start]
        } else {
            vec![]
        };

        CornersSearchNode::new(self.start, visited)
    }

    fn is_goal_node(&self, node: &Self::Node) -> bool {
        self.corners.iter().all(|corner| node.has_visited(corner))
    }

    fn get_successor_nodes(&mut self, node: &Self::Node) -> Vec<SuccessorInfo<Self::Node>> {
        self.diagnostics.record_expansion(node.position);

        let corners = self.corners;
        grid_successors(self.board, &node.position, |next| {
            let mut visited = node.visited_corners.clone();
            if corners.contains(&next) {
                visited.push(next);
            }

            CornersSearchNode::new(next, visited)
        })
    }

    fn diagnostics(&self) -> Option<&SearchDiagnostics> {
        Some(&self.diagnostics)
    }
}

/// Distance to the farthest corner not yet touched.
///
/// Every remaining corner has to be reached at some point, so the farthest one alone
/// is a lower bound on what is left.
pub fn corners_heuristic(node: &CornersSearchNode, problem: &CornersSearchProblem) -> f64 {
    problem
        .corners
        .iter()
        .filter(|corner| !node.has_visited(corner))
        .map(|corner| manhattan_distance(&node.position, corner))
        .reduce(f64::max)
        .unwrap_or(0.0)
}
