use pacman_types::{
    manhattan_distance,
    types::{AgentPositionGettableGame, BoardGettableGame},
    Board, Marker, Position,
};

use super::{
    PositionSearchNode, PositionSearchProblem, SearchDiagnostics, SearchError, SearchProblem,
    SuccessorInfo,
};

/// Find a path to the closest cell holding a given marker.
///
/// Moves exactly like [PositionSearchProblem], only the goal test differs.
#[derive(Debug, Clone)]
pub struct AnyMarkerSearchProblem<'a> {
    inner: PositionSearchProblem<'a>,
    target_marker: Marker,
}

impl<'a> AnyMarkerSearchProblem<'a> {
    /// Search from pacman's position for `target_marker`, or pellets when `None`
    pub fn new<G>(state: &'a G, target_marker: Option<Marker>) -> Result<Self, SearchError>
    where
        G: BoardGettableGame + AgentPositionGettableGame,
    {
        let inner = PositionSearchProblem::from_game(state)?;

        Ok(Self {
            inner,
            target_marker: target_marker.unwrap_or(Marker::Pellet),
        })
    }

    pub fn from_board(board: &'a Board, start: Position, target_marker: Marker) -> Self {
        // The position goal is never consulted
        let inner = PositionSearchProblem::new(board, start, start);

        Self {
            inner,
            target_marker,
        }
    }

    pub fn target_marker(&self) -> Marker {
        self.target_marker
    }

    pub fn board(&self) -> &'a Board {
        self.inner.board()
    }
}

impl<'a> SearchProblem for AnyMarkerSearchProblem<'a> {
    type Node = PositionSearchNode;

    fn get_starting_node(&self) -> Self::Node {
        self.inner.get_starting_node()
    }

    fn is_goal_node(&self, node: &Self::Node) -> bool {
        self.inner.board().get(node).contains(&self.target_marker)
    }

    fn get_successor_nodes(&mut self, node: &Self::Node) -> Vec<SuccessorInfo<Self::Node>> {
        self.inner.expand(node)
    }

    fn diagnostics(&self) -> Option<&SearchDiagnostics> {
        self.inner.diagnostics()
    }
}

/// Distance to the nearest target marker, 0 when none are left
pub fn nearest_marker_heuristic(node: &PositionSearchNode, problem: &AnyMarkerSearchProblem) -> f64 {
    problem
        .board()
        .get_marker_positions(problem.target_marker)
        .iter()
        .map(|target| manhattan_distance(node, target))
        .reduce(f64::min)
        .unwrap_or(0.0)
}
