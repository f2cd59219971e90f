//! Graph search over abstract search problems.
//!
//! A [SearchProblem] hands out a starting node, a goal test and successors. The
//! solvers in this module only ever talk to that trait, so the same four algorithms
//! work for finding a single cell, eating the closest pellet, touring the corners or
//! clearing the whole board.

use std::{fmt::Debug, hash::Hash};

use pacman_types::{Action, Position};
use rustc_hash::FxHashSet;

pub mod containers;

mod any_marker;
mod corners;
mod food;
mod position;
mod solvers;

pub use any_marker::{nearest_marker_heuristic, AnyMarkerSearchProblem};
pub use corners::{corners_heuristic, CornersSearchNode, CornersSearchProblem};
pub use food::{food_heuristic, FoodSearchNode, FoodSearchProblem};
pub use position::{manhattan_heuristic, PositionSearchNode, PositionSearchProblem};
pub use solvers::{
    astar_search, breadth_first_search, depth_first_search, uniform_cost_search, Solver,
};

/// Anything that can be used as a node in a graph search.
///
/// Nodes are hashed for the visited set and ordered so priority structures have a
/// deterministic tie-break.
pub trait SearchNode: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> SearchNode for T {}

/// One edge out of a node
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessorInfo<N> {
    pub node: N,
    pub action: Action,
    pub cost: f64,
}

/// A path from the starting node to a goal node
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSolution<N> {
    pub actions: Vec<Action>,
    pub cost: f64,
    pub goal_node: N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The frontier ran dry without reaching a goal
    #[error("no solution found")]
    SolutionNotFound,

    #[error("agent {agent_index} has no position to start searching from")]
    UndefinedStartPosition { agent_index: usize },
}

/// The interface every solver searches over
pub trait SearchProblem {
    type Node: SearchNode;

    fn get_starting_node(&self) -> Self::Node;

    fn is_goal_node(&self, node: &Self::Node) -> bool;

    /// Expands `node`. Takes `&mut self` so problems can count expansions.
    fn get_successor_nodes(&mut self, node: &Self::Node) -> Vec<SuccessorInfo<Self::Node>>;

    /// Bookkeeping about the search so far, for problems that keep any
    fn diagnostics(&self) -> Option<&SearchDiagnostics> {
        None
    }
}

/// What a grid search has looked at. Purely informational, nothing reads this back
/// while searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDiagnostics {
    pub expanded_node_count: usize,
    pub visited_positions: FxHashSet<Position>,
    /// Expanded positions in the order they were expanded
    pub position_history: Vec<Position>,
}

impl SearchDiagnostics {
    pub(crate) fn record_expansion(&mut self, position: Position) {
        self.expanded_node_count += 1;
        if self.visited_positions.insert(position) {
            self.position_history.push(position);
        }
    }
}

/// The trivial heuristic. With it A* explores exactly like uniform cost search.
pub fn null_heuristic<P: SearchProblem>(_node: &P::Node, _problem: &P) -> f64 {
    0.0
}

/// The passable neighbors of `position` as unit cost successors
pub(crate) fn grid_successors<N>(
    board: &pacman_types::Board,
    position: &Position,
    to_node: impl Fn(Position) -> N,
) -> Vec<SuccessorInfo<N>> {
    board
        .get_neighbors(position)
        .into_iter()
        .map(|(action, next)| SuccessorInfo {
            node: to_node(next),
            action,
            cost: 1.0,
        })
        .collect()
}
