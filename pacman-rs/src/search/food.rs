use std::collections::BTreeSet;

use itertools::Itertools;
use pacman_types::{
    manhattan_distance,
    types::{AgentPositionGettableGame, FoodGettableGame, PACMAN_AGENT_INDEX},
    Board, Position,
};

use super::{grid_successors, SearchDiagnostics, SearchError, SearchProblem, SuccessorInfo};

/// Where pacman is, plus the food still left on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FoodSearchNode {
    pub position: Position,
    pub remaining_food: BTreeSet<Position>,
}

/// Eat every pellet on the board
#[derive(Debug, Clone)]
pub struct FoodSearchProblem<'a> {
    board: &'a Board,
    start: FoodSearchNode,
    diagnostics: SearchDiagnostics,
}

impl<'a> FoodSearchProblem<'a> {
    pub fn new<G>(state: &'a G) -> Result<Self, SearchError>
    where
        G: FoodGettableGame + AgentPositionGettableGame,
    {
        let position = state.get_agent_position(PACMAN_AGENT_INDEX).ok_or(
            SearchError::UndefinedStartPosition {
                agent_index: PACMAN_AGENT_INDEX,
            },
        )?;

        Ok(Self {
            board: state.board(),
            start: FoodSearchNode {
                position,
                remaining_food: state.get_food().clone(),
            },
            diagnostics: SearchDiagnostics::default(),
        })
    }
}

impl<'a> SearchProblem for FoodSearchProblem<'a> {
    type Node = FoodSearchNode;

    fn get_starting_node(&self) -> Self::Node {
        self.start.clone()
    }

    fn is_goal_node(&self, node: &Self::Node) -> bool {
        node.remaining_food.is_empty()
    }

    fn get_successor_nodes(&mut self, node: &Self::Node) -> Vec<SuccessorInfo<Self::Node>> {
        self.diagnostics.record_expansion(node.position);

        grid_successors(self.board, &node.position, |next| {
            let mut remaining_food = node.remaining_food.clone();
            remaining_food.remove(&next);

            FoodSearchNode {
                position: next,
                remaining_food,
            }
        })
    }

    fn diagnostics(&self) -> Option<&SearchDiagnostics> {
        Some(&self.diagnostics)
    }
}

/// Distance to the nearest food plus the weight of a minimum spanning tree over all the
/// remaining food.
///
/// Pacman has to reach some food first and then connect every other piece, which can
/// never take fewer steps than the spanning tree.
pub fn food_heuristic(node: &FoodSearchNode, _problem: &FoodSearchProblem) -> f64 {
    let food = node.remaining_food.iter().collect_vec();

    let Some(nearest) = food
        .iter()
        .map(|f| manhattan_distance(&node.position, f))
        .reduce(f64::min)
    else {
        return 0.0;
    };

    nearest + minimum_spanning_tree_cost(&food)
}

/// Dense Prim's over Manhattan distances
fn minimum_spanning_tree_cost(points: &[&Position]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut in_tree = vec![false; n];
    let mut cheapest_edge = vec![f64::INFINITY; n];
    cheapest_edge[0] = 0.0;
    let mut total = 0.0;

    for _ in 0..n {
        let Some(next) = (0..n)
            .filter(|i| !in_tree[*i])
            .min_by(|a, b| cheapest_edge[*a].total_cmp(&cheapest_edge[*b]))
        else {
            break;
        };

        in_tree[next] = true;
        total += cheapest_edge[next];

        for other in 0..n {
            if !in_tree[other] {
                let distance = manhattan_distance(points[next], points[other]);
                if distance < cheapest_edge[other] {
                    cheapest_edge[other] = distance;
                }
            }
        }
    }

    total
}
