use std::{fmt, str::FromStr};

use pacman_types::Action;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use super::{
    containers::{Frontier, PriorityQueue, Queue, Stack},
    SearchError, SearchProblem, SearchSolution, SuccessorInfo,
};

/// The four graph searches, selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Dfs,
    Bfs,
    Ucs,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Dfs, Solver::Bfs, Solver::Ucs, Solver::AStar];

    pub fn name(&self) -> &'static str {
        match self {
            Solver::Dfs => "dfs",
            Solver::Bfs => "bfs",
            Solver::Ucs => "ucs",
            Solver::AStar => "astar",
        }
    }

    pub fn solve<P, H, R>(
        &self,
        problem: &mut P,
        heuristic: H,
        rng: &mut R,
    ) -> Result<SearchSolution<P::Node>, SearchError>
    where
        P: SearchProblem,
        H: Fn(&P::Node, &P) -> f64,
        R: Rng + ?Sized,
    {
        match self {
            Solver::Dfs => depth_first_search(problem, heuristic, rng),
            Solver::Bfs => breadth_first_search(problem, heuristic, rng),
            Solver::Ucs => uniform_cost_search(problem, heuristic, rng),
            Solver::AStar => astar_search(problem, heuristic, rng),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Solver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Solver::ALL
            .into_iter()
            .find(|solver| solver.name() == s)
            .ok_or_else(|| format!("unknown solver {s:?}, expected one of dfs, bfs, ucs, astar"))
    }
}

/// Deepest nodes first. The heuristic and rng are unused.
pub fn depth_first_search<P, H, R>(
    problem: &mut P,
    _heuristic: H,
    _rng: &mut R,
) -> Result<SearchSolution<P::Node>, SearchError>
where
    P: SearchProblem,
    H: Fn(&P::Node, &P) -> f64,
    R: Rng + ?Sized,
{
    graph_search(
        problem,
        Stack::default(),
        |_, _, _| 0.0,
        false,
        Solver::Dfs,
    )
}

/// Shallowest nodes first. The heuristic and rng are unused.
pub fn breadth_first_search<P, H, R>(
    problem: &mut P,
    _heuristic: H,
    _rng: &mut R,
) -> Result<SearchSolution<P::Node>, SearchError>
where
    P: SearchProblem,
    H: Fn(&P::Node, &P) -> f64,
    R: Rng + ?Sized,
{
    graph_search(
        problem,
        Queue::default(),
        |_, _, _| 0.0,
        false,
        Solver::Bfs,
    )
}

/// Cheapest path so far first. The heuristic and rng are unused.
pub fn uniform_cost_search<P, H, R>(
    problem: &mut P,
    _heuristic: H,
    _rng: &mut R,
) -> Result<SearchSolution<P::Node>, SearchError>
where
    P: SearchProblem,
    H: Fn(&P::Node, &P) -> f64,
    R: Rng + ?Sized,
{
    graph_search(
        problem,
        PriorityQueue::default(),
        |_, cost, _| cost,
        true,
        Solver::Ucs,
    )
}

/// Lowest `cost + heuristic(node)` first.
///
/// Optimal when the heuristic is admissible and consistent. The rng is unused.
pub fn astar_search<P, H, R>(
    problem: &mut P,
    heuristic: H,
    _rng: &mut R,
) -> Result<SearchSolution<P::Node>, SearchError>
where
    P: SearchProblem,
    H: Fn(&P::Node, &P) -> f64,
    R: Rng + ?Sized,
{
    graph_search(
        problem,
        PriorityQueue::default(),
        |node, cost, problem| cost + heuristic(node, problem),
        true,
        Solver::AStar,
    )
}

struct FrontierEntry<N> {
    node: N,
    actions: Vec<Action>,
    cost: f64,
}

/// The shared loop behind every solver.
///
/// Goals are tested when a node is popped, not when it is pushed. With
/// `track_best_costs` a successor is only pushed when it is new or reached more
/// cheaply than before.
fn graph_search<P, F, Priority>(
    problem: &mut P,
    mut frontier: F,
    priority: Priority,
    track_best_costs: bool,
    solver: Solver,
) -> Result<SearchSolution<P::Node>, SearchError>
where
    P: SearchProblem,
    F: Frontier<FrontierEntry<P::Node>>,
    Priority: Fn(&P::Node, f64, &P) -> f64,
{
    let span = debug_span!("graph_search", %solver);
    let _guard = span.enter();

    let mut visited: FxHashSet<P::Node> = FxHashSet::default();
    let mut best_costs: FxHashMap<P::Node, f64> = FxHashMap::default();
    let mut expanded = 0usize;

    let start = problem.get_starting_node();
    if track_best_costs {
        best_costs.insert(start.clone(), 0.0);
    }
    let start_priority = priority(&start, 0.0, &*problem);
    frontier.push(
        FrontierEntry {
            node: start,
            actions: vec![],
            cost: 0.0,
        },
        start_priority,
    );

    while let Some(FrontierEntry {
        node,
        actions,
        cost,
    }) = frontier.pop()
    {
        if problem.is_goal_node(&node) {
            debug!(
                cost,
                path_length = actions.len(),
                expanded,
                "found a solution"
            );

            return Ok(SearchSolution {
                actions,
                cost,
                goal_node: node,
            });
        }

        if !visited.insert(node.clone()) {
            continue;
        }
        expanded += 1;

        for SuccessorInfo {
            node: next,
            action,
            cost: step_cost,
        } in problem.get_successor_nodes(&node)
        {
            if visited.contains(&next) {
                continue;
            }

            let next_cost = cost + step_cost;
            if track_best_costs {
                if matches!(best_costs.get(&next), Some(best) if *best <= next_cost) {
                    continue;
                }
                best_costs.insert(next.clone(), next_cost);
            }

            let mut next_actions = actions.clone();
            next_actions.push(action);

            let next_priority = priority(&next, next_cost, &*problem);
            frontier.push(
                FrontierEntry {
                    node: next,
                    actions: next_actions,
                    cost: next_cost,
                },
                next_priority,
            );
        }
    }

    debug!(expanded, "frontier exhausted without reaching a goal");
    Err(SearchError::SolutionNotFound)
}
