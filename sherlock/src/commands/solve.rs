use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use pacman_rs::search::{
    corners_heuristic, food_heuristic, manhattan_heuristic, nearest_marker_heuristic,
    null_heuristic, AnyMarkerSearchProblem, CornersSearchProblem, FoodSearchProblem,
    PositionSearchProblem, SearchProblem, Solver,
};
use pacman_types::{
    types::{AgentPositionGettableGame, BoardGettableGame},
    Marker, Position, PACMAN_AGENT_INDEX,
};

use crate::layout;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProblemKind {
    /// Reach a single goal cell
    Position,
    /// Reach any cell holding the target marker
    AnyMarker,
    /// Touch all four inner corners
    Corners,
    /// Eat every pellet
    Food,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeuristicKind {
    Null,
    Manhattan,
    NearestMarker,
    Corners,
    Food,
}

impl ProblemKind {
    fn default_heuristic(self) -> HeuristicKind {
        match self {
            ProblemKind::Position => HeuristicKind::Manhattan,
            ProblemKind::AnyMarker => HeuristicKind::NearestMarker,
            ProblemKind::Corners => HeuristicKind::Corners,
            ProblemKind::Food => HeuristicKind::Food,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MarkerKind {
    Pellet,
    Capsule,
}

impl From<MarkerKind> for Marker {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Pellet => Marker::Pellet,
            MarkerKind::Capsule => Marker::Capsule,
        }
    }
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got {s:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|e| format!("{part:?} is not a number: {e}"))
    };

    Ok(Position::new(parse(row)?, parse(col)?))
}

#[derive(clap::Args, Debug)]
pub(crate) struct Solve {
    /// Layout file to search
    #[clap(short, long, value_parser)]
    layout: PathBuf,

    /// Which search problem to pose on the layout
    #[clap(short, long, value_enum, default_value_t = ProblemKind::Position)]
    problem: ProblemKind,

    /// dfs, bfs, ucs or astar
    #[clap(short, long, value_parser, default_value_t = Solver::AStar)]
    solver: Solver,

    /// Defaults to the natural heuristic for the problem
    #[clap(long, value_enum)]
    heuristic: Option<HeuristicKind>,

    /// Goal cell for the position problem as ROW,COL. Uses the bottom right inner corner if not specified
    #[clap(short, long, value_parser = parse_position)]
    goal: Option<Position>,

    /// Marker the any-marker problem looks for
    #[clap(short, long, value_enum, default_value_t = MarkerKind::Pellet)]
    marker: MarkerKind,

    /// Seed for the random number generator handed to the solver
    #[clap(long, value_parser, default_value_t = 0)]
    seed: u64,
}

fn report<P, H>(solver: Solver, mut problem: P, heuristic: H, rng: &mut StdRng) -> Result<()>
where
    P: SearchProblem,
    H: Fn(&P::Node, &P) -> f64,
{
    let solution = solver.solve(&mut problem, heuristic, rng)?;

    println!(
        "{} found a path of cost {} ending at {:?}",
        solver.to_string().green().bold(),
        solution.cost,
        solution.goal_node
    );
    if solution.actions.is_empty() {
        println!("Already at the goal");
    } else {
        println!("{}", solution.actions.iter().join(", "));
    }

    if let Some(diagnostics) = problem.diagnostics() {
        println!(
            "Expanded {} nodes over {} distinct cells",
            diagnostics.expanded_node_count.to_string().yellow(),
            diagnostics.visited_positions.len()
        );
    }

    Ok(())
}

impl Solve {
    pub(crate) fn run(self) -> Result<()> {
        let game = layout::load(&self.layout)?;
        let heuristic = self
            .heuristic
            .unwrap_or_else(|| self.problem.default_heuristic());
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rng = &mut rng;

        match self.problem {
            ProblemKind::Position => {
                let problem = match self.goal {
                    Some(goal) => {
                        let start = game.get_agent_position(PACMAN_AGENT_INDEX).ok_or_else(|| {
                            eyre!("Layout {} has no pacman", self.layout.display())
                        })?;
                        PositionSearchProblem::new(game.board(), start, goal)
                    }
                    None => PositionSearchProblem::from_game(&game)?,
                };

                match heuristic {
                    HeuristicKind::Null => report(self.solver, problem, null_heuristic, rng),
                    HeuristicKind::Manhattan => report(self.solver, problem, manhattan_heuristic, rng),
                    other => Err(mismatch(self.problem, other)),
                }
            }
            ProblemKind::AnyMarker => {
                let problem = AnyMarkerSearchProblem::new(&game, Some(self.marker.into()))?;

                match heuristic {
                    HeuristicKind::Null => report(self.solver, problem, null_heuristic, rng),
                    HeuristicKind::NearestMarker => {
                        report(self.solver, problem, nearest_marker_heuristic, rng)
                    }
                    other => Err(mismatch(self.problem, other)),
                }
            }
            ProblemKind::Corners => {
                let problem = CornersSearchProblem::new(&game)?;

                match heuristic {
                    HeuristicKind::Null => report(self.solver, problem, null_heuristic, rng),
                    HeuristicKind::Corners => report(self.solver, problem, corners_heuristic, rng),
                    other => Err(mismatch(self.problem, other)),
                }
            }
            ProblemKind::Food => {
                let problem = FoodSearchProblem::new(&game)?;

                match heuristic {
                    HeuristicKind::Null => report(self.solver, problem, null_heuristic, rng),
                    HeuristicKind::Food => report(self.solver, problem, food_heuristic, rng),
                    other => Err(mismatch(self.problem, other)),
                }
            }
        }
    }
}

fn mismatch(problem: ProblemKind, heuristic: HeuristicKind) -> color_eyre::eyre::Report {
    eyre!("The {heuristic:?} heuristic does not apply to the {problem:?} problem")
}
