use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    types::{
        AgentPositionGettableGame, BoardGettableGame, FoodGettableGame, GhostPositionGettableGame,
        ScoreGettableGame, SimulableGame, VictorDeterminableGame, PACMAN_AGENT_INDEX,
    },
    Action, Board, Marker, Position,
};

/// Number of ghost moves a capsule keeps the ghosts scared for
pub const SCARED_TIME: u32 = 40;

const PELLET_POINTS: f64 = 10.0;
const TIME_PENALTY: f64 = 1.0;
const GHOST_POINTS: f64 = 200.0;
const WIN_POINTS: f64 = 500.0;
const LOSE_PENALTY: f64 = 500.0;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Pacman ate every pellet
    Won,
    /// Pacman was caught by a ghost
    Lost,
}

/// Errors from parsing a text layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[allow(missing_docs)]
    #[error("layout is empty")]
    Empty,

    #[allow(missing_docs)]
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[allow(missing_docs)]
    #[error("unknown layout character {character:?} at ({row}, {col})")]
    UnknownCharacter {
        character: char,
        row: usize,
        col: usize,
    },

    #[allow(missing_docs)]
    #[error("layout has no pacman")]
    MissingPacman,

    #[allow(missing_docs)]
    #[error("layout has {0} pacmen, expected exactly one")]
    MultiplePacman(usize),
}

/// The reference game engine.
///
/// Agent 0 is pacman, every other agent is a ghost. Agents move one at a time in index
/// order. Pacman loses a point per move, scores for pellets and scared ghosts, wins by
/// clearing the board and loses by sharing a cell with a ghost that is not scared.
#[derive(Debug, Clone, PartialEq)]
pub struct PacmanGame {
    board: Board,
    agent_positions: Vec<Option<Position>>,
    start_positions: Vec<Position>,
    scared_timers: Vec<u32>,
    score: f64,
    agent_index: usize,
    turn: usize,
    outcome: Option<Outcome>,
}

impl PacmanGame {
    /// Start a game with pacman and the ghosts at the given positions
    pub fn new(board: Board, pacman: Position, ghosts: Vec<Position>) -> Self {
        let start_positions: Vec<Position> = std::iter::once(pacman).chain(ghosts).collect();
        let agent_positions = start_positions.iter().copied().map(Some).collect();
        let scared_timers = vec![0; start_positions.len()];

        Self {
            board,
            agent_positions,
            start_positions,
            scared_timers,
            score: 0.0,
            agent_index: PACMAN_AGENT_INDEX,
            turn: 0,
            outcome: None,
        }
    }

    /// Parse a layout where `%` is a wall, `.` a pellet, `o` a capsule, `P` pacman and
    /// `G` a ghost. Ghosts are numbered in reading order.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let mut rows: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.is_empty())
            .collect();
        while rows.last().map_or(false, |line| line.is_empty()) {
            rows.pop();
        }

        let width = rows.first().ok_or(LayoutError::Empty)?.chars().count();

        let mut board = Board::new(rows.len() as i32, width as i32);
        let mut pacmen = vec![];
        let mut ghosts = vec![];

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            for (col, character) in line.chars().enumerate() {
                let position = Position::new(row as i32, col as i32);

                match character {
                    '%' => board.add_marker(position, Marker::Wall),
                    '.' => board.add_marker(position, Marker::Pellet),
                    'o' => board.add_marker(position, Marker::Capsule),
                    'P' => pacmen.push(position),
                    'G' => ghosts.push(position),
                    ' ' => {}
                    _ => {
                        return Err(LayoutError::UnknownCharacter {
                            character,
                            row,
                            col,
                        })
                    }
                }
            }
        }

        match pacmen.as_slice() {
            [] => Err(LayoutError::MissingPacman),
            [pacman] => Ok(Self::new(board, *pacman, ghosts)),
            _ => Err(LayoutError::MultiplePacman(pacmen.len())),
        }
    }

    /// Number of moves made so far, counting every agent
    pub fn turn(&self) -> usize {
        self.turn
    }

    #[allow(missing_docs)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[allow(missing_docs)]
    pub fn is_won(&self) -> bool {
        self.outcome == Some(Outcome::Won)
    }

    /// Moves left before the given ghost stops being scared
    pub fn scared_timer(&self, agent_index: usize) -> u32 {
        self.scared_timers.get(agent_index).copied().unwrap_or(0)
    }

    fn ghost_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.agent_positions.len()).filter(|i| *i != PACMAN_AGENT_INDEX)
    }

    fn ghost_positions_where(&self, scared: bool) -> BTreeMap<usize, Position> {
        self.ghost_indices()
            .filter(|i| (self.scared_timers[*i] > 0) == scared)
            .filter_map(|i| self.agent_positions[i].map(|p| (i, p)))
            .collect()
    }

    fn consume(&mut self, position: &Position) {
        if self.board.remove_marker(position, Marker::Pellet) {
            self.score += PELLET_POINTS;

            if self.get_food().is_empty() {
                self.score += WIN_POINTS;
                self.outcome = Some(Outcome::Won);
            }
        }

        if self.board.remove_marker(position, Marker::Capsule) {
            for ghost in self.ghost_indices().collect_vec() {
                self.scared_timers[ghost] = SCARED_TIME;
            }
        }
    }

    fn resolve_collisions(&mut self) {
        if self.outcome.is_some() {
            return;
        }

        let Some(pacman) = self.agent_positions[PACMAN_AGENT_INDEX] else {
            return;
        };

        for ghost in self.ghost_indices().collect_vec() {
            if self.agent_positions[ghost] != Some(pacman) {
                continue;
            }

            if self.scared_timers[ghost] > 0 {
                self.score += GHOST_POINTS;
                self.agent_positions[ghost] = Some(self.start_positions[ghost]);
                self.scared_timers[ghost] = 0;
            } else {
                self.score -= LOSE_PENALTY;
                self.agent_positions[PACMAN_AGENT_INDEX] = None;
                self.outcome = Some(Outcome::Lost);
                return;
            }
        }
    }
}

impl FromStr for PacmanGame {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_layout(s)
    }
}

impl BoardGettableGame for PacmanGame {
    fn board(&self) -> &Board {
        &self.board
    }
}

impl ScoreGettableGame for PacmanGame {
    fn get_score(&self) -> f64 {
        self.score
    }
}

impl AgentPositionGettableGame for PacmanGame {
    fn get_agent_position(&self, agent_index: usize) -> Option<Position> {
        self.agent_positions.get(agent_index).copied().flatten()
    }
}

impl FoodGettableGame for PacmanGame {}

impl GhostPositionGettableGame for PacmanGame {
    fn get_nonscared_ghost_positions(&self) -> BTreeMap<usize, Position> {
        self.ghost_positions_where(false)
    }

    fn get_scared_ghost_positions(&self) -> BTreeMap<usize, Position> {
        self.ghost_positions_where(true)
    }
}

impl VictorDeterminableGame for PacmanGame {
    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

impl SimulableGame for PacmanGame {
    fn num_agents(&self) -> usize {
        self.agent_positions.len()
    }

    fn agent_index(&self) -> usize {
        self.agent_index
    }

    /// Pacman may always stop. Ghosts keep moving unless they are boxed in.
    fn get_legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return vec![];
        }

        let Some(position) = self.agent_positions[self.agent_index] else {
            return vec![];
        };

        let mut actions = self
            .board
            .get_neighbors(&position)
            .into_iter()
            .map(|(action, _)| action)
            .collect_vec();

        if self.agent_index == PACMAN_AGENT_INDEX || actions.is_empty() {
            actions.push(Action::Stop);
        }

        actions
    }

    /// The standard rules are deterministic, `rng` is not drawn from. A move into a
    /// wall leaves the agent where it is.
    fn generate_successor<R: Rng + ?Sized>(&self, action: Action, _rng: &mut R) -> Self {
        let mut next = self.clone();
        if next.is_over() {
            return next;
        }

        let mover = next.agent_index;
        if let Some(from) = next.agent_positions[mover] {
            let target = from.add_vec(action);
            let to = if next.board.is_wall(&target) {
                from
            } else {
                target
            };
            next.agent_positions[mover] = Some(to);

            if mover == PACMAN_AGENT_INDEX {
                next.score -= TIME_PENALTY;
                next.consume(&to);
            } else {
                next.scared_timers[mover] = next.scared_timers[mover].saturating_sub(1);
            }

            next.resolve_collisions();
        }

        next.turn += 1;
        next.agent_index = (mover + 1) % next.agent_positions.len();

        next
    }
}

impl Display for PacmanGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = (0..self.board.height())
            .map(|row| {
                (0..self.board.width())
                    .map(|col| {
                        let position = Position::new(row, col);

                        if self.get_agent_position(PACMAN_AGENT_INDEX) == Some(position) {
                            'P'
                        } else if self
                            .ghost_indices()
                            .any(|i| self.agent_positions[i] == Some(position))
                        {
                            'G'
                        } else if self.board.is_wall(&position) {
                            '%'
                        } else if self.get_capsules().contains(&position) {
                            'o'
                        } else if self.get_food().contains(&position) {
                            '.'
                        } else {
                            ' '
                        }
                    })
                    .collect::<String>()
            })
            .join("\n");

        write!(f, "{}", rendered)
    }
}
