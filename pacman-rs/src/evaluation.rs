//! Heuristic evaluation of game states.
//!
//! Both evaluators start from the game score and add terms for food, ghosts and
//! capsules. The reflex evaluator also discourages pacing back and forth, the search
//! evaluator instead pushes pacman to go eat the capsules.

use std::collections::VecDeque;

use pacman_types::{
    manhattan_distance,
    types::{
        AgentPositionGettableGame, FoodGettableGame, GhostPositionGettableGame,
        ScoreGettableGame,
    },
    Position,
};

pub const NEAREST_FOOD_WEIGHT: f64 = 10.0;
pub const REMAINING_FOOD_PENALTY: f64 = 4.0;
pub const GHOST_CONTACT_PENALTY: f64 = 300.0;
pub const GHOST_NEARBY_PENALTY: f64 = 30.0;
pub const GHOST_NEARBY_RANGE: f64 = 3.0;
pub const SCARED_GHOST_WEIGHT: f64 = 50.0;
pub const NEAREST_CAPSULE_WEIGHT: f64 = 5.0;
pub const REMAINING_CAPSULE_PENALTY: f64 = 10.0;
pub const REVISIT_PENALTY: f64 = 15.0;

/// How many recent positions the reflex agent remembers
pub const DEFAULT_HISTORY_CAPACITY: usize = 4;

/// The last few positions an agent stood on, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistory {
    positions: VecDeque<Position>,
    capacity: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember `position`, forgetting the oldest one when full
    pub fn push(&mut self, position: Position) {
        if self.capacity == 0 {
            return;
        }
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(position);
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn nearest_distance<'a>(from: &Position, targets: impl IntoIterator<Item = &'a Position>) -> Option<f64> {
    targets
        .into_iter()
        .map(|target| manhattan_distance(from, target))
        .reduce(f64::min)
}

/// The terms both evaluators agree on
fn common_terms<G>(state: &G, position: &Position) -> f64
where
    G: ScoreGettableGame + FoodGettableGame + GhostPositionGettableGame,
{
    let mut score = state.get_score();

    let food = state.get_food();
    score += match nearest_distance(position, food) {
        Some(distance) => NEAREST_FOOD_WEIGHT / (distance + 1.0),
        None => NEAREST_FOOD_WEIGHT,
    };
    score -= REMAINING_FOOD_PENALTY * food.len() as f64;

    for ghost in state.get_nonscared_ghost_positions().values() {
        let distance = manhattan_distance(position, ghost);
        if distance <= 1.0 {
            score -= GHOST_CONTACT_PENALTY;
        } else if distance <= GHOST_NEARBY_RANGE {
            score -= GHOST_NEARBY_PENALTY / distance;
        }
    }

    for ghost in state.get_scared_ghost_positions().values() {
        let distance = manhattan_distance(position, ghost);
        score += SCARED_GHOST_WEIGHT / (distance + 1.0);
    }

    if let Some(distance) = nearest_distance(position, state.get_capsules()) {
        score += NEAREST_CAPSULE_WEIGHT / (distance + 1.0);
    }

    score
}

/// Evaluator for one step lookahead.
///
/// Returns negative infinity when the agent is no longer on the board. Standing on a
/// position from `recent_positions` costs a flat penalty.
pub fn reflex_state_eval<G>(state: &G, agent_index: usize, recent_positions: &PositionHistory) -> f64
where
    G: ScoreGettableGame + AgentPositionGettableGame + FoodGettableGame + GhostPositionGettableGame,
{
    let Some(position) = state.get_agent_position(agent_index) else {
        return f64::NEG_INFINITY;
    };

    let mut score = common_terms(state, &position);
    if recent_positions.contains(&position) {
        score -= REVISIT_PENALTY;
    }

    score
}

/// Evaluator for the minimax family.
///
/// Returns negative infinity when the agent is no longer on the board. Every capsule
/// still on the board costs a flat penalty.
pub fn better_state_eval<G>(state: &G, agent_index: usize) -> f64
where
    G: ScoreGettableGame + AgentPositionGettableGame + FoodGettableGame + GhostPositionGettableGame,
{
    let Some(position) = state.get_agent_position(agent_index) else {
        return f64::NEG_INFINITY;
    };

    common_terms(state, &position) - REMAINING_CAPSULE_PENALTY * state.get_capsules().len() as f64
}
