use std::{fmt::Debug, marker::PhantomData};

use decorum::N64;
use derivative::Derivative;
use pacman_types::{
    types::{SimulableGame, VictorDeterminableGame, PACMAN_AGENT_INDEX},
    Action,
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::{MinimaxError, Scorable};

/// How the agents other than the maximizing one are assumed to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdversaryModel {
    /// Every adversary picks the move that is worst for us
    Minimizing,
    /// Every adversary picks uniformly at random, we score the expectation
    Expecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Optional properties that can be defined for a [MinimaxStepper]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use pacman_minimax::{AdversaryModel, MinimaxOptions};
///
/// let defaults: MinimaxOptions = Default::default();
///
/// assert_eq!(defaults.depth, 2);
/// assert!(!defaults.alphabeta_prune);
/// assert_eq!(defaults.adversary_model, AdversaryModel::Minimizing);
/// ```
pub struct MinimaxOptions {
    /// How many full rounds (every agent moving once) to look ahead
    pub depth: usize,
    /// Skip branches that cannot change the chosen score.
    ///
    /// Only applies to [AdversaryModel::Minimizing], expectations need every child.
    pub alphabeta_prune: bool,
    #[allow(missing_docs)]
    pub adversary_model: AdversaryModel,
}

impl Default for MinimaxOptions {
    fn default() -> Self {
        Self {
            depth: 2,
            alphabeta_prune: false,
            adversary_model: AdversaryModel::Minimizing,
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
/// This is the struct that wraps a scoring function and can be used to run minimax,
/// alpha-beta or expectimax over any [SimulableGame]
///
/// It also outputs traces using the [tracing] crate.
pub struct MinimaxStepper<GameType, ScorableType> {
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Used to tell agents apart in traces
    pub name: &'static str,
    options: MinimaxOptions,
    #[derivative(Debug = "ignore")]
    _phantom: PhantomData<fn(&GameType)>,
}

impl<GameType, ScorableType> MinimaxStepper<GameType, ScorableType>
where
    GameType: SimulableGame + VictorDeterminableGame,
    ScorableType: Scorable<GameType>,
{
    /// Construct a new `MinimaxStepper`
    pub fn new(score_function: ScorableType, name: &'static str, options: MinimaxOptions) -> Self {
        Self {
            score_function,
            name,
            options,
            _phantom: PhantomData,
        }
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &MinimaxOptions {
        &self.options
    }

    fn evaluate(&self, state: &GameType) -> N64 {
        N64::from(self.score_function.score(state))
    }

    /// Pick the action the maximizing agent should take from `state`
    ///
    /// Runs [MinimaxStepper::minimax_step] from ply 0 with an open alpha-beta window.
    /// When several actions tie for the best score one is picked uniformly at random
    /// using `rng`.
    ///
    /// Pruned searches can report a cut off action as tied with the best one, so with
    /// pruning on the tied actions are scored again with an open window and only those
    /// that really reach the best score are kept.
    ///
    /// Errors with [MinimaxError::ZeroDepth] when the options ask for a depth of 0.
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        rng: &mut R,
    ) -> Result<Action, MinimaxError> {
        info_span!(
            "minimax_choose_action",
            agent_name = self.name,
            depth = self.options.depth,
            alphabeta_prune = self.options.alphabeta_prune,
            adversary_model = ?self.options.adversary_model,
            chosen_score = tracing::field::Empty,
            chosen_action = tracing::field::Empty,
            candidates = tracing::field::Empty,
        )
        .in_scope(|| {
            if self.options.depth == 0 {
                return Err(MinimaxError::ZeroDepth);
            }

            let (best_actions, score) = self.minimax_step(
                state,
                0,
                N64::from(f64::NEG_INFINITY),
                N64::from(f64::INFINITY),
                rng,
            )?;
            let best_actions = self.confirm_ties(state, best_actions, score, rng)?;

            let chosen = *best_actions
                .choose(rng)
                .ok_or(MinimaxError::NoLegalActions)?;

            let current_span = tracing::Span::current();
            current_span.record("chosen_score", score.into_inner());
            current_span.record("chosen_action", chosen.to_string().as_str());
            current_span.record("candidates", best_actions.len());

            Ok(chosen)
        })
    }

    /// Drop root actions whose tie with `score` came from a pruning bound
    fn confirm_ties<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        candidates: Vec<Action>,
        score: N64,
        rng: &mut R,
    ) -> Result<Vec<Action>, MinimaxError> {
        if !self.options.alphabeta_prune || candidates.len() < 2 {
            return Ok(candidates);
        }

        let mut confirmed = Vec::with_capacity(candidates.len());
        for &action in &candidates {
            let successor = state.generate_successor(action, rng);
            let (_, child_score) = self.minimax_step(
                &successor,
                1,
                N64::from(f64::NEG_INFINITY),
                N64::from(f64::INFINITY),
                rng,
            )?;

            if child_score == score {
                confirmed.push(action);
            }
        }

        if confirmed.is_empty() {
            debug!(candidates = candidates.len(), "no tie survived rescoring");
            return Ok(candidates);
        }

        Ok(confirmed)
    }

    /// One ply of the search.
    ///
    /// Returns a leaf evaluation when the game is over, the depth limit is reached or
    /// the agent to move has no legal actions. Otherwise dispatches to the max, min or
    /// expectation step for the agent whose turn it is, with `ply_count` advanced by one.
    pub fn minimax_step<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        ply_count: usize,
        alpha: N64,
        beta: N64,
        rng: &mut R,
    ) -> Result<(Vec<Action>, N64), MinimaxError> {
        if state.is_over() || ply_count >= self.options.depth * state.num_agents() {
            return Ok((vec![], self.evaluate(state)));
        }

        let legal_actions = state.get_legal_actions();
        if legal_actions.is_empty() {
            return Ok((vec![], self.evaluate(state)));
        }

        let ply_count = ply_count + 1;

        if state.agent_index() == PACMAN_AGENT_INDEX {
            return self.minimax_step_max(state, ply_count, &legal_actions, alpha, beta, rng);
        }

        match self.options.adversary_model {
            AdversaryModel::Minimizing => {
                self.minimax_step_min(state, ply_count, &legal_actions, alpha, beta, rng)
            }
            AdversaryModel::Expecting => {
                let score = self.minimax_step_expected_min(
                    state,
                    ply_count,
                    &legal_actions,
                    alpha,
                    beta,
                    rng,
                )?;

                Ok((vec![], score))
            }
        }
    }

    /// The maximizing agent's step: every action achieving the best child score, and
    /// that score.
    ///
    /// With pruning on, `alpha` is raised to the running best and the remaining
    /// actions are skipped once `alpha >= beta`.
    pub fn minimax_step_max<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        ply_count: usize,
        legal_actions: &[Action],
        alpha: N64,
        beta: N64,
        rng: &mut R,
    ) -> Result<(Vec<Action>, N64), MinimaxError> {
        let mut alpha = alpha;
        let mut best_score = N64::from(f64::NEG_INFINITY);
        let mut best_actions = vec![];

        for &action in legal_actions {
            let successor = state.generate_successor(action, rng);
            let (_, score) = self.minimax_step(&successor, ply_count, alpha, beta, rng)?;

            if score > best_score {
                best_score = score;
                best_actions = vec![action];
            } else if score == best_score {
                best_actions.push(action);
            }

            if self.options.alphabeta_prune {
                alpha = std::cmp::max(alpha, best_score);
                if alpha >= beta {
                    debug!(ply_count, "alpha cutoff");
                    break;
                }
            }
        }

        Ok((best_actions, best_score))
    }

    /// An adversary's step: every action achieving the lowest child score, and that
    /// score.
    ///
    /// With pruning on, `beta` is lowered to the running best and the remaining
    /// actions are skipped once `beta <= alpha`.
    pub fn minimax_step_min<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        ply_count: usize,
        legal_actions: &[Action],
        alpha: N64,
        beta: N64,
        rng: &mut R,
    ) -> Result<(Vec<Action>, N64), MinimaxError> {
        let mut beta = beta;
        let mut best_score = N64::from(f64::INFINITY);
        let mut best_actions = vec![];

        for &action in legal_actions {
            let successor = state.generate_successor(action, rng);
            let (_, score) = self.minimax_step(&successor, ply_count, alpha, beta, rng)?;

            if score < best_score {
                best_score = score;
                best_actions = vec![action];
            } else if score == best_score {
                best_actions.push(action);
            }

            if self.options.alphabeta_prune {
                beta = std::cmp::min(beta, best_score);
                if beta <= alpha {
                    debug!(ply_count, "beta cutoff");
                    break;
                }
            }
        }

        Ok((best_actions, best_score))
    }

    /// A random adversary's step: the mean child score over every legal action.
    ///
    /// `alpha` and `beta` are passed through untouched, nothing below a chance node is
    /// ever pruned.
    pub fn minimax_step_expected_min<R: Rng + ?Sized>(
        &self,
        state: &GameType,
        ply_count: usize,
        legal_actions: &[Action],
        alpha: N64,
        beta: N64,
        rng: &mut R,
    ) -> Result<N64, MinimaxError> {
        if legal_actions.is_empty() {
            return Err(MinimaxError::EmptyLegalActionSet {
                agent_index: state.agent_index(),
            });
        }

        let mut total_score = 0.0;
        for &action in legal_actions {
            let successor = state.generate_successor(action, rng);
            let (_, score) = self.minimax_step(&successor, ply_count, alpha, beta, rng)?;

            total_score += score.into_inner();
        }

        Ok(N64::from(total_score / legal_actions.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// A game where every agent always has the same actions available, and the score
    /// is a number spelling out the path taken
    #[derive(Debug, Clone)]
    struct TreeGame {
        history: Vec<Action>,
        num_agents: usize,
        actions: Vec<Action>,
    }

    impl TreeGame {
        fn new(num_agents: usize) -> Self {
            Self {
                history: vec![],
                num_agents,
                actions: vec![Action::North, Action::East, Action::South],
            }
        }
    }

    impl SimulableGame for TreeGame {
        fn num_agents(&self) -> usize {
            self.num_agents
        }

        fn agent_index(&self) -> usize {
            self.history.len() % self.num_agents
        }

        fn get_legal_actions(&self) -> Vec<Action> {
            self.actions.clone()
        }

        fn generate_successor<R: Rng + ?Sized>(&self, action: Action, _rng: &mut R) -> Self {
            let mut next = self.clone();
            next.history.push(action);
            next
        }
    }

    impl VictorDeterminableGame for TreeGame {
        fn is_over(&self) -> bool {
            false
        }
    }

    fn weight(action: Action) -> f64 {
        match action {
            Action::North => 1.0,
            Action::East => 2.0,
            Action::South => 4.0,
            Action::West => 8.0,
            Action::Stop => 0.0,
        }
    }

    /// The first move is the ones digit, the second the tens digit, and so on
    fn path_score(game: &TreeGame) -> f64 {
        game.history
            .iter()
            .enumerate()
            .map(|(i, a)| weight(*a) * 10f64.powi(i as i32))
            .sum()
    }

    fn window() -> (N64, N64) {
        (N64::from(f64::NEG_INFINITY), N64::from(f64::INFINITY))
    }

    fn options(depth: usize, alphabeta_prune: bool, adversary_model: AdversaryModel) -> MinimaxOptions {
        MinimaxOptions {
            depth,
            alphabeta_prune,
            adversary_model,
        }
    }

    #[test]
    fn test_minimax_picks_best_worst_case() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(1, false, AdversaryModel::Minimizing),
        );
        let (alpha, beta) = window();
        let mut rng = StdRng::seed_from_u64(0);

        let (actions, score) = stepper
            .minimax_step(&TreeGame::new(2), 0, alpha, beta, &mut rng)
            .unwrap();

        // The adversary always answers North (worth 10), so we take our biggest digit
        assert_eq!(actions, vec![Action::South]);
        assert_eq!(score, N64::from(14.0));
    }

    #[test]
    fn test_alphabeta_matches_minimax() {
        let mut rng = StdRng::seed_from_u64(0);
        let (alpha, beta) = window();

        for num_agents in 2..=3 {
            for depth in 1..=2 {
                let plain = MinimaxStepper::new(
                    path_score,
                    "plain",
                    options(depth, false, AdversaryModel::Minimizing),
                );
                let pruned = MinimaxStepper::new(
                    path_score,
                    "pruned",
                    options(depth, true, AdversaryModel::Minimizing),
                );
                let game = TreeGame::new(num_agents);

                let (_, plain_score) = plain
                    .minimax_step(&game, 0, alpha, beta, &mut rng)
                    .unwrap();
                let (_, pruned_score) = pruned
                    .minimax_step(&game, 0, alpha, beta, &mut rng)
                    .unwrap();

                assert_eq!(plain_score, pruned_score, "{num_agents} agents, depth {depth}");
            }
        }
    }

    #[test]
    fn test_expected_min_is_the_mean() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(1, false, AdversaryModel::Expecting),
        );
        let (alpha, beta) = window();
        let mut rng = StdRng::seed_from_u64(0);

        let mut game = TreeGame::new(2);
        game.history.push(Action::North);
        let legal_actions = game.get_legal_actions();

        let score = stepper
            .minimax_step_expected_min(&game, 2, &legal_actions, alpha, beta, &mut rng)
            .unwrap();

        // Children are 11, 21 and 41
        assert!((score.into_inner() - 73.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_expectimax_value() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(1, false, AdversaryModel::Expecting),
        );
        let (alpha, beta) = window();
        let mut rng = StdRng::seed_from_u64(0);

        let (actions, score) = stepper
            .minimax_step(&TreeGame::new(2), 0, alpha, beta, &mut rng)
            .unwrap();

        assert_eq!(actions, vec![Action::South]);
        assert!((score.into_inner() - (4.0 + 70.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_expected_min_without_actions_is_an_error() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(1, false, AdversaryModel::Expecting),
        );
        let (alpha, beta) = window();
        let mut rng = StdRng::seed_from_u64(0);

        let mut game = TreeGame::new(2);
        game.history.push(Action::North);

        assert_eq!(
            stepper.minimax_step_expected_min(&game, 2, &[], alpha, beta, &mut rng),
            Err(MinimaxError::EmptyLegalActionSet { agent_index: 1 })
        );
    }

    #[test]
    fn test_ties_keep_every_action() {
        let stepper = MinimaxStepper::new(
            |_: &TreeGame| 0.0,
            "test",
            options(1, true, AdversaryModel::Minimizing),
        );
        let (alpha, beta) = window();
        let mut rng = StdRng::seed_from_u64(0);

        let (actions, score) = stepper
            .minimax_step(&TreeGame::new(2), 0, alpha, beta, &mut rng)
            .unwrap();

        assert_eq!(actions, vec![Action::North, Action::East, Action::South]);
        assert_eq!(score, N64::from(0.0));
    }

    #[test]
    fn test_choose_action_breaks_ties_within_candidates() {
        let stepper = MinimaxStepper::new(
            |_: &TreeGame| 0.0,
            "test",
            options(1, false, AdversaryModel::Minimizing),
        );

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = stepper.choose_action(&TreeGame::new(2), &mut rng).unwrap();

            assert!([Action::North, Action::East, Action::South].contains(&action));
        }
    }

    #[test]
    fn test_choose_action_without_actions() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(1, false, AdversaryModel::Minimizing),
        );
        let mut game = TreeGame::new(2);
        game.actions.clear();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            stepper.choose_action(&game, &mut rng),
            Err(MinimaxError::NoLegalActions)
        );
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let stepper = MinimaxStepper::new(
            path_score,
            "test",
            options(0, false, AdversaryModel::Minimizing),
        );
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            stepper.choose_action(&TreeGame::new(2), &mut rng),
            Err(MinimaxError::ZeroDepth)
        );
    }

    /// Pacman picks North or East, then the ghost answers. After North the ghost can
    /// only go North (worth 5), after East it can go North (5) or East (3).
    #[derive(Debug, Clone)]
    struct LopsidedGame {
        history: Vec<Action>,
    }

    impl SimulableGame for LopsidedGame {
        fn num_agents(&self) -> usize {
            2
        }

        fn agent_index(&self) -> usize {
            self.history.len() % 2
        }

        fn get_legal_actions(&self) -> Vec<Action> {
            match self.history.as_slice() {
                [] => vec![Action::North, Action::East],
                [Action::North] => vec![Action::North],
                [_] => vec![Action::North, Action::East],
                _ => vec![],
            }
        }

        fn generate_successor<R: Rng + ?Sized>(&self, action: Action, _rng: &mut R) -> Self {
            let mut next = self.clone();
            next.history.push(action);
            next
        }
    }

    impl VictorDeterminableGame for LopsidedGame {
        fn is_over(&self) -> bool {
            self.history.len() >= 2
        }
    }

    fn lopsided_score(game: &LopsidedGame) -> f64 {
        match game.history.as_slice() {
            [Action::East, Action::East] => 3.0,
            _ => 5.0,
        }
    }

    #[test]
    fn test_pruned_ties_are_confirmed_at_the_root() {
        let game = LopsidedGame { history: vec![] };
        let (alpha, beta) = window();

        let plain = MinimaxStepper::new(
            lopsided_score,
            "plain",
            options(1, false, AdversaryModel::Minimizing),
        );
        let pruned = MinimaxStepper::new(
            lopsided_score,
            "pruned",
            options(1, true, AdversaryModel::Minimizing),
        );
        let mut rng = StdRng::seed_from_u64(0);

        let (plain_actions, plain_score) =
            plain.minimax_step(&game, 0, alpha, beta, &mut rng).unwrap();
        assert_eq!(plain_actions, vec![Action::North]);

        // East gets cut off at the bound 5 and looks like a tie
        let (pruned_actions, pruned_score) =
            pruned.minimax_step(&game, 0, alpha, beta, &mut rng).unwrap();
        assert_eq!(pruned_score, plain_score);
        assert_eq!(pruned_actions, vec![Action::North, Action::East]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(pruned.choose_action(&game, &mut rng), Ok(Action::North));
        }
    }

    #[test]
    fn test_options_from_json() {
        let options: MinimaxOptions =
            serde_json::from_str(r#"{"depth": 3, "adversary_model": "expecting"}"#).unwrap();

        assert_eq!(options.depth, 3);
        assert!(!options.alphabeta_prune);
        assert_eq!(options.adversary_model, AdversaryModel::Expecting);
    }
}
