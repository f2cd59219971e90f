/// This trait is used to control something that can return a score from a game state
///
/// Higher is better for the maximizing agent. Returning `f64::NEG_INFINITY` marks a
/// state as maximally undesirable (e.g. the maximizing agent has been eliminated), and
/// comparisons in the stepper stay well defined. Scores must never be NaN.
pub trait Scorable<GameType> {
    /// Convert the given GameType into a score
    fn score(&self, game: &GameType) -> f64;
}

impl<GameType, FnLike: Fn(&GameType) -> f64> Scorable<GameType> for FnLike {
    fn score(&self, game: &GameType) -> f64 {
        (self)(game)
    }
}
