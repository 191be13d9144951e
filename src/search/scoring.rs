use super::score::Score;
use crate::grid::grid::Grid;
use crate::grid::position::Position;

/// how the search values states. implementations are pure: the
/// same inputs always produce the same score. a scoring decides
/// for itself when a state is terminal and marks it with a NaN
/// objective; the solver trusts that marker, evaluates terminal
/// states as candidate solutions and keeps them out of the frontier.
pub trait Scoring: Send + Sync {
    /// score a state from scratch
    fn create_score(&self, grid: &Grid, min_group_size: usize) -> Score;

    /// derive a child state's score from its parent's
    fn remove_group(
        &self,
        old_score: Score,
        old_grid: &Grid,
        group: &[Position],
        new_grid: &Grid,
        min_group_size: usize,
    ) -> Score;

    /// a perfect score stops the search on the next commit
    fn is_perfect_score(&self, score: Score) -> bool;
}
