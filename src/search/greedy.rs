use super::polynom::Polynom;
use super::score::Score;
use super::scoring::Scoring;
use crate::grid::grid::Grid;
use crate::grid::position::Position;
use crate::Value;

/// values a state purely by the score accumulated so far:
/// minus group_score(|G|) per removed group, minus the clearance
/// bonus when the grid is cleared, plus leftover_penalty(#blocks)
/// once the state is stuck. the objective tracks the value.
pub struct Greedy {
    group_score: Polynom,
    clearance_bonus: Value,
    leftover_penalty: Option<Polynom>,
}

impl Greedy {
    pub fn new(
        group_score: Polynom,
        clearance_bonus: Value,
        leftover_penalty: Option<Polynom>,
    ) -> Self {
        Self {
            group_score,
            clearance_bonus,
            leftover_penalty,
        }
    }

    fn settle(&self, mut value: Value, grid: &Grid, min_group_size: usize) -> Score {
        if self.clearance_bonus != 0 && grid.is_empty() {
            value -= self.clearance_bonus;
        }
        if grid.has_groups(min_group_size) {
            Score::new(value)
        } else {
            if let Some(penalty) = &self.leftover_penalty {
                value += penalty.eval(grid.number_of_blocks() as Value);
            }
            Score::terminal(value)
        }
    }
}

impl Scoring for Greedy {
    fn create_score(&self, grid: &Grid, min_group_size: usize) -> Score {
        self.settle(0, grid, min_group_size)
    }

    fn remove_group(
        &self,
        old_score: Score,
        _old_grid: &Grid,
        group: &[Position],
        new_grid: &Grid,
        min_group_size: usize,
    ) -> Score {
        let value = old_score.value - self.group_score.eval(group.len() as Value);
        self.settle(value, new_grid, min_group_size)
    }

    fn is_perfect_score(&self, _score: Score) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::block::Block;
    use crate::grid::solution::Solution;

    fn grid(width: u8, height: u8, cells: &[u8]) -> Grid {
        Grid::new(
            width,
            height,
            cells.iter().copied().map(Block::from).collect(),
            Solution::default(),
        )
    }

    fn greedy() -> Greedy {
        Greedy::new("n^2-n".parse().unwrap(), 0, None)
    }

    #[test]
    fn accumulates_group_scores() {
        let scoring = greedy();
        let g0 = grid(2, 2, &[1, 1, 1, 1]);
        let old = scoring.create_score(&g0, 2);
        assert_eq!(old.value, 0);
        let groups = g0.groups(2);
        let mut g1 = g0.clone();
        g1.remove_group(&groups[0]);
        let new = scoring.remove_group(old, &g0, &groups[0], &g1, 2);
        // one group of four: -4 * 3
        assert_eq!(new.value, -12);
        assert!(new.is_terminal());
    }

    #[test]
    fn clearance_bonus_applies_on_empty() {
        let scoring = Greedy::new("n".parse().unwrap(), 100, None);
        let g0 = grid(2, 1, &[1, 1]);
        let groups = g0.groups(2);
        let mut g1 = g0.clone();
        g1.remove_group(&groups[0]);
        let new = scoring.remove_group(Score::new(0), &g0, &groups[0], &g1, 2);
        assert_eq!(new.value, -2 - 100);
    }

    #[test]
    fn leftover_penalty_applies_when_stuck() {
        let scoring = Greedy::new("n".parse().unwrap(), 0, Some("2n".parse().unwrap()));
        // removing the pair leaves one stranded block
        let g0 = grid(3, 1, &[1, 1, 2]);
        let groups = g0.groups(2);
        let mut g1 = g0.clone();
        g1.remove_group(&groups[0]);
        let new = scoring.remove_group(Score::new(0), &g0, &groups[0], &g1, 2);
        assert_eq!(new.value, -2 + 2);
        assert!(new.is_terminal());
    }

    #[test]
    fn scores_are_pure() {
        let scoring = greedy();
        let g = grid(2, 2, &[1, 1, 2, 2]);
        let a = scoring.create_score(&g, 2);
        let b = scoring.create_score(&g, 2);
        assert_eq!(a.value, b.value);
        assert_eq!(a.is_terminal(), b.is_terminal());
    }

    #[test]
    fn non_terminal_while_groups_remain() {
        let scoring = greedy();
        let g = grid(2, 2, &[1, 1, 2, 2]);
        assert!(!scoring.create_score(&g, 2).is_terminal());
    }
}
