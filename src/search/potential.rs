use super::polynom::Polynom;
use super::score::Score;
use super::scoring::Scoring;
use crate::grid::grid::Grid;
use crate::grid::position::Position;
use crate::Objective;
use crate::Value;

/// like Greedy on the value axis, but the objective subtracts the
/// score still available in the state's own groups: a one-ply
/// lookahead that pulls states with remaining potential toward
/// the head of the frontier.
pub struct Potential {
    group_score: Polynom,
    clearance_bonus: Value,
    leftover_penalty: Option<Polynom>,
}

impl Potential {
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
        let groups = grid.groups(min_group_size);
        if self.clearance_bonus != 0 && grid.is_empty() {
            value -= self.clearance_bonus;
        }
        if groups.is_empty() {
            if let Some(penalty) = &self.leftover_penalty {
                value += penalty.eval(grid.number_of_blocks() as Value);
            }
            return Score::terminal(value);
        }
        let potential: Value = groups
            .iter()
            .map(|group| self.group_score.eval(group.len() as Value))
            .sum();
        Score::with_objective(value, (value - potential) as Objective)
    }
}

impl Scoring for Potential {
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

    #[test]
    fn objective_discounts_available_groups() {
        let scoring = Potential::new("n^2-n".parse().unwrap(), 0, None);
        // two columns of three: each group worth 6
        let g = grid(2, 3, &[1, 2, 1, 2, 1, 2]);
        let score = scoring.create_score(&g, 2);
        assert_eq!(score.value, 0);
        assert_eq!(score.objective, -12.0);
    }

    #[test]
    fn value_matches_greedy() {
        let scoring = Potential::new("n^2-n".parse().unwrap(), 0, None);
        let g0 = grid(2, 3, &[1, 2, 1, 2, 1, 2]);
        let groups = g0.groups(2);
        let mut g1 = g0.clone();
        g1.remove_group(&groups[0]);
        let score = scoring.remove_group(scoring.create_score(&g0, 2), &g0, &groups[0], &g1, 2);
        assert_eq!(score.value, -6);
        // the other column is still worth 6
        assert_eq!(score.objective, -12.0);
    }

    #[test]
    fn terminal_when_no_groups_remain() {
        let scoring = Potential::new("n".parse().unwrap(), 0, None);
        let g = grid(1, 1, &[1]);
        assert!(scoring.create_score(&g, 2).is_terminal());
    }
}
