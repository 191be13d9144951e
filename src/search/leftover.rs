use super::score::Score;
use super::scoring::Scoring;
use crate::grid::grid::Grid;
use crate::grid::position::Position;
use crate::Value;

/// counts the blocks that sit outside every qualifying group.
/// minimizing it steers the search toward states where as little
/// of the grid as possible is stranded.
pub struct NumBlocksNotInGroups;

impl Scoring for NumBlocksNotInGroups {
    fn create_score(&self, grid: &Grid, min_group_size: usize) -> Score {
        let groups = grid.groups(min_group_size);
        let in_groups: usize = groups.iter().map(|group| group.len()).sum();
        let value = (grid.number_of_blocks() - in_groups) as Value;
        if groups.is_empty() {
            Score::terminal(value)
        } else {
            Score::new(value)
        }
    }

    fn remove_group(
        &self,
        _old_score: Score,
        _old_grid: &Grid,
        _group: &[Position],
        new_grid: &Grid,
        min_group_size: usize,
    ) -> Score {
        self.create_score(new_grid, min_group_size)
    }

    fn is_perfect_score(&self, _score: Score) -> bool {
        false
    }
}
