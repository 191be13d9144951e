use super::bucket::Bucket;
use super::score::Score;
use crate::grid::compact::CompactGrid;
use crate::Value;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// the frontier: buckets of unique states keyed and ordered by
/// score, lowest objective first. iteration and trimming always
/// work from the head, which holds the most promising states.
#[derive(Default)]
pub struct Beam {
    buckets: BTreeMap<Score, Arc<Bucket>>,
}

impl Beam {
    /// single-threaded insert, used to seed the initial state
    pub fn insert(&mut self, score: Score, grid: CompactGrid) -> bool {
        self.buckets.entry(score).or_default().insert(grid)
    }

    /// bucket lookup under a shared lock, creation under an
    /// exclusive one; inserts into the returned bucket then only
    /// contend on its internal shard locks
    pub fn get_or_create(shared: &RwLock<Beam>, score: Score) -> Arc<Bucket> {
        {
            let beam = shared.read();
            if let Some(bucket) = beam.buckets.get(&score) {
                return Arc::clone(bucket);
            }
        }
        let mut beam = shared.write();
        Arc::clone(beam.buckets.entry(score).or_default())
    }

    /// detach the lowest-scored bucket. the solver drains buckets
    /// head first, releasing each one's memory as it goes.
    pub fn pop_first(&mut self) -> Option<(Score, Bucket)> {
        let (score, bucket) = self.buckets.pop_first()?;
        let bucket = Arc::try_unwrap(bucket)
            .ok()
            .expect("no handles outlive the expansion round");
        Some((score, bucket))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// min, mean and max of the user-facing score values, weighted
    /// by bucket population
    pub fn value_stats(&self) -> Option<(Value, f64, Value)> {
        if self.buckets.is_empty() {
            return None;
        }
        let mut min = Value::MAX;
        let mut max = Value::MIN;
        let mut sum = 0i64;
        let mut count = 0usize;
        for (score, bucket) in &self.buckets {
            min = min.min(score.value);
            max = max.max(score.value);
            sum += score.value as i64 * bucket.len() as i64;
            count += bucket.len();
        }
        Some((min, sum as f64 / count.max(1) as f64, max))
    }

    /// cut the beam down to `reduced` states: walk buckets from the
    /// head accumulating sizes, thin out the bucket where the total
    /// first reaches the target, and drop every bucket above it.
    /// buckets below the split point are untouched.
    pub fn trim(&mut self, reduced: usize) {
        let mut accumulated = 0;
        let mut split = None;
        for (score, bucket) in &self.buckets {
            accumulated += bucket.len();
            if accumulated >= reduced {
                split = Some((*score, accumulated - reduced));
                break;
            }
        }
        let Some((split, overflow)) = split else {
            return;
        };
        let mut tail = self.buckets.split_off(&split);
        if let Some((score, bucket)) = tail.pop_first() {
            if overflow > 0 {
                let mut bucket = Arc::try_unwrap(bucket)
                    .ok()
                    .expect("no handles outlive the expansion round");
                bucket.remove_first(overflow);
                self.buckets.insert(score, Arc::new(bucket));
            } else {
                self.buckets.insert(score, bucket);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::block::Block;
    use crate::grid::grid::Grid;
    use crate::grid::solution::Solution;

    fn compact(cells: &[u8]) -> CompactGrid {
        CompactGrid::from(Grid::new(
            cells.len() as u8,
            1,
            cells.iter().copied().map(Block::from).collect(),
            Solution::default(),
        ))
    }

    #[test]
    fn size_is_sum_of_buckets() {
        let mut beam = Beam::default();
        beam.insert(Score::new(1), compact(&[1]));
        beam.insert(Score::new(1), compact(&[2]));
        beam.insert(Score::new(2), compact(&[3]));
        assert_eq!(beam.len(), 3);
        assert_eq!(beam.num_buckets(), 2);
    }

    #[test]
    fn duplicate_states_collapse() {
        let mut beam = Beam::default();
        assert!(beam.insert(Score::new(1), compact(&[1])));
        assert!(!beam.insert(Score::new(1), compact(&[1])));
        assert_eq!(beam.len(), 1);
    }

    #[test]
    fn pops_lowest_score_first() {
        let mut beam = Beam::default();
        beam.insert(Score::new(5), compact(&[1]));
        beam.insert(Score::new(-5), compact(&[2]));
        let (score, _) = beam.pop_first().unwrap();
        assert_eq!(score.value, -5);
    }

    #[test]
    fn get_or_create_shares_buckets() {
        let shared = RwLock::new(Beam::default());
        let a = Beam::get_or_create(&shared, Score::new(1));
        let b = Beam::get_or_create(&shared, Score::new(1));
        a.insert(compact(&[1]));
        assert_eq!(b.len(), 1);
        assert_eq!(shared.read().num_buckets(), 1);
    }

    #[test]
    fn trim_keeps_the_head() {
        let mut beam = Beam::default();
        for i in 1..=3u8 {
            beam.insert(Score::new(1), compact(&[i]));
        }
        for i in 1..=3u8 {
            beam.insert(Score::new(2), compact(&[i, i]));
        }
        for i in 1..=3u8 {
            beam.insert(Score::new(3), compact(&[i, i, i]));
        }
        beam.trim(5);
        assert_eq!(beam.len(), 5);
        // the lowest bucket is untouched, the split one is thinned,
        // everything above the split is gone
        assert_eq!(beam.num_buckets(), 2);
        let (head, bucket) = beam.pop_first().unwrap();
        assert_eq!(head.value, 1);
        assert_eq!(bucket.len(), 3);
    }

    #[test]
    fn trim_on_bucket_boundary_drops_whole_tail() {
        let mut beam = Beam::default();
        beam.insert(Score::new(1), compact(&[1]));
        beam.insert(Score::new(1), compact(&[2]));
        beam.insert(Score::new(2), compact(&[3]));
        beam.trim(2);
        assert_eq!(beam.len(), 2);
        assert_eq!(beam.num_buckets(), 1);
    }

    #[test]
    fn stats_weight_by_population() {
        let mut beam = Beam::default();
        beam.insert(Score::new(0), compact(&[1]));
        beam.insert(Score::new(0), compact(&[2]));
        beam.insert(Score::new(3), compact(&[3]));
        let (min, avg, max) = beam.value_stats().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 3);
        assert!((avg - 1.0).abs() < f64::EPSILON);
    }
}
