use crate::grid::compact::CompactGrid;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// shard count; high bits of the grid hash pick the shard
const SHARDS: usize = 64;

/// the set of distinct states sharing one score within the beam.
/// sharded so that parallel inserts from many workers contend on
/// narrow per-shard locks instead of a single one.
pub struct Bucket {
    shards: Vec<Mutex<FxHashSet<CompactGrid>>>,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            shards: (0..SHARDS).map(|_| Mutex::new(FxHashSet::default())).collect(),
        }
    }
}

impl Bucket {
    fn shard(grid: &CompactGrid) -> usize {
        let mut hasher = FxHasher::default();
        grid.hash(&mut hasher);
        (hasher.finish() >> (64 - SHARDS.trailing_zeros())) as usize
    }

    /// true when the grid was not present yet
    pub fn insert(&self, grid: CompactGrid) -> bool {
        self.shards[Self::shard(&grid)].lock().insert(grid)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// move every grid out, in shard order
    pub fn drain(&mut self) -> Vec<CompactGrid> {
        let mut grids = Vec::with_capacity(self.len());
        for shard in &mut self.shards {
            grids.extend(std::mem::take(shard.get_mut()));
        }
        grids
    }

    /// drop the first n grids in iteration order. grids within a
    /// bucket share a score and are interchangeable, so which ones
    /// go only matters for reproducibility, not for correctness.
    pub fn remove_first(&mut self, mut n: usize) {
        for shard in &mut self.shards {
            if n == 0 {
                return;
            }
            let set = shard.get_mut();
            if n >= set.len() {
                n -= set.len();
                set.clear();
            } else {
                let survivors = std::mem::take(set);
                set.extend(survivors.into_iter().skip(n));
                n = 0;
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
    fn deduplicates() {
        let bucket = Bucket::default();
        assert!(bucket.insert(compact(&[1, 2])));
        assert!(!bucket.insert(compact(&[1, 2])));
        assert!(bucket.insert(compact(&[2, 1])));
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn drains_everything() {
        let mut bucket = Bucket::default();
        for i in 1..=7 {
            bucket.insert(compact(&[i]));
        }
        assert_eq!(bucket.drain().len(), 7);
        assert!(bucket.is_empty());
    }

    #[test]
    fn removes_exactly_n() {
        let mut bucket = Bucket::default();
        for i in 1..=7 {
            bucket.insert(compact(&[i, i]));
        }
        bucket.remove_first(3);
        assert_eq!(bucket.len(), 4);
        bucket.remove_first(10);
        assert_eq!(bucket.len(), 0);
    }
}
