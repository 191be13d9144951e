use super::block::Block;
use super::grid::Grid;
use super::solution::Solution;
use std::hash::{Hash, Hasher};

/// the packed form a grid takes while it sits in the frontier.
/// three bits per cell in row-major cell order: cell i occupies
/// bits 3i..3i+3 of a little-endian bit stream, so equal grids
/// pack to byte-identical buffers. identity is width, height and
/// the packed bytes; the solution rides along but two different
/// plays that reach the same physical state collapse to one entry.
#[derive(Debug)]
pub struct CompactGrid {
    width: u8,
    height: u8,
    data: Box<[u8]>,
    solution: Solution,
}

impl CompactGrid {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_len(width: u8, height: u8) -> usize {
        (width as usize * height as usize * 3 + 7) / 8
    }

    /// rebuild the full grid, blocks and solution included
    pub fn expand(&self) -> Grid {
        let cells = self.width as usize * self.height as usize;
        let mut blocks = Vec::with_capacity(cells);
        for i in 0..cells {
            let bit = i * 3;
            let mut v = (self.data[bit / 8] as u16) >> (bit % 8);
            if bit % 8 > 5 {
                v |= (self.data[bit / 8 + 1] as u16) << (8 - bit % 8);
            }
            blocks.push(Block::from((v & 0b111) as u8));
        }
        Grid::new(self.width, self.height, blocks, self.solution.clone())
    }
}

impl From<Grid> for CompactGrid {
    fn from(grid: Grid) -> Self {
        let mut data = vec![0u8; Self::data_len(grid.width(), grid.height())];
        for (i, &block) in grid.blocks().iter().enumerate() {
            let bit = i * 3;
            let v = (u8::from(block) as u16) << (bit % 8);
            data[bit / 8] |= v as u8;
            if bit % 8 > 5 {
                data[bit / 8 + 1] |= (v >> 8) as u8;
            }
        }
        let (width, height) = (grid.width(), grid.height());
        Self {
            width,
            height,
            data: data.into_boxed_slice(),
            solution: grid.into_solution(),
        }
    }
}

impl PartialEq for CompactGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}
impl Eq for CompactGrid {}

/// hashed by the packed bytes alone; equal grids have equal bytes
impl Hash for CompactGrid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHasher;

    fn grid(width: u8, height: u8, cells: &[u8], solution: &str) -> Grid {
        Grid::new(
            width,
            height,
            cells.iter().copied().map(Block::from).collect(),
            solution.parse().unwrap(),
        )
    }

    fn fx(grid: &CompactGrid) -> u64 {
        let mut hasher = FxHasher::default();
        grid.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn round_trip() {
        let g = grid(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 1], "AB");
        let expanded = CompactGrid::from(g.clone()).expand();
        assert_eq!(expanded, g);
        assert_eq!(expanded.solution(), g.solution());
    }

    #[test]
    fn round_trip_at_byte_boundaries() {
        // 8 cells spans exactly three bytes; 9 starts a fourth
        for cells in [8u8, 9, 16, 17] {
            let values = (0..cells).map(|i| i % 8).collect::<Vec<_>>();
            let g = grid(cells, 1, &values, "");
            assert_eq!(CompactGrid::from(g.clone()).expand(), g);
        }
    }

    #[test]
    fn byte_layout() {
        // cells 1, 2, 3 pack as 0b001, 0b010, 0b011 at bits 0, 3, 6
        let g = grid(3, 1, &[1, 2, 3], "");
        let compact = CompactGrid::from(g);
        assert_eq!(compact.data(), &[0b1101_0001, 0b0000_0000]);
    }

    #[test]
    fn data_length() {
        let g = grid(5, 5, &[1; 25], "");
        // 25 cells * 3 bits = 75 bits -> 10 bytes
        assert_eq!(CompactGrid::from(g).data().len(), 10);
    }

    #[test]
    fn identity_ignores_solution() {
        let a = CompactGrid::from(grid(2, 1, &[1, 2], "AB"));
        let b = CompactGrid::from(grid(2, 1, &[1, 2], "BA"));
        let c = CompactGrid::from(grid(2, 1, &[2, 1], "AB"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn equal_grids_hash_alike() {
        let a = CompactGrid::from(grid(2, 2, &[1, 2, 3, 4], "A"));
        let b = CompactGrid::from(grid(2, 2, &[1, 2, 3, 4], ""));
        assert_eq!(a, b);
        assert_eq!(fx(&a), fx(&b));
    }
}
