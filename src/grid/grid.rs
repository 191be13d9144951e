use super::block::Block;
use super::position::Position;
use super::solution::Solution;
use super::Group;
use crate::error::Error;
use colored::Colorize;
use rand::Rng;
use std::cell::RefCell;
use std::fmt;

/// per-thread scratch for group discovery, so expanding
/// thousands of states does not allocate per call
#[derive(Default)]
struct Scratch {
    visited: Vec<bool>,
    stack: Vec<Position>,
}

thread_local! {
    static SCRATCH: RefCell<Scratch> = RefCell::new(Scratch::default());
}

/// a rectangular matrix of blocks plus the solution that
/// produced it from some origin grid. row-major storage,
/// y = 0 at the top. an empty grid is 0 x 0; after any
/// removal, empty cells sit above blocks within a column
/// and populated columns sit left of empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    blocks: Vec<Block>,
    solution: Solution,
}

impl Grid {
    pub fn new(width: u8, height: u8, blocks: Vec<Block>, solution: Solution) -> Self {
        assert_eq!(blocks.len(), width as usize * height as usize);
        assert_eq!(width == 0, height == 0);
        Self {
            width,
            height,
            blocks,
            solution,
        }
    }

    /// a full grid of uniformly random colors drawn from 1..=num_colors
    pub fn random(width: u8, height: u8, num_colors: u8, rng: &mut impl Rng) -> Self {
        assert!((1..=7).contains(&num_colors), "between 1 and 7 colors");
        let blocks = (0..width as usize * height as usize)
            .map(|_| Block::from(rng.random_range(1..=num_colors)))
            .collect();
        Self::new(width, height, blocks, Solution::default())
    }

    pub fn width(&self) -> u8 {
        self.width
    }
    pub fn height(&self) -> u8 {
        self.height
    }
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
    pub fn solution(&self) -> &Solution {
        &self.solution
    }
    pub fn set_solution(&mut self, solution: Solution) {
        self.solution = solution;
    }
    pub fn into_solution(self) -> Solution {
        self.solution
    }

    fn index(&self, x: u8, y: u8) -> usize {
        y as usize * self.width as usize + x as usize
    }
    pub fn at(&self, x: u8, y: u8) -> Block {
        self.blocks[self.index(x, y)]
    }
    fn set(&mut self, x: u8, y: u8, block: Block) {
        let i = self.index(x, y);
        self.blocks[i] = block;
    }

    pub fn number_of_blocks(&self) -> usize {
        self.blocks.iter().filter(|&&b| b != Block::Empty).count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&b| b == Block::Empty)
    }

    pub fn number_of_colors(&self) -> usize {
        let mut counts = [0usize; 8];
        for &block in &self.blocks {
            counts[u8::from(block) as usize] += 1;
        }
        counts[1..].iter().filter(|&&n| n != 0).count()
    }

    /// a copy of this grid whose solution records one more step.
    /// the caller removes the corresponding group right after.
    pub fn child(&self, step: u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            blocks: self.blocks.clone(),
            solution: self.solution.append(step),
        }
    }

    /// enumerate all 4-connected same-color regions of at least
    /// min_group_size cells. scan order is y outer, x inner, both
    /// ascending, which makes the enumeration deterministic; a cell
    /// whose right and down neighbors both differ in color cannot
    /// start a qualifying region under that order and is skipped.
    pub fn groups(&self, min_group_size: usize) -> Vec<Group> {
        let mut groups = Vec::new();
        SCRATCH.with(|scratch| {
            let scratch = &mut *scratch.borrow_mut();
            scratch.visited.clear();
            scratch.visited.resize(self.blocks.len(), false);
            for y in 0..self.height {
                for x in 0..self.width {
                    let block = self.at(x, y);
                    if block == Block::Empty || scratch.visited[self.index(x, y)] {
                        continue;
                    }
                    if min_group_size > 1
                        && x != self.width - 1
                        && y != self.height - 1
                        && block != self.at(x + 1, y)
                        && block != self.at(x, y + 1)
                    {
                        continue;
                    }
                    let group = self.flood(x, y, block, &mut scratch.visited, &mut scratch.stack);
                    if group.len() >= min_group_size {
                        groups.push(group);
                    }
                }
            }
        });
        groups
    }

    /// like groups() but short-circuits at the first qualifying
    /// region. with min_group_size <= 1 any block forms a group.
    pub fn has_groups(&self, min_group_size: usize) -> bool {
        if min_group_size <= 1 {
            return !self.is_empty();
        }
        SCRATCH.with(|scratch| {
            let scratch = &mut *scratch.borrow_mut();
            scratch.visited.clear();
            scratch.visited.resize(self.blocks.len(), false);
            for y in 0..self.height {
                for x in 0..self.width {
                    let block = self.at(x, y);
                    if block == Block::Empty || scratch.visited[self.index(x, y)] {
                        continue;
                    }
                    if x != self.width - 1
                        && y != self.height - 1
                        && block != self.at(x + 1, y)
                        && block != self.at(x, y + 1)
                    {
                        continue;
                    }
                    let group = self.flood(x, y, block, &mut scratch.visited, &mut scratch.stack);
                    if group.len() >= min_group_size {
                        return true;
                    }
                }
            }
            false
        })
    }

    /// iterative flood fill over 4-neighbors of the same color
    fn flood(
        &self,
        x: u8,
        y: u8,
        color: Block,
        visited: &mut [bool],
        stack: &mut Vec<Position>,
    ) -> Group {
        let mut group = Group::new();
        stack.clear();
        stack.push(Position::new(x, y));
        visited[self.index(x, y)] = true;
        while let Some(position) = stack.pop() {
            let Position { x, y } = position;
            group.push(position);
            let mut visit = |x: u8, y: u8| {
                let i = self.index(x, y);
                if !visited[i] && self.blocks[i] == color {
                    visited[i] = true;
                    stack.push(Position::new(x, y));
                }
            };
            if x > 0 {
                visit(x - 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
            }
            if x < self.width - 1 {
                visit(x + 1, y);
            }
            if y < self.height - 1 {
                visit(x, y + 1);
            }
        }
        group
    }

    /// clear a group, let the dirty columns fall, pack columns
    /// leftward when the bottom row was touched, and shrink the
    /// storage to the tight bounding box. the attached solution
    /// is untouched.
    pub fn remove_group(&mut self, group: &[Position]) {
        if group.is_empty() {
            return;
        }
        let mut left = u8::MAX;
        let mut right = 0;
        let mut bottom = 0;
        for &Position { x, y } in group {
            left = left.min(x);
            right = right.max(x);
            bottom = bottom.max(y);
            self.set(x, y, Block::Empty);
        }
        for x in left..=right {
            let mut yy = bottom;
            for y in (0..=bottom).rev() {
                if self.at(x, y) != Block::Empty {
                    if yy != y {
                        let block = self.at(x, y);
                        self.set(x, yy, block);
                        self.set(x, y, Block::Empty);
                    }
                    yy = yy.wrapping_sub(1);
                }
            }
        }
        let mut new_width = self.width;
        if bottom == self.height - 1 {
            let mut xx = left;
            for x in left..self.width {
                if self.at(x, self.height - 1) != Block::Empty {
                    if xx != x {
                        for y in 0..self.height {
                            let block = self.at(x, y);
                            self.set(xx, y, block);
                            self.set(x, y, Block::Empty);
                        }
                    }
                    xx += 1;
                }
            }
            new_width = xx;
        }
        let first = self
            .blocks
            .iter()
            .position(|&b| b != Block::Empty)
            .unwrap_or(self.blocks.len());
        let mut new_height = self.height - (first / self.width.max(1) as usize) as u8;
        if new_height == 0 {
            new_width = 0;
        }
        if new_width != self.width || new_height != self.height {
            let dropped = (self.height - new_height) as usize;
            let mut blocks = Vec::with_capacity(new_width as usize * new_height as usize);
            for y in 0..new_height as usize {
                for x in 0..new_width as usize {
                    blocks.push(self.blocks[(y + dropped) * self.width as usize + x]);
                }
            }
            self.width = new_width;
            self.height = new_height;
            self.blocks = blocks;
        }
    }

    /// replay a solution step by step. fails without touching the
    /// grid any further when a step indexes past the group count
    /// at its depth.
    pub fn apply_solution(
        &mut self,
        solution: &Solution,
        min_group_size: usize,
    ) -> Result<(), Error> {
        for &step in solution.steps() {
            let groups = self.groups(min_group_size);
            let group = groups
                .get(step as usize)
                .ok_or(Error::InvalidSolutionForGrid)?;
            self.remove_group(group);
        }
        Ok(())
    }
}

/// two spaces per cell on an ANSI background color,
/// reset at the end of every row
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = match self.at(x, y) {
                    Block::Empty => "  ".on_black(),
                    Block::White => "  ".on_white(),
                    Block::Red => "  ".on_red(),
                    Block::Green => "  ".on_green(),
                    Block::Blue => "  ".on_blue(),
                    Block::Magenta => "  ".on_magenta(),
                    Block::Yellow => "  ".on_yellow(),
                    Block::Cyan => "  ".on_cyan(),
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
