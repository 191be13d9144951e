use super::beam::Beam;
use super::score::Score;
use super::scoring::Scoring;
use crate::error::Error;
use crate::grid::compact::CompactGrid;
use crate::grid::grid::Grid;
use crate::grid::solution::Solution;
use crate::grid::solution::MAX_STEP;
use crate::Value;
use parking_lot::Mutex;
use parking_lot::RwLock;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// what a finished search hands back: the lowest score value seen
/// at any terminal state, the play that reached it (prefix included)
/// and the grid that play leaves behind
pub struct SolverResult {
    pub best_score: Value,
    pub best_solution: Solution,
    pub solution_grid: Grid,
}

/// the best-so-far fields, guarded together by one mutex
#[derive(Default)]
struct Best {
    score: Option<Value>,
    solution: Solution,
    grid: Option<Grid>,
}

/// bounded-beam best-first search over grid states. each round
/// drains the current frontier bucket by bucket in ascending score
/// order, expands states in parallel, and collects the children
/// into the next frontier; terminal children compete for the best
/// solution instead. the beam cap throttles producers and the
/// trimming pass cuts the frontier back to a predicted safe size
/// before each round.
pub struct Solver {
    pub max_beam_size: Option<usize>,
    pub max_depth: Option<usize>,
    pub trimming_enabled: bool,
    pub trimming_safety_factor: f64,
    pub quiet: bool,
    min_group_size: usize,
    depth: usize,
    beam: Beam,
    beam_size: usize,
    /// children produced per state expanded in the last round,
    /// used to predict the next round's growth when trimming
    multiplier: f64,
    solution_prefix: Solution,
    stop: AtomicBool,
    best: Mutex<Best>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_beam_size: None,
            max_depth: None,
            trimming_enabled: true,
            trimming_safety_factor: 1.25,
            quiet: false,
            min_group_size: 0,
            depth: 0,
            beam: Beam::default(),
            beam_size: 0,
            multiplier: 0.0,
            solution_prefix: Solution::default(),
            stop: AtomicBool::new(false),
            best: Mutex::new(Best::default()),
        }
    }
}

impl Solver {
    /// search from the given grid, after applying the solution
    /// prefix to a private copy. returns None when no terminal
    /// state was reached within the configured bounds.
    pub fn solve(
        &mut self,
        grid: &Grid,
        min_group_size: usize,
        scoring: &dyn Scoring,
        prefix: &Solution,
    ) -> Result<Option<SolverResult>, Error> {
        self.min_group_size = min_group_size;
        self.solution_prefix = prefix.clone();
        self.beam = Beam::default();
        self.beam_size = 1;
        self.multiplier = 0.0;
        self.depth = 0;
        self.stop = AtomicBool::new(false);
        *self.best.lock() = Best::default();

        let mut start = grid.clone();
        if !prefix.is_empty() {
            start.apply_solution(prefix, min_group_size)?;
        }
        let initial = scoring.create_score(&start, min_group_size);
        if initial.is_terminal() {
            self.check_solution(scoring, &start, initial);
            self.beam_size = 0;
        } else {
            self.beam.insert(initial, CompactGrid::from(start));
        }

        while !self.stopped() && self.max_depth.map_or(true, |d| self.depth < d) {
            if !self.quiet {
                self.stats();
            }
            if self.trimming_enabled {
                self.trim_beam();
            }
            let max_depth_reached = self.max_depth.is_some_and(|d| self.depth + 1 == d);
            self.solve_depth(scoring, max_depth_reached);
            self.depth += 1;
        }

        let best = std::mem::take(&mut *self.best.lock());
        Ok(best.score.map(|score| SolverResult {
            best_score: score,
            best_solution: best.solution,
            solution_grid: best.grid.expect("a best grid accompanies a best score"),
        }))
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn beam_full(&self, inserted: &AtomicUsize) -> bool {
        self.max_beam_size
            .is_some_and(|cap| inserted.load(Ordering::Relaxed) >= cap)
    }

    /// expand every state of the current frontier one step, head
    /// bucket first, items of a bucket in parallel. the frontier
    /// is consumed destructively so drained buckets free their
    /// memory before the round ends.
    fn solve_depth(&mut self, scoring: &dyn Scoring, max_depth_reached: bool) {
        let new_beam = RwLock::new(Beam::default());
        let inserted = AtomicUsize::new(0);
        let solved = AtomicUsize::new(0);
        while let Some((score, mut bucket)) = self.beam.pop_first() {
            bucket.drain().into_par_iter().for_each(|compact| {
                if self.stopped() || self.beam_full(&inserted) {
                    return;
                }
                let added =
                    self.solve_grid(scoring, compact.expand(), score, &new_beam, max_depth_reached);
                inserted.fetch_add(added, Ordering::Relaxed);
                solved.fetch_add(1, Ordering::Relaxed);
            });
            if self.stopped() || self.beam_full(&inserted) {
                break;
            }
        }
        let inserted = inserted.into_inner();
        let solved = solved.into_inner();
        self.multiplier = inserted as f64 / solved.max(1) as f64;
        if inserted == 0 {
            self.halt();
        }
        self.beam = new_beam.into_inner();
        self.beam_size = inserted;
    }

    /// expand one state: enumerate its groups and produce one child
    /// per group. terminal children are judged as candidate
    /// solutions; the rest go into the next frontier, unless this
    /// is the final depth. returns how many children were new.
    fn solve_grid(
        &self,
        scoring: &dyn Scoring,
        grid: Grid,
        score: Score,
        new_beam: &RwLock<Beam>,
        max_depth_reached: bool,
    ) -> usize {
        let groups = grid.groups(self.min_group_size);
        let mut inserted = 0;
        // a solution step is one byte; groups past that index are
        // unreachable in any replayable solution
        for (step, group) in groups.iter().enumerate().take(MAX_STEP as usize + 1) {
            let mut child = grid.child(step as u8);
            child.remove_group(group);
            let new_score =
                scoring.remove_group(score, &grid, group, &child, self.min_group_size);
            if new_score.is_terminal() {
                self.check_solution(scoring, &child, new_score);
            } else if !max_depth_reached {
                let bucket = Beam::get_or_create(new_beam, new_score);
                if bucket.insert(CompactGrid::from(child)) {
                    inserted += 1;
                }
            }
        }
        inserted
    }

    /// commit a terminal state if it strictly beats the best so
    /// far. under ties the earliest commit wins, which is why the
    /// comparison is strict. a perfect score stops the whole search.
    fn check_solution(&self, scoring: &dyn Scoring, grid: &Grid, score: Score) {
        if self.stopped() {
            return;
        }
        let mut best = self.best.lock();
        if self.stopped() {
            return;
        }
        if best.score.map_or(true, |b| score.value < b) {
            best.score = Some(score.value);
            best.solution = self.solution_prefix.concat(grid.solution());
            let mut solved = grid.clone();
            solved.set_solution(best.solution.clone());
            best.grid = Some(solved);
            log::info!("better solution found ({}): {}", score.value, best.solution);
            if scoring.is_perfect_score(score) {
                self.stop.store(true, Ordering::Relaxed);
            }
        }
    }

    /// raise the stop flag; written while holding the best-fields
    /// mutex so commits in flight never race a stopping search
    fn halt(&self) {
        let _best = self.best.lock();
        self.stop.store(true, Ordering::Relaxed);
    }

    /// cut the frontier down to the size whose expansion is
    /// predicted to land just under the beam cap
    fn trim_beam(&mut self) {
        let Some(cap) = self.max_beam_size else {
            return;
        };
        if self.multiplier <= 1.0 {
            return;
        }
        let reduced = (cap as f64 / self.multiplier * self.trimming_safety_factor).ceil() as usize;
        if self.beam_size > reduced {
            self.beam.trim(reduced);
            self.beam_size = reduced;
        }
    }

    fn stats(&self) {
        let (min, avg, max) = self.beam.value_stats().unwrap_or((0, 0.0, 0));
        let memory = resident_memory()
            .map(|bytes| format!(", memory: {}MB", bytes / 1024 / 1024))
            .unwrap_or_default();
        log::info!(
            "depth: {:>3}, grids: {:>9}, buckets: {:>4}, scores (min/avg/max): {}/{:.1}/{}{}",
            self.depth,
            self.beam_size,
            self.beam.num_buckets(),
            min,
            avg,
            max,
            memory,
        );
    }
}

/// resident set size of this process, where the platform exposes it
#[cfg(target_os = "linux")]
pub fn resident_memory() -> Option<usize> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let resident = statm.split_whitespace().nth(1)?.parse::<usize>().ok()?;
    let page_size = 4096;
    Some(resident * page_size)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_memory() -> Option<usize> {
    None
}
