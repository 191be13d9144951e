use criterion::{criterion_group, criterion_main, Criterion};
use gridbust::grid::compact::CompactGrid;
use gridbust::grid::grid::Grid;
use gridbust::grid::solution::Solution;
use gridbust::search::greedy::Greedy;
use gridbust::search::solver::Solver;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn grid(width: u8, height: u8, num_colors: u8) -> Grid {
    let mut rng = SmallRng::seed_from_u64(2718);
    Grid::random(width, height, num_colors, &mut rng)
}

fn enumerate_groups(c: &mut Criterion) {
    let grid = grid(20, 10, 4);
    c.bench_function("groups 20x10", |b| b.iter(|| grid.groups(2)));
}

fn pack_and_expand(c: &mut Criterion) {
    let grid = grid(20, 10, 4);
    c.bench_function("compact round trip 20x10", |b| {
        b.iter(|| CompactGrid::from(grid.clone()).expand())
    });
}

fn solve_small(c: &mut Criterion) {
    let grid = grid(8, 8, 3);
    let scoring = Greedy::new("n^2-n".parse().unwrap(), 0, None);
    c.bench_function("solve 8x8 beam 1000", |b| {
        b.iter(|| {
            let mut solver = Solver::default();
            solver.quiet = true;
            solver.max_beam_size = Some(1_000);
            solver.solve(&grid, 2, &scoring, &Solution::default()).unwrap()
        })
    });
}

criterion_group!(benches, enumerate_groups, pack_and_expand, solve_small);
criterion_main!(benches);
