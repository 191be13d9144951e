use super::args::{
    BenchmarkArgs, Cli, Command, GenerateArgs, ScoringArgs, ScoringKind, ShowArgs, SolveArgs,
};
use crate::error::Error;
use crate::grid::grid::Grid;
use crate::grid::solution::Solution;
use crate::search::greedy::Greedy;
use crate::search::leftover::NumBlocksNotInGroups;
use crate::search::potential::Potential;
use crate::search::scoring::Scoring;
use crate::search::solver::Solver;
use anyhow::Context;
use clap::error::ErrorKind;
use clap::CommandFactory;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::time::Instant;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Solve(args) => solve(args),
        Command::Generate(args) => generate(args),
        Command::Show(args) => show(args),
        Command::Benchmark(args) => benchmark(args),
    }
}

fn argument_error(kind: ErrorKind, message: &str) -> ! {
    Cli::command().error(kind, message).exit()
}

/// scoring-option consistency is contextual, so clap cannot check
/// it declaratively; failures still exit like argument errors
fn scoring(args: &ScoringArgs) -> Box<dyn Scoring> {
    match args.scoring {
        ScoringKind::Greedy | ScoringKind::Potential => {
            let group_score = args.scoring_group_score.clone().unwrap_or_else(|| {
                argument_error(
                    ErrorKind::MissingRequiredArgument,
                    "--scoring-group-score is required for this scoring",
                )
            });
            let clearance_bonus = args.scoring_clearance_bonus.unwrap_or(0);
            let leftover_penalty = args.scoring_leftover_penalty.clone();
            match args.scoring {
                ScoringKind::Greedy => {
                    Box::new(Greedy::new(group_score, clearance_bonus, leftover_penalty))
                }
                _ => Box::new(Potential::new(group_score, clearance_bonus, leftover_penalty))
                    as Box<dyn Scoring>,
            }
        }
        ScoringKind::NumBlocksNotInGroups => {
            if args.scoring_group_score.is_some()
                || args.scoring_clearance_bonus.is_some()
                || args.scoring_leftover_penalty.is_some()
            {
                argument_error(
                    ErrorKind::ArgumentConflict,
                    "num-blocks-not-in-groups scoring takes no scoring options",
                );
            }
            Box::new(NumBlocksNotInGroups)
        }
    }
}

fn load(path: &std::path::Path) -> anyhow::Result<(Grid, usize)> {
    let file =
        File::open(path).with_context(|| format!("unable to open '{}'", path.display()))?;
    Ok(Grid::read(BufReader::new(file))?)
}

fn solve(args: SolveArgs) -> anyhow::Result<()> {
    crate::init(args.quiet);
    let scoring = scoring(&args.scoring);
    let (grid, min_group_size) = load(&args.grid_file)?;
    if !args.quiet {
        print!("{}", grid);
    }
    let mut solver = Solver::default();
    solver.max_beam_size = args.max_beam_size;
    solver.max_depth = args.max_depth;
    solver.trimming_enabled = !args.no_trim;
    solver.trimming_safety_factor = args.trimming_safety_factor;
    solver.quiet = args.quiet;
    log::info!("solving with {} threads", num_cpus::get());
    let prefix = args.prefix.unwrap_or_default();
    let started = Instant::now();
    let result = solver.solve(&grid, min_group_size, scoring.as_ref(), &prefix)?;
    let elapsed = started.elapsed();
    match result {
        Some(result) => {
            println!(
                "best solution found ({}): {} ({} step{})",
                result.best_score,
                result.best_solution,
                result.best_solution.len(),
                plural(result.best_solution.len()),
            );
            if !args.quiet && !result.solution_grid.is_empty() {
                print!("{}", result.solution_grid);
            }
        }
        None => println!("no solution found"),
    }
    if !args.quiet {
        println!("done, took {}ms", elapsed.as_millis());
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    crate::init(args.quiet);
    let mut rng = rng(args.seed);
    let grid = Grid::random(args.width, args.height, args.num_colors, &mut rng);
    let file = File::create(&args.grid_file)
        .with_context(|| format!("unable to write '{}'", args.grid_file.display()))?;
    grid.write(BufWriter::new(file), args.min_group_size as usize)?;
    if !args.quiet {
        print!("{}", grid);
    }
    Ok(())
}

fn show(args: ShowArgs) -> anyhow::Result<()> {
    crate::init(false);
    let (grid, min_group_size) = load(&args.grid_file)?;
    println!("size: {} x {}", grid.width(), grid.height());
    println!("number of colors: {}", grid.number_of_colors());
    println!("minimal group size: {}", min_group_size);
    println!();
    print!("{}", grid);
    if let Some(solution) = args.solution {
        println!();
        println!(
            "solution: {} ({} step{})",
            solution,
            solution.len(),
            plural(solution.len()),
        );
        let mut replay = grid;
        for (i, &step) in solution.steps().iter().enumerate() {
            let groups = replay.groups(min_group_size);
            let group = groups
                .get(step as usize)
                .ok_or(Error::InvalidSolutionForGrid)?;
            println!("{}. {} block{}", i + 1, group.len(), plural(group.len()));
            replay.remove_group(group);
            print!("{}", replay);
        }
    }
    Ok(())
}

fn benchmark(args: BenchmarkArgs) -> anyhow::Result<()> {
    crate::init(false);
    let scoring = scoring(&args.scoring);
    let mut rng = rng(args.seed);
    let mut solver = Solver::default();
    solver.max_beam_size = args.max_beam_size;
    solver.quiet = true;
    let mut scores = Vec::with_capacity(args.num_grids);
    let started = Instant::now();
    for i in 0..args.num_grids {
        let grid = Grid::random(args.width, args.height, args.num_colors, &mut rng);
        let result = solver.solve(
            &grid,
            args.min_group_size as usize,
            scoring.as_ref(),
            &Solution::default(),
        )?;
        match result {
            Some(result) => {
                log::info!(
                    "grid {:>3}: score {}, solution {}",
                    i + 1,
                    result.best_score,
                    result.best_solution,
                );
                scores.push(result.best_score);
            }
            None => log::info!("grid {:>3}: no solution found", i + 1),
        }
    }
    let elapsed = started.elapsed();
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len().max(1) as f64;
    println!(
        "solved {} of {} grids, mean score {:.1}, took {}ms",
        scores.len(),
        args.num_grids,
        mean,
        elapsed.as_millis(),
    );
    Ok(())
}

fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
