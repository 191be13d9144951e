use crate::grid::solution::Solution;
use crate::search::polynom::Polynom;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridbust", about = "SameGame solver", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve a grid
    Solve(SolveArgs),
    /// Generate a random grid and save it to a file
    Generate(GenerateArgs),
    /// Show a grid
    Show(ShowArgs),
    /// Generate random grids and solve them back to back
    Benchmark(BenchmarkArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoringKind {
    Greedy,
    Potential,
    NumBlocksNotInGroups,
}

#[derive(Args)]
pub struct ScoringArgs {
    /// Type of scoring
    #[arg(long, value_enum)]
    pub scoring: ScoringKind,
    /// Group score, as a polynomial in the group size
    #[arg(long)]
    pub scoring_group_score: Option<Polynom>,
    /// Bonus for clearing a grid
    #[arg(long)]
    pub scoring_clearance_bonus: Option<i32>,
    /// Penalty when a grid is not cleared, as a polynomial in the
    /// number of blocks left
    #[arg(long)]
    pub scoring_leftover_penalty: Option<Polynom>,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Grid file (.bgf)
    pub grid_file: PathBuf,
    #[command(flatten)]
    pub scoring: ScoringArgs,
    /// Solution prefix to apply before searching
    #[arg(long)]
    pub prefix: Option<Solution>,
    /// Maximum beam size
    #[arg(short = 's', long)]
    pub max_beam_size: Option<usize>,
    /// Maximum search depth
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,
    /// Disable beam trimming
    #[arg(long)]
    pub no_trim: bool,
    /// Trimming safety factor
    #[arg(long, default_value_t = 1.25)]
    pub trimming_safety_factor: f64,
    /// Quiet mode
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Destination path for the grid file (.bgf)
    pub grid_file: PathBuf,
    /// Seed to use for randomization
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of columns in the grid
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub width: u8,
    /// Number of rows in the grid
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub height: u8,
    /// Number of colors in the grid
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    pub num_colors: u8,
    /// Minimal group size
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=65025))]
    pub min_group_size: u32,
    /// Quiet mode
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Grid file (.bgf)
    pub grid_file: PathBuf,
    /// Solution steps to show
    #[arg(long)]
    pub solution: Option<Solution>,
}

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of columns in the grids
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub width: u8,
    /// Number of rows in the grids
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub height: u8,
    /// Number of colors in the grids
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    pub num_colors: u8,
    /// Minimal group size
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=65025))]
    pub min_group_size: u32,
    /// Seed to use for randomization
    #[arg(long)]
    pub seed: Option<u64>,
    /// How many grids to generate and solve
    #[arg(long, default_value_t = 10)]
    pub num_grids: usize,
    #[command(flatten)]
    pub scoring: ScoringArgs,
    /// Maximum beam size
    #[arg(short = 's', long)]
    pub max_beam_size: Option<usize>,
}
