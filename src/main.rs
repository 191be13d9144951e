use clap::Parser;
use gridbust::cli::args::Cli;
use gridbust::cli::commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run(cli)
}
