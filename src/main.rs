use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use benchdiff::bench;
use benchdiff::logging;
use benchdiff::tools;

#[derive(Parser)]
#[command(
    name = "benchdiff",
    version,
    about = "Run and compare Cargo benchmark suites across a workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the benchmark suites of every project package.
    ///
    /// Set OUTPUT to capture the combined output to a file and BENCH_COUNT
    /// to override the default sample count.
    Run,
    /// Compare two captured benchmark result files with critcmp.
    ///
    /// Requires BASE; set NEXT to compare against it and OUTPUT to write the
    /// comparison to a file.
    Diff,
    /// Install the critcmp dependency at the pinned version.
    Deps,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run => bench::run(),
        Command::Diff => bench::diff(),
        Command::Deps => tools::ensure_critcmp(),
    }
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
