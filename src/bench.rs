//! The two benchmark targets: run every package's bench suites, and diff two
//! captured result files with critcmp.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use crate::config::{DiffConfig, RunConfig};
use crate::errors::BenchdiffError;
use crate::exec;
use crate::tools;
use crate::workspace;

/// Test runner the benchmark suites are executed through.
pub const TEST_RUNNER: &str = "cargo";

/// Execute the benchmark suites of every project package.
///
/// Reads BENCH_COUNT (sample count override) and OUTPUT (capture file) from
/// the environment.
pub fn run() -> Result<()> {
    tools::ensure_critcmp()?;
    banner("cargo bench");

    let config = RunConfig::from_env()?;
    let packages = workspace::list_packages()?;
    let args = run_args(&config, &packages);

    let status = exec::run_command(TEST_RUNNER, &args, None, config.output.as_deref())?;
    if !status.success() {
        return Err(BenchdiffError::CommandFailed {
            tool: "cargo bench".to_string(),
            status,
        }
        .into());
    }

    Ok(())
}

/// Compare two captured benchmark result files.
///
/// Reads BASE (required), NEXT (optional; absent means the base file is just
/// reported, not compared) and OUTPUT from the environment.
pub fn diff() -> Result<()> {
    tools::ensure_critcmp()?;
    banner(tools::CRITCMP);

    let config = DiffConfig::from_env()?;
    let args = diff_args(&config);

    let status = exec::run_command(tools::CRITCMP, &args, None, config.output.as_deref())?;
    if !status.success() {
        return Err(BenchdiffError::CommandFailed {
            tool: tools::CRITCMP.to_string(),
            status,
        }
        .into());
    }

    Ok(())
}

fn banner(what: &str) {
    println!(
        ">> running: {}",
        what.if_supports_color(Stream::Stdout, |s| s.green())
    );
}

/// Argument list for the test runner.
///
/// Cargo wants harness arguments after the `--` separator, so the sample
/// count lands at the end: `bench --benches [--package <pkg>*]... --
/// --sample-size <count>`. The trailing `*` makes each package spec a glob
/// covering the package and any packages named under it.
pub fn run_args(config: &RunConfig, packages: &[String]) -> Vec<String> {
    let mut args = vec!["bench".to_string(), "--benches".to_string()];
    for package in packages {
        args.push("--package".to_string());
        args.push(format!("{package}*"));
    }
    args.push("--".to_string());
    args.push("--sample-size".to_string());
    args.push(config.count.to_string());
    args
}

/// Argument list for the comparison tool: base path, then next if present.
pub fn diff_args(config: &DiffConfig) -> Vec<String> {
    let mut args = vec![config.base.display().to_string()];
    if let Some(ref next) = config.next {
        args.push(next.display().to_string());
    }
    args
}
