use std::process::{Command, Stdio};

use anyhow::Result;

use crate::errors::BenchdiffError;
use crate::exec;

/// Statistical comparison tool for captured benchmark results.
pub const CRITCMP: &str = "critcmp";

const CRITCMP_VERSION: &str = "0.1.8";

/// Ensure `critcmp` is available, installing the pinned version if it is not.
pub fn ensure_critcmp() -> Result<()> {
    if critcmp_present() {
        return Ok(());
    }

    let args: Vec<String> = ["install", CRITCMP, "--version", CRITCMP_VERSION, "--locked"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let status = exec::run_command("cargo", &args, None, None)?;
    if !status.success() {
        return Err(BenchdiffError::ToolInstall {
            detail: format!("cargo install exited with {status}"),
        }
        .into());
    }

    Ok(())
}

/// Quiet probe; any failure just means we fall through to the install.
fn critcmp_present() -> bool {
    Command::new(CRITCMP)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
