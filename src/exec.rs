use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::errors::BenchdiffError;

/// Run `tool` with `args`, blocking until it exits, and return its exit status.
///
/// `env` is merged on top of the inherited process environment. Without an
/// `output_file` the child's stdout/stderr pass straight through to the
/// console; with one, every byte the child writes is fanned out to both the
/// console stream and the file. stdin is always inherited.
///
/// A non-zero exit status is not an error here — callers classify it. Errors
/// cover output-file setup, spawning, and the fan-out writes themselves.
pub fn run_command(
    tool: &str,
    args: &[String],
    env: Option<&HashMap<String, String>>,
    output_file: Option<&Path>,
) -> Result<ExitStatus> {
    info!("exec: {} {}", tool, args.join(" "));
    println!("exec: {} {}", tool, args.join(" "));

    let mut cmd = Command::new(tool);
    cmd.args(args);
    cmd.stdin(Stdio::inherit());
    if let Some(overlay) = env {
        cmd.envs(overlay);
    }

    let status = match output_file {
        Some(path) => run_with_capture(cmd, tool, path)?,
        None => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            let mut child = spawn(cmd, tool)?;
            child.wait().context("wait for command")?
        }
    };

    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

/// Capture variant: child stdout/stderr are piped and pumped to both the
/// console and `path` until the child closes them.
fn run_with_capture(mut cmd: Command, tool: &str, path: &Path) -> Result<ExitStatus> {
    let file = create_output_file(path)?;
    let file = Arc::new(Mutex::new(BufWriter::new(file)));

    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = spawn(cmd, tool)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_file = Arc::clone(&file);
    let stdout_pump = thread::spawn(move || pump(stdout, std::io::stdout(), &stdout_file));
    let stderr_file = Arc::clone(&file);
    let stderr_pump = thread::spawn(move || pump(stderr, std::io::stderr(), &stderr_file));

    let status = child.wait().context("wait for command")?;

    join_pump(stdout_pump, path)?;
    join_pump(stderr_pump, path)?;

    // BufWriter would swallow late write errors on drop; flush surfaces them.
    let mut writer = file
        .lock()
        .map_err(|_| anyhow!("output file lock poisoned"))?;
    writer
        .flush()
        .map_err(|source| BenchdiffError::OutputFileWrite {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(status)
}

fn spawn(mut cmd: Command, tool: &str) -> Result<std::process::Child> {
    cmd.spawn().map_err(|source| {
        BenchdiffError::CommandSpawn {
            tool: tool.to_string(),
            source,
        }
        .into()
    })
}

/// Create/truncate the output file, creating its parent directory first.
fn create_output_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|source| BenchdiffError::OutputFileCreate {
            path: path.to_path_buf(),
            source,
        })?;
    }

    File::create(path).map_err(|source| {
        BenchdiffError::OutputFileCreate {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Copy everything from `reader` to both `console` and the shared file.
fn pump<R: Read, W: Write>(
    mut reader: R,
    mut console: W,
    file: &Mutex<BufWriter<File>>,
) -> std::io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        console.write_all(&chunk[..n])?;
        console.flush()?;
        let mut writer = file
            .lock()
            .map_err(|_| std::io::Error::other("output file lock poisoned"))?;
        writer.write_all(&chunk[..n])?;
    }
    Ok(())
}

fn join_pump(handle: thread::JoinHandle<std::io::Result<()>>, path: &Path) -> Result<()> {
    match handle.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(BenchdiffError::OutputFileWrite {
            path: path.to_path_buf(),
            source,
        }
        .into()),
        Err(_) => Err(anyhow!("output pump thread panicked")),
    }
}
