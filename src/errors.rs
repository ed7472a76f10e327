use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum BenchdiffError {
    #[error("Failed to parse BENCH_COUNT '{value}': expected a positive integer")]
    InvalidBenchCount { value: String },

    #[error("Missing required BASE variable. Set it to the filepath of the baseline benchmark results")]
    MissingBaseFile,

    #[error("Failed to create output file {path}: {source}")]
    OutputFileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write command output to {path}: {source}")]
    OutputFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start '{tool}': {source}")]
    CommandSpawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("Failed to execute {tool} command: {status}")]
    CommandFailed { tool: String, status: ExitStatus },

    #[error("Failed to list project packages: {detail}")]
    PackageListing { detail: String },

    #[error("Failed to install critcmp: {detail}")]
    ToolInstall { detail: String },
}
