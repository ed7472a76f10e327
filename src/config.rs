use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, warn};

use crate::errors::BenchdiffError;

/// Sample count passed to the bench harness when BENCH_COUNT is not set.
pub const DEFAULT_BENCH_COUNT: u32 = 8;

/// Configuration for the `run` operation, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub count: u32,
    pub output: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_values(env_opt("BENCH_COUNT"), env_opt("OUTPUT"))
    }

    fn from_values(count: Option<String>, output: Option<String>) -> Result<Self> {
        let count = match count {
            Some(raw) => parse_count(&raw)?,
            None => DEFAULT_BENCH_COUNT,
        };

        Ok(Self {
            count,
            output: output.map(PathBuf::from),
        })
    }
}

/// Configuration for the `diff` operation, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    pub base: PathBuf,
    pub next: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl DiffConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_values(env_opt("BASE"), env_opt("NEXT"), env_opt("OUTPUT"))
    }

    fn from_values(
        base: Option<String>,
        next: Option<String>,
        output: Option<String>,
    ) -> Result<Self> {
        let Some(base) = base else {
            error!("missing required BASE variable, cannot parse results");
            return Err(BenchdiffError::MissingBaseFile.into());
        };

        if next.is_none() {
            warn!("NEXT is not set, results will not be compared");
        }

        Ok(Self {
            base: PathBuf::from(base),
            next: next.map(PathBuf::from),
            output: output.map(PathBuf::from),
        })
    }
}

fn parse_count(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BenchdiffError::InvalidBenchCount {
            value: raw.to_string(),
        }
        .into()),
    }
}

/// Reads an environment variable, treating unset and empty as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_defaults_count() {
        let config = RunConfig::from_values(None, None).unwrap();
        assert_eq!(config.count, DEFAULT_BENCH_COUNT);
        assert_eq!(config.output, None);
    }

    #[test]
    fn run_config_parses_count_override() {
        let config = RunConfig::from_values(Some("17".to_string()), None).unwrap();
        assert_eq!(config.count, 17);
    }

    #[test]
    fn run_config_rejects_non_integer_count() {
        let result = RunConfig::from_values(Some("eight".to_string()), None);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("BENCH_COUNT"));
        assert!(err.to_string().contains("eight"));
    }

    #[test]
    fn run_config_rejects_zero_count() {
        assert!(RunConfig::from_values(Some("0".to_string()), None).is_err());
    }

    #[test]
    fn run_config_rejects_negative_count() {
        assert!(RunConfig::from_values(Some("-3".to_string()), None).is_err());
    }

    #[test]
    fn run_config_keeps_output_path() {
        let config =
            RunConfig::from_values(None, Some("build/bench/out.txt".to_string())).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("build/bench/out.txt")));
    }

    #[test]
    fn diff_config_requires_base() {
        let result = DiffConfig::from_values(None, Some("next.txt".to_string()), None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("BASE"));
    }

    #[test]
    fn diff_config_treats_empty_base_as_missing() {
        // from_env never yields Some("") thanks to env_opt, so mirror that here.
        assert!(env_opt("BENCHDIFF_TEST_UNSET_VARIABLE").is_none());
        assert!(DiffConfig::from_values(None, None, None).is_err());
    }

    #[test]
    fn diff_config_base_only() {
        let config = DiffConfig::from_values(Some("base.txt".to_string()), None, None).unwrap();
        assert_eq!(config.base, PathBuf::from("base.txt"));
        assert_eq!(config.next, None);
    }

    #[test]
    fn diff_config_base_and_next() {
        let config = DiffConfig::from_values(
            Some("base.txt".to_string()),
            Some("next.txt".to_string()),
            Some("out.txt".to_string()),
        )
        .unwrap();
        assert_eq!(config.base, PathBuf::from("base.txt"));
        assert_eq!(config.next, Some(PathBuf::from("next.txt")));
        assert_eq!(config.output, Some(PathBuf::from("out.txt")));
    }
}
