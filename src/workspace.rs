use std::process::Command;

use anyhow::Result;
use serde::Deserialize;

use crate::errors::BenchdiffError;

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
}

/// Resolve the ordered set of project package names via `cargo metadata`.
pub fn list_packages() -> Result<Vec<String>> {
    let output = Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .map_err(|e| BenchdiffError::PackageListing {
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BenchdiffError::PackageListing {
            detail: format!(
                "cargo metadata exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        }
        .into());
    }

    parse_metadata(&output.stdout)
}

fn parse_metadata(bytes: &[u8]) -> Result<Vec<String>> {
    let metadata: Metadata =
        serde_json::from_slice(bytes).map_err(|e| BenchdiffError::PackageListing {
            detail: e.to_string(),
        })?;

    Ok(metadata.packages.into_iter().map(|p| p.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_metadata_extracts_names_in_order() {
        let json = br#"{
            "packages": [
                {"name": "alpha", "version": "0.1.0", "dependencies": []},
                {"name": "beta", "version": "2.3.1", "dependencies": []}
            ],
            "workspace_root": "/tmp/project"
        }"#;

        let packages = parse_metadata(json).unwrap();
        assert_eq!(packages, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn parse_metadata_rejects_garbage() {
        let result = parse_metadata(b"not json at all");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to list project packages")
        );
    }

    #[test]
    fn lists_the_enclosing_project() {
        // cargo is on PATH when running under `cargo test`, and the crate
        // root is the working directory.
        let packages = list_packages().unwrap();
        assert!(packages.contains(&"benchdiff".to_string()));
    }
}
