//! Build-graph query tool invocation.

use crate::error::{PodgenError, Result};
use std::path::PathBuf;
use std::process::Command;

/// Source of `--output xml` query results for a single package.
pub trait QueryRunner {
    /// Return the XML describing every target in `package` (e.g. `//absl/base`).
    fn query_package(&self, package: &str) -> Result<String>;
}

/// Runs `<tool> query "<package>:all" --output xml` as a subprocess.
#[derive(Clone, Debug)]
pub struct BazelQuery {
    program: String,
    workspace: PathBuf,
}

impl BazelQuery {
    pub fn new(program: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workspace: workspace.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl QueryRunner for BazelQuery {
    fn query_package(&self, package: &str) -> Result<String> {
        let target = format!("{}:all", package);
        tracing::debug!(program = %self.program, %target, "running build-graph query");

        let output = Command::new(&self.program)
            .args(["query", &target, "--output", "xml"])
            .current_dir(&self.workspace)
            .output()
            .map_err(|source| PodgenError::QuerySpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PodgenError::QueryFailed {
                package: package.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| PodgenError::InvalidOutput {
            package: package.to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("fake-bazel");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_passes_query_arguments() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "echo \"$@\"");
        let runner = BazelQuery::new(script, dir.path());

        let out = runner.query_package("//absl/base").unwrap();
        assert_eq!(out.trim(), "query //absl/base:all --output xml");
    }

    #[test]
    fn test_non_zero_exit_is_fatal() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "echo 'no such package' >&2; exit 7");
        let runner = BazelQuery::new(script, dir.path());

        let err = runner.query_package("//absl/base").unwrap_err();
        match err {
            PodgenError::QueryFailed {
                package, stderr, ..
            } => {
                assert_eq!(package, "//absl/base");
                assert_eq!(stderr, "no such package");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let runner = BazelQuery::new("/nonexistent/podgen-query-tool", dir.path());
        assert!(matches!(
            runner.query_package("//absl/base"),
            Err(PodgenError::QuerySpawn { .. })
        ));
    }
}
