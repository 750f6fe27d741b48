//! Controller host interface
//!
//! A host accepts program text and, later, reports its configuration
//! snapshot. Submission only acknowledges receipt; execution happens on the
//! controller afterwards.

use async_trait::async_trait;
use probekit_core::HostError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Program submission and configuration snapshot access
#[async_trait]
pub trait ControllerHost: Send + Sync {
    /// Host name for logs
    fn name(&self) -> &str;

    /// Hand program text to the controller
    async fn submit_program(&self, program: &str) -> Result<(), HostError>;

    /// Read the host's current configuration snapshot
    async fn config_snapshot(&self) -> Result<Value, HostError>;
}

/// Offline host exchanging files with the operator
///
/// Submitted programs are written to a file to be run by hand; the snapshot
/// is read from a JSON export of the controller configuration.
#[derive(Debug, Clone)]
pub struct SnapshotFileHost {
    program_path: PathBuf,
    snapshot_path: PathBuf,
}

impl SnapshotFileHost {
    /// Host writing programs to `program_path` and reading `snapshot_path`
    pub fn new(program_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            program_path: program_path.into(),
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Where submitted programs are written
    pub fn program_path(&self) -> &Path {
        &self.program_path
    }

    /// Where the snapshot is read from
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

#[async_trait]
impl ControllerHost for SnapshotFileHost {
    fn name(&self) -> &str {
        "snapshot-file"
    }

    async fn submit_program(&self, program: &str) -> Result<(), HostError> {
        tokio::fs::write(&self.program_path, program)
            .await
            .map_err(|e| HostError::SubmissionRejected {
                reason: format!("{}: {}", self.program_path.display(), e),
            })?;
        info!(
            "Wrote program ({} bytes) to {}",
            program.len(),
            self.program_path.display()
        );
        Ok(())
    }

    async fn config_snapshot(&self) -> Result<Value, HostError> {
        let text = tokio::fs::read_to_string(&self.snapshot_path)
            .await
            .map_err(|e| HostError::SnapshotUnavailable {
                reason: format!("{}: {}", self.snapshot_path.display(), e),
            })?;
        debug!("Read snapshot from {}", self.snapshot_path.display());
        serde_json::from_str(&text).map_err(|e| HostError::SnapshotUnavailable {
            reason: format!("{} is not JSON: {}", self.snapshot_path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_host_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let host =
            SnapshotFileHost::new(dir.path().join("scan.sbp"), dir.path().join("config.json"));

        host.submit_program("&COMPLETE = 0\n").await.unwrap();
        let written = std::fs::read_to_string(host.program_path()).unwrap();
        assert_eq!(written, "&COMPLETE = 0\n");

        assert!(matches!(
            host.config_snapshot().await,
            Err(HostError::SnapshotUnavailable { .. })
        ));

        let snapshot = json!({ "opensbp": { "tempVariables": { "COMPLETE": 1 } } });
        std::fs::write(host.snapshot_path(), snapshot.to_string()).unwrap();
        assert_eq!(host.config_snapshot().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_invalid_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let host = SnapshotFileHost::new(dir.path().join("scan.sbp"), path);
        assert!(matches!(
            host.config_snapshot().await,
            Err(HostError::SnapshotUnavailable { .. })
        ));
    }
}
