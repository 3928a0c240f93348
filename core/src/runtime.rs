//! Container runtime abstraction.
//!
//! The stack reconciler only needs a handful of management calls; they are
//! expressed here as a trait over plain data types so the reconciler can be
//! driven by the Docker client in production and by an in-memory fake in
//! tests.

use async_trait::async_trait;

use crate::error::{Result, StackError};

/// Outcome of an idempotent removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The container existed and was removed.
    Removed,
    /// No container by that name existed.
    Absent,
}

/// One row of the runtime's container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Name without the leading `/`.
    pub name: String,
    /// Human-readable status, e.g. "Up 3 minutes".
    pub status: String,
    /// Machine state, e.g. "running", "created", "exited".
    pub state: String,
    pub image: String,
}

impl ContainerSummary {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Inspected container metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDetails {
    pub id: String,
    /// Name without the leading `/`.
    pub name: String,
    /// Current address, `None` when not attached to any network.
    pub ip_address: Option<String>,
    pub running: bool,
    pub volumes_from: Vec<String>,
    pub binds: Vec<String>,
}

/// Everything needed to create a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Command override; `None` keeps the image default.
    pub cmd: Option<Vec<String>>,
    pub hostname: Option<String>,
    pub tty: bool,
    pub open_stdin: bool,
    /// Anonymous volumes declared by the container.
    pub volumes: Vec<String>,
    /// Host bind mounts (`host:container[:mode]`).
    pub binds: Vec<String>,
    /// Containers whose volumes are mounted into this one.
    pub volumes_from: Vec<String>,
}

/// Captured result of a one-shot command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Interleaved stdout and stderr.
    pub output: String,
    /// Exit code, if the runtime reported one.
    pub exit_code: Option<i64>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code.unwrap_or(0) == 0
    }
}

/// Management calls the stack reconciler issues against a container runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List every container, running or not.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Inspect one container. A missing container yields `StackError::NotFound`.
    async fn inspect_container(&self, name: &str) -> Result<ContainerDetails>;

    /// Create a container and return its identifier.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String>;

    async fn start_container(&self, name: &str) -> Result<()>;

    /// Force-remove a container; absence is reported, not raised.
    async fn remove_container(&self, name: &str) -> Result<Removal>;

    /// Run a command to completion inside a running container.
    async fn exec(&self, name: &str, cmd: &[String]) -> Result<ExecOutput>;

    /// Whether a container with this name exists.
    async fn exists(&self, name: &str) -> Result<bool> {
        match self.inspect_container(name).await {
            Ok(_) => Ok(true),
            Err(StackError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_running() {
        let mut summary = ContainerSummary {
            state: "running".to_string(),
            ..Default::default()
        };
        assert!(summary.is_running());
        summary.state = "exited".to_string();
        assert!(!summary.is_running());
    }

    #[test]
    fn test_exec_output_success() {
        let ok = ExecOutput {
            output: String::new(),
            exit_code: Some(0),
        };
        assert!(ok.success());

        let unknown = ExecOutput::default();
        assert!(unknown.success());

        let failed = ExecOutput {
            output: "boom".to_string(),
            exit_code: Some(2),
        };
        assert!(!failed.success());
    }
}
