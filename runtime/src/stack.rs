//! Stack reconciliation.
//!
//! `StackManager` resets the shared-storage container, recreates the node
//! containers, rewrites their hosts tables and tears everything down again.
//! All state lives in the container runtime; every call is issued one
//! container at a time in configured order, and nothing is retried.

use std::sync::Arc;

use nodestack_core::config::StackConfig;
use nodestack_core::error::{Result, StackError};
use nodestack_core::hosts::{generate_hosts_table, write_hosts_command, HostEntry};
use nodestack_core::runtime::{ContainerRuntime, ContainerSpec, ExecOutput, Removal};
use nodestack_core::volume::{to_binds, HostVolume};

/// Parameters of a stack (re)creation.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Image every node container is created from.
    pub image: String,
    /// Bindings applied identically to every node.
    pub host_volumes: Vec<HostVolume>,
    /// Command run once in every node after the hosts table is written.
    pub boot_command: Option<String>,
}

/// Output of a command run in one node container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub container: String,
    pub output: ExecOutput,
}

/// One row of the stack status table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub image: String,
    pub volumes_from: Vec<String>,
    pub binds: Vec<String>,
}

/// Mount options shared by every node of one creation.
#[derive(Debug, Clone, Default)]
struct NodeMounts {
    binds: Vec<String>,
    volumes_from: Vec<String>,
}

/// Drives a `ContainerRuntime` through the stack lifecycle.
pub struct StackManager {
    runtime: Arc<dyn ContainerRuntime>,
    config: StackConfig,
}

impl StackManager {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: StackConfig) -> Self {
        Self { runtime, config }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Reset the shared-storage container.
    ///
    /// The previous share container and its volume contents are destroyed.
    /// Returns the new container's identifier.
    pub async fn create_share(&self, image: &str) -> Result<String> {
        let share = &self.config.share;

        tracing::info!(container = %share.name, "Remove existing share container");
        self.remove_all(std::slice::from_ref(&share.name)).await?;

        tracing::info!(container = %share.name, image, "Create share container");
        let spec = ContainerSpec {
            name: share.name.clone(),
            image: image.to_string(),
            cmd: Some(share.command.clone()),
            volumes: vec![share.mount_point.clone()],
            ..Default::default()
        };
        self.runtime.create_container(&spec).await
    }

    /// Remove and recreate every node container.
    ///
    /// Nodes get volumes from the share container when it exists, plus the
    /// requested host bindings. After start the hosts table is rewritten in
    /// every node and the optional boot command is run once per node.
    pub async fn create_stack(&self, options: &CreateOptions) -> Result<Vec<CommandResult>> {
        let nodes = &self.config.nodes;

        tracing::info!("Remove existing containers");
        self.remove_all(nodes).await?;

        let mounts = self.resolve_mounts(&options.host_volumes).await?;

        for name in nodes {
            let spec = node_spec(name, &options.image, &mounts);
            tracing::info!(container = %name, image = %options.image, "Create node container");
            self.runtime.create_container(&spec).await?;
        }

        for name in nodes {
            tracing::info!(container = %name, "Start node container");
            self.runtime.start_container(name).await?;
        }

        self.refresh_hosts(nodes).await?;

        match &options.boot_command {
            Some(command) => self.run_boot_command(command).await,
            None => Ok(vec![]),
        }
    }

    /// Rewrite the hosts table in every running node container.
    ///
    /// Absent or stopped nodes are skipped. Returns the targeted names.
    pub async fn update_hosts(&self) -> Result<Vec<String>> {
        let listing = self.runtime.list_containers().await?;
        let running: Vec<String> = self
            .config
            .nodes
            .iter()
            .filter(|name| {
                listing
                    .iter()
                    .any(|c| &c.name == *name && c.is_running())
            })
            .cloned()
            .collect();

        for name in &self.config.nodes {
            if !running.contains(name) {
                tracing::warn!(container = %name, "Node is not running, skipping hosts update");
            }
        }

        if !running.is_empty() {
            self.refresh_hosts(&running).await?;
        }
        Ok(running)
    }

    /// Write an identical hosts table into every container in `containers`.
    ///
    /// Addresses are read from the live runtime on every call. Returns the
    /// table that was written.
    pub async fn refresh_hosts(&self, containers: &[String]) -> Result<String> {
        let mut entries = Vec::with_capacity(containers.len());
        for name in containers {
            let details = self.runtime.inspect_container(name).await?;
            let entry = HostEntry::from_details(&details)
                .ok_or_else(|| StackError::NoAddress(name.clone()))?;
            tracing::debug!(container = %name, address = %entry.address, "Resolved node address");
            entries.push(entry);
        }

        let table = generate_hosts_table(&entries);
        let cmd = write_hosts_command(&table);
        for name in containers {
            tracing::info!(container = %name, "Write hosts table");
            let result = self.runtime.exec(name, &cmd).await?;
            if !result.success() {
                return Err(StackError::ExecFailed {
                    container: name.clone(),
                    exit_code: result.exit_code.unwrap_or(-1),
                    output: result.output,
                });
            }
        }
        Ok(table)
    }

    /// Remove every node container and the share container.
    ///
    /// Returns how many containers actually existed.
    pub async fn cleanup(&self) -> Result<usize> {
        tracing::info!("Cleanup existing containers");
        self.remove_all(&self.config.managed_names()).await
    }

    /// Current state of the managed containers, in configured order.
    pub async fn status(&self) -> Result<Vec<StatusRow>> {
        let listing = self.runtime.list_containers().await?;
        let mut rows = Vec::new();

        for name in self.config.managed_names() {
            let Some(summary) = listing.iter().find(|c| c.name == name) else {
                continue;
            };
            let details = match self.runtime.inspect_container(&name).await {
                Ok(details) => details,
                // Removed between list and inspect.
                Err(StackError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            rows.push(StatusRow {
                id: summary.id.clone(),
                name,
                status: summary.status.clone(),
                image: summary.image.clone(),
                volumes_from: details.volumes_from,
                binds: details.binds,
            });
        }
        Ok(rows)
    }

    /// Remove each named container, treating absence as success.
    async fn remove_all(&self, names: &[String]) -> Result<usize> {
        let mut removed = 0;
        for name in names {
            match self.runtime.remove_container(name).await? {
                Removal::Removed => {
                    tracing::info!(container = %name, "Removed container");
                    removed += 1;
                }
                Removal::Absent => {
                    tracing::debug!(container = %name, "Container not present");
                }
            }
        }
        Ok(removed)
    }

    async fn resolve_mounts(&self, host_volumes: &[HostVolume]) -> Result<NodeMounts> {
        let share = &self.config.share.name;
        let volumes_from = if self.runtime.exists(share).await? {
            tracing::info!(share = %share, "Start with share storage");
            vec![share.clone()]
        } else {
            vec![]
        };

        Ok(NodeMounts {
            binds: to_binds(host_volumes),
            volumes_from,
        })
    }

    async fn run_boot_command(&self, command: &str) -> Result<Vec<CommandResult>> {
        let cmd = vec!["sh".to_string(), "-c".to_string(), command.to_string()];
        let mut results = Vec::with_capacity(self.config.nodes.len());

        for name in &self.config.nodes {
            tracing::info!(container = %name, command, "Launch first boot command");
            let output = self.runtime.exec(name, &cmd).await?;
            if !output.success() {
                tracing::warn!(
                    container = %name,
                    exit_code = output.exit_code.unwrap_or(-1),
                    "First boot command failed"
                );
            }
            results.push(CommandResult {
                container: name.clone(),
                output,
            });
        }
        Ok(results)
    }
}

/// Build the create options of one node container.
fn node_spec(name: &str, image: &str, mounts: &NodeMounts) -> ContainerSpec {
    ContainerSpec {
        name: name.to_string(),
        image: image.to_string(),
        cmd: None,
        hostname: Some(name.to_string()),
        tty: true,
        open_stdin: true,
        volumes: vec![],
        binds: mounts.binds.clone(),
        volumes_from: mounts.volumes_from.clone(),
    }
}
