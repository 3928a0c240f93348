//! Docker Engine implementation of `ContainerRuntime`.
//!
//! Talks to the local daemon over its control socket through `bollard`.
//! Every call is awaited individually; there is no retry and no pooling
//! beyond the single client held for the lifetime of one invocation.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
    LogOutput, RemoveContainerOptions, StartContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::models::{ContainerInspectResponse, ContainerSummary as DockerSummary, HostConfig};
use bollard::Docker;
use futures::StreamExt;
use nodestack_core::error::{Result, StackError};
use nodestack_core::runtime::{
    ContainerDetails, ContainerRuntime, ContainerSpec, ContainerSummary, ExecOutput, Removal,
};

/// Client timeout in seconds for explicit socket connections.
const CONNECT_TIMEOUT_SECS: u64 = 120;

/// `ContainerRuntime` backed by the Docker Engine API.
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect to the daemon.
    ///
    /// With `socket` set, connects to that unix socket; otherwise uses the
    /// client's local defaults (`DOCKER_HOST`, then `/var/run/docker.sock`).
    pub fn connect(socket: Option<&str>) -> Result<Self> {
        let docker = match socket {
            Some(path) => {
                Docker::connect_with_unix(path, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            None => Docker::connect_with_local_defaults(),
        }
        .map_err(|e| map_error("connect", socket.unwrap_or("local daemon"), e))?;

        tracing::debug!(socket = socket.unwrap_or("default"), "Connected to Docker daemon");
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| map_error("list", "*", e))?;

        Ok(containers.into_iter().map(summary_from_docker).collect())
    }

    async fn inspect_container(&self, name: &str) -> Result<ContainerDetails> {
        let response = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_error("inspect", name, e))?;

        Ok(details_from_docker(response))
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            ..Default::default()
        };
        let response = self
            .docker
            .create_container(Some(options), config_from_spec(spec))
            .await
            .map_err(|e| map_error("create", &spec.name, e))?;

        for warning in &response.warnings {
            tracing::warn!(container = %spec.name, "{warning}");
        }
        tracing::debug!(container = %spec.name, id = %response.id, "Container created");
        Ok(response.id)
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        self.docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| map_error("start", name, e))?;
        tracing::debug!(container = %name, "Container started");
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<Removal> {
        match self
            .docker
            .remove_container(name, Some(remove_options()))
            .await
        {
            Ok(()) => {
                tracing::debug!(container = %name, "Container removed");
                Ok(Removal::Removed)
            }
            Err(e) => match map_error("remove", name, e) {
                StackError::NotFound(_) => Ok(Removal::Absent),
                other => Err(other),
            },
        }
    }

    async fn exec(&self, name: &str, cmd: &[String]) -> Result<ExecOutput> {
        let options = CreateExecOptions {
            cmd: Some(cmd.to_vec()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(false),
            ..Default::default()
        };
        let exec = self
            .docker
            .create_exec(name, options)
            .await
            .map_err(|e| map_error("exec", name, e))?;

        let mut bytes = Vec::new();
        let started = self
            .docker
            .start_exec(&exec.id, None)
            .await
            .map_err(|e| map_error("exec", name, e))?;
        if let StartExecResults::Attached {
            output: mut stream, ..
        } = started
        {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| map_error("exec", name, e))?;
                append_chunk(&mut bytes, chunk);
            }
        }

        let inspect = self
            .docker
            .inspect_exec(&exec.id)
            .await
            .map_err(|e| map_error("exec", name, e))?;

        Ok(ExecOutput {
            output: String::from_utf8_lossy(&bytes).into_owned(),
            exit_code: inspect.exit_code,
        })
    }
}

/// Map a client error, turning HTTP 404 into `StackError::NotFound`.
fn map_error(operation: &str, container: &str, err: DockerError) -> StackError {
    match err {
        DockerError::DockerResponseServerError {
            status_code: 404, ..
        } => StackError::NotFound(container.to_string()),
        other => StackError::Runtime {
            operation: operation.to_string(),
            container: container.to_string(),
            message: other.to_string(),
        },
    }
}

/// Forced removal that also drops the container's anonymous volumes.
fn remove_options() -> RemoveContainerOptions {
    RemoveContainerOptions {
        force: true,
        v: true,
        ..Default::default()
    }
}

/// Stream chunks may split a multi-byte character, so output is decoded once
/// after the stream ends.
fn append_chunk(bytes: &mut Vec<u8>, chunk: LogOutput) {
    bytes.extend_from_slice(&chunk.into_bytes());
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn config_from_spec(spec: &ContainerSpec) -> Config<String> {
    let host_config = HostConfig {
        binds: non_empty(&spec.binds),
        volumes_from: non_empty(&spec.volumes_from),
        ..Default::default()
    };

    let volumes: HashMap<String, HashMap<(), ()>> = spec
        .volumes
        .iter()
        .map(|path| (path.clone(), HashMap::new()))
        .collect();

    Config {
        image: Some(spec.image.clone()),
        cmd: spec.cmd.clone(),
        hostname: spec.hostname.clone(),
        tty: Some(spec.tty),
        open_stdin: Some(spec.open_stdin),
        volumes: if volumes.is_empty() { None } else { Some(volumes) },
        host_config: Some(host_config),
        ..Default::default()
    }
}

fn summary_from_docker(summary: DockerSummary) -> ContainerSummary {
    let name = summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();

    ContainerSummary {
        id: summary.id.unwrap_or_default(),
        name,
        status: summary.status.unwrap_or_default(),
        state: summary.state.unwrap_or_default(),
        image: summary.image.unwrap_or_default(),
    }
}

fn details_from_docker(response: ContainerInspectResponse) -> ContainerDetails {
    let host_config = response.host_config.unwrap_or_default();

    ContainerDetails {
        id: response.id.unwrap_or_default(),
        name: response
            .name
            .map(|n| n.trim_start_matches('/').to_string())
            .unwrap_or_default(),
        ip_address: response.network_settings.as_ref().and_then(|settings| {
            // Default bridge address first, then user-defined networks by name.
            let primary = settings.ip_address.clone().filter(|ip| !ip.is_empty());
            primary.or_else(|| {
                let mut networks: Vec<_> = settings.networks.iter().flatten().collect();
                networks.sort_by(|a, b| a.0.cmp(b.0));
                networks
                    .into_iter()
                    .filter_map(|(_, endpoint)| endpoint.ip_address.clone())
                    .find(|ip| !ip.is_empty())
            })
        }),
        running: response
            .state
            .and_then(|state| state.running)
            .unwrap_or(false),
        volumes_from: host_config.volumes_from.unwrap_or_default(),
        binds: host_config.binds.unwrap_or_default(),
    }
}
