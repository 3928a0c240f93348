//! CLI argument definitions and dispatch.

mod cleanup;
mod create;
mod dns_update;
mod share;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use nodestack_core::{HostVolume, StackConfig, StackError};
use nodestack_runtime::{DockerRuntime, StackManager};

/// nodestack — spawn and reset a small stack of test containers.
#[derive(Parser, Debug)]
#[command(name = "nodestack", version, about)]
#[command(group(
    ArgGroup::new("mode").args(["create_share", "create", "dns_update", "cleanup"])
))]
pub struct Cli {
    /// Create or recreate the shared volume container
    #[arg(long)]
    pub create_share: bool,

    /// Create or recreate the stack
    #[arg(short, long)]
    pub create: bool,

    /// Update the /etc/hosts file in every running node
    #[arg(short = 'u', long)]
    pub dns_update: bool,

    /// Remove all containers of the stack
    #[arg(long)]
    pub cleanup: bool,

    /// Image for the stack and share containers
    #[arg(short, long)]
    pub image: Option<String>,

    /// Host path shared with every node (host:container), can be repeated
    #[arg(
        short = 'v',
        long = "host-volume",
        value_name = "HOST:CONTAINER"
    )]
    pub host_volumes: Vec<HostVolume>,

    /// First boot command run in every node after creation
    #[arg(long, value_name = "COMMAND")]
    pub command: Option<String>,

    /// Stack configuration file (YAML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Operating mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Status,
    CreateShare,
    Create,
    DnsUpdate,
    Cleanup,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.create_share {
            Mode::CreateShare
        } else if self.create {
            Mode::Create
        } else if self.dns_update {
            Mode::DnsUpdate
        } else if self.cleanup {
            Mode::Cleanup
        } else {
            Mode::Status
        }
    }

    /// Reject options that only apply when recreating the stack.
    pub fn validate(&self) -> nodestack_core::Result<()> {
        if self.mode() == Mode::Create {
            return Ok(());
        }
        if !self.host_volumes.is_empty() {
            return Err(StackError::Config(
                "--host-volume only applies with --create".to_string(),
            ));
        }
        if self.command.is_some() {
            return Err(StackError::Config(
                "--command only applies with --create".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the configuration file, or the defaults when none was given.
    pub fn load_config(&self) -> nodestack_core::Result<StackConfig> {
        match &self.config {
            Some(path) => StackConfig::load(path),
            None => Ok(StackConfig::default()),
        }
    }

    /// Image from `--image`, falling back to the configured default.
    pub fn image(&self, config: &StackConfig) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| config.default_image.clone())
    }
}

/// Dispatch a parsed CLI to the selected mode.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    cli.validate()?;
    let config = cli.load_config()?;
    let image = cli.image(&config);
    let runtime = DockerRuntime::connect(config.docker_host.as_deref())?;
    let manager = StackManager::new(Arc::new(runtime), config);

    status::execute(&manager, "Actual stack status:").await?;

    match cli.mode() {
        Mode::Status => Ok(()),
        Mode::CreateShare => share::execute(&manager, &image).await,
        Mode::Create => {
            create::execute(&manager, image, cli.host_volumes, cli.command).await?;
            status::execute(&manager, "New stack status:").await
        }
        Mode::DnsUpdate => dns_update::execute(&manager).await,
        Mode::Cleanup => cleanup::execute(&manager).await,
    }
}
