use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, StackError};

/// Stack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Node container names, in creation order
    pub nodes: Vec<String>,

    /// Shared-storage container
    pub share: ShareConfig,

    /// Image used when none is given on the command line
    pub default_image: String,

    /// Docker daemon unix socket (falls back to the client's local defaults)
    pub docker_host: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            nodes: Self::default_nodes(),
            share: ShareConfig::default(),
            default_image: "debian".to_string(),
            docker_host: None,
        }
    }
}

impl StackConfig {
    /// Default node set: node1..node4
    fn default_nodes() -> Vec<String> {
        (1..=4).map(|i| format!("node{i}")).collect()
    }

    /// Load a configuration from a YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StackConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the topology invariants.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(StackError::Config("node list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for name in &self.nodes {
            if name.trim().is_empty() {
                return Err(StackError::Config("node name is empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(StackError::Config(format!("duplicate node name: {name}")));
            }
        }

        if seen.contains(self.share.name.as_str()) {
            return Err(StackError::Config(format!(
                "share container name {} collides with a node name",
                self.share.name
            )));
        }

        if !self.share.mount_point.starts_with('/') {
            return Err(StackError::Config(format!(
                "share mount point must be absolute: {}",
                self.share.mount_point
            )));
        }

        if self.default_image.trim().is_empty() {
            return Err(StackError::Config("default image is empty".to_string()));
        }

        Ok(())
    }

    /// Names of every container this tool manages: the nodes, then the share.
    pub fn managed_names(&self) -> Vec<String> {
        let mut names = self.nodes.clone();
        names.push(self.share.name.clone());
        names
    }
}

/// Shared-storage container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Container name
    pub name: String,

    /// Volume declared inside the share container
    pub mount_point: String,

    /// No-op command the share container is created with
    pub command: Vec<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            name: "share".to_string(),
            mount_point: "/share".to_string(),
            command: vec!["/bin/true".to_string()],
        }
    }
}
