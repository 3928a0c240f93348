//! Host-volume bindings shared by every node container.
//!
//! A binding is parsed from `HOST:CONTAINER` (optionally `HOST:CONTAINER:ro`
//! or `:rw`) and rendered back into the Docker bind string form.

use std::fmt;
use std::str::FromStr;

use crate::error::StackError;

/// A host directory mapped into every node container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostVolume {
    /// Absolute path on the host.
    pub host_path: String,

    /// Mount point inside the container.
    pub container_path: String,

    /// Mount read-only.
    pub read_only: bool,
}

impl HostVolume {
    pub fn new(host_path: impl Into<String>, container_path: impl Into<String>) -> Self {
        Self {
            host_path: host_path.into(),
            container_path: container_path.into(),
            read_only: false,
        }
    }

    /// Docker bind string (`host:container[:ro]`).
    pub fn to_bind(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HostVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_path, self.container_path)?;
        if self.read_only {
            write!(f, ":ro")?;
        }
        Ok(())
    }
}

impl FromStr for HostVolume {
    type Err = StackError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || StackError::InvalidHostVolume(spec.to_string());

        let parts: Vec<&str> = spec.split(':').collect();
        let (host, container, read_only) = match parts.as_slice() {
            [host, container] => (*host, *container, false),
            [host, container, "ro"] => (*host, *container, true),
            [host, container, "rw"] => (*host, *container, false),
            _ => return Err(invalid()),
        };

        // A relative host part would make Docker create a named volume.
        if !host.starts_with('/') || !container.starts_with('/') {
            return Err(invalid());
        }

        Ok(Self {
            host_path: host.to_string(),
            container_path: container.to_string(),
            read_only,
        })
    }
}

/// Render bindings into Docker bind strings, preserving order.
pub fn to_binds(volumes: &[HostVolume]) -> Vec<String> {
    volumes.iter().map(HostVolume::to_bind).collect()
}
