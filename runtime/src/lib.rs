//! nodestack runtime - Docker client and stack reconciler.
//!
//! `DockerRuntime` implements `ContainerRuntime` over the Docker Engine API;
//! `StackManager` drives any `ContainerRuntime` through the create-share,
//! create, hosts-refresh and cleanup sequences.

pub mod docker;
pub mod stack;

#[cfg(test)]
pub(crate) mod fake;

// Re-export common types
pub use docker::DockerRuntime;
pub use stack::{CommandResult, CreateOptions, StackManager, StatusRow};
