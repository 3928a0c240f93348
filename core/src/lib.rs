//! nodestack core - foundational types and abstractions
//!
//! Configuration, errors, host-volume parsing, hosts-table rendering and
//! the `ContainerRuntime` seam shared by the runtime and CLI crates.

pub mod config;
pub mod error;
pub mod hosts;
pub mod runtime;
pub mod volume;

// Re-export commonly used types
pub use config::{ShareConfig, StackConfig};
pub use error::{Result, StackError};
pub use hosts::HostEntry;
pub use runtime::{
    ContainerDetails, ContainerRuntime, ContainerSpec, ContainerSummary, ExecOutput, Removal,
};
pub use volume::HostVolume;
