//! nodestack CLI - reset a fixed set of test containers in one command.

pub mod commands;
pub mod output;
