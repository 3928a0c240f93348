use thiserror::Error;

/// nodestack error types
#[derive(Error, Debug)]
pub enum StackError {
    /// Container runtime API call failed
    #[error("Runtime error: {operation} {container}: {message}")]
    Runtime {
        operation: String,
        container: String,
        message: String,
    },

    /// Container does not exist
    #[error("No such container: {0}")]
    NotFound(String),

    /// Malformed `host:container` argument
    #[error("Invalid host volume \"{0}\": expected HOST:CONTAINER")]
    InvalidHostVolume(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Container has no network address to publish
    #[error("Container {0} has no network address")]
    NoAddress(String),

    /// Command run inside a container exited non-zero
    #[error("Command in {container} exited with code {exit_code}")]
    ExecFailed {
        container: String,
        exit_code: i64,
        output: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for StackError {
    fn from(err: serde_yaml::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

/// Result type alias for nodestack operations
pub type Result<T> = std::result::Result<T, StackError>;
