use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KempnerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Kernel failure on interval ({start}, {end}): {message}")]
    KernelFailure {
        start: u64,
        end: u64,
        message: String,
    },

    #[error("Aggregation cancelled before all intervals completed")]
    Cancelled,

    #[error("Timeout error: aggregation exceeded {timeout:?}")]
    Timeout {
        timeout: Duration,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("File error: {path:?} - {message}")]
    FileError {
        path: PathBuf,
        message: String,
    },
}

impl KempnerError {
    /// Short name of the error kind, used by the CLI when aborting
    pub fn kind(&self) -> &'static str {
        match self {
            KempnerError::InvalidConfiguration(_) => "InvalidConfiguration",
            KempnerError::KernelFailure { .. } => "KernelFailure",
            KempnerError::Cancelled => "Cancelled",
            KempnerError::Timeout { .. } => "Timeout",
            KempnerError::ConfigError(_) => "ConfigError",
            KempnerError::SerializationError(_) => "SerializationError",
            KempnerError::FileError { .. } => "FileError",
        }
    }
}

pub type KempnerResult<T> = std::result::Result<T, KempnerError>;
