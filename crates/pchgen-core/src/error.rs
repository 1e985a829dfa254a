//! Error types for pchgen

use thiserror::Error;

/// pchgen error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Cannot locate {header} from {from}")]
    Resolve { header: String, from: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pchgen
pub type Result<T> = std::result::Result<T, Error>;
