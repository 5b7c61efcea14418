//! Error types for the server boundary and file sessions

use proofflow_parser::flow::mapping::MappingError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{method} timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },

    #[error("{method} failed: {message}")]
    Request {
        method: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Cannot build a file uri for {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Area ranges could not be mapped: {0}")]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
