//! Error types for format operations

use proofflow_parser::flow::mapping::MappingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("No format handles files with extension '{0}'")]
    UnknownExtension(String),

    #[error("Area ranges could not be mapped: {0}")]
    Mapping(#[from] MappingError),
}
