//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing documents.

use crate::error::FormatError;
use proofflow_parser::flow::ast::{IdCounter, ProofFlowDocument};

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and a document. Formats can
/// support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &ProofFlowDocument) -> Result<String, FormatError> {
///         Ok(doc.areas().len().to_string())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "coq", "coqmd", "treeviz")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions this format reads and writes, without the dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (document → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a document for `uri`, allocating ids from `ids`
    ///
    /// Default implementation returns NotSupported error.
    fn parse(
        &self,
        _uri: &str,
        _source: &str,
        _ids: &mut IdCounter,
    ) -> Result<ProofFlowDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &ProofFlowDocument) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
