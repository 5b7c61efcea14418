//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name, or picked by a file's extension.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{DialectFormat, TreevizFormat};
use proofflow_parser::flow::ast::{IdCounter, ProofFlowDocument};
use proofflow_parser::flow::output::FileType;
use proofflow_parser::flow::parsing::Dialect;
use std::collections::HashMap;
use std::path::Path;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let format = registry.for_path(Path::new("proof.v"), false)?;
/// let doc = format.parse("file:///proof.v", source, &mut ids)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// The dialect format for a file, chosen by extension
    ///
    /// `.lean` files resolve to block syntax unless `pure_lean` is set.
    pub fn for_path(&self, path: &Path, pure_lean: bool) -> Result<&dyn Format, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let dialect = Dialect::for_file_type(FileType::from_extension(extension), pure_lean)
            .ok_or_else(|| FormatError::UnknownExtension(extension.to_string()))?;
        self.get(dialect.name())
    }

    /// Parse source text using the specified format
    pub fn parse(
        &self,
        uri: &str,
        source: &str,
        format: &str,
        ids: &mut IdCounter,
    ) -> Result<ProofFlowDocument, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                format
            )));
        }
        fmt.parse(uri, source, ids)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &ProofFlowDocument, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        fmt.serialize(doc)
    }

    /// Create a registry with every dialect and the treeviz view
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for dialect in Dialect::ALL {
            registry.register(DialectFormat::new(dialect));
        }
        registry.register(TreevizFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofflow_parser::flow::output::OutputConfig;

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(
            &self,
            uri: &str,
            _source: &str,
            _ids: &mut IdCounter,
        ) -> Result<ProofFlowDocument, FormatError> {
            Ok(ProofFlowDocument::new(uri, OutputConfig::default()))
        }
        fn serialize(&self, _doc: &ProofFlowDocument) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_parse() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let doc = registry
            .parse("file:///a", "input", "test", &mut IdCounter::new())
            .unwrap();
        assert_eq!(doc.uri(), "file:///a");
    }

    #[test]
    fn test_registry_parse_not_supported() {
        let registry = FormatRegistry::with_defaults();
        let result = registry.parse("file:///a", "input", "treeviz", &mut IdCounter::new());
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let doc = ProofFlowDocument::new("file:///a", OutputConfig::default());
        assert_eq!(registry.serialize(&doc, "test").unwrap(), "test output");
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["coq", "coqmd", "lean", "pure-lean", "treeviz"]
        );
    }

    #[test]
    fn test_registry_replace_format() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);

        assert_eq!(registry.list_formats().len(), 1);
    }

    #[test]
    fn test_for_path() {
        let registry = FormatRegistry::with_defaults();
        let name = |path: &str, pure_lean| {
            registry
                .for_path(Path::new(path), pure_lean)
                .map(|format| format.name().to_string())
        };
        assert_eq!(name("a/b.v", false).unwrap(), "coq");
        assert_eq!(name("b.mv", false).unwrap(), "coqmd");
        assert_eq!(name("b.lean", false).unwrap(), "lean");
        assert_eq!(name("b.lean", true).unwrap(), "pure-lean");
        assert!(matches!(
            name("notes.txt", false),
            Err(FormatError::UnknownExtension(ext)) if ext == "txt"
        ));
    }
}
