//! Dialect formats
//!
//!     One format per surface syntax. Parsing runs the dialect's parser and maps the ranges of
//!     the result; serializing writes the tree in the dialect's grammar, whatever grammar the
//!     document was loaded with. Convert by parsing with one and serializing with another:
//!
//!         let doc = registry.parse("file:///a.v", source, "coq", &mut ids)?;
//!         let markdown = registry.serialize(&doc, "coqmd")?;

use crate::error::FormatError;
use crate::format::Format;
use proofflow_parser::flow::ast::{IdCounter, ProofFlowDocument};
use proofflow_parser::flow::parsing::Dialect;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectFormat {
    dialect: Dialect,
}

impl DialectFormat {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl Format for DialectFormat {
    fn name(&self) -> &str {
        self.dialect.name()
    }

    fn description(&self) -> &str {
        match self.dialect {
            Dialect::Coq => "Coq source with prose in coqdoc comments",
            Dialect::CoqMD => "Markdown with fenced Coq blocks",
            Dialect::Lean => "Lean block syntax (:::code, :::text, ...)",
            Dialect::PureLean => "Lean source with prose in module doc comments",
        }
    }

    fn file_extensions(&self) -> &[&str] {
        match self.dialect {
            Dialect::Coq => &["v"],
            Dialect::CoqMD => &["mv"],
            Dialect::Lean | Dialect::PureLean => &["lean"],
        }
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
        source: &str,
        ids: &mut IdCounter,
    ) -> Result<ProofFlowDocument, FormatError> {
        let mut doc = self.dialect.parse_document(uri, source, ids);
        doc.update_bounds()?;
        Ok(doc)
    }

    fn serialize(&self, doc: &ProofFlowDocument) -> Result<String, FormatError> {
        let config = self.dialect.output_config();
        if doc.output_config() != &config {
            debug!(uri = doc.uri(), to = self.dialect.name(), "converting dialect");
        }
        Ok(doc.to_source_with(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofflow_parser::flow::testing::Sample;

    #[test]
    fn test_parse_maps_ranges() {
        let sample = Sample::get(Dialect::Coq);
        let doc = DialectFormat::new(Dialect::Coq)
            .parse("file:///a.v", sample.source, &mut IdCounter::new())
            .unwrap();
        assert!(doc.bounds_valid());
        assert_eq!(doc.uri(), "file:///a.v");
    }

    #[test]
    fn test_serialize_converts() {
        let mut ids = IdCounter::new();
        let doc = DialectFormat::new(Dialect::Coq)
            .parse("file:///a.v", "(** Intro *)Qed.", &mut ids)
            .unwrap();
        let out = DialectFormat::new(Dialect::CoqMD).serialize(&doc).unwrap();
        assert_eq!(out, "Intro\n```coq\nQed.\n```\n");
    }

    #[test]
    fn test_metadata() {
        let format = DialectFormat::new(Dialect::PureLean);
        assert_eq!(format.name(), "pure-lean");
        assert_eq!(format.file_extensions(), &["lean"]);
        assert!(format.supports_parsing());
    }
}
