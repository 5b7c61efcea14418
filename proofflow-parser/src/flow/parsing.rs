//! Dialect parsers
//!
//!     Documents are parsed straight from source text once, when a file is opened. Live editing
//!     goes through [extraction](crate::flow::extraction) instead.
//!
//!     Dialects and their parsers:
//!
//!         | Dialect    | Parser                 | Text between regions |
//!         |------------|------------------------|----------------------|
//!         | coq        | region engine          | Code                 |
//!         | coqmd      | region engine          | Text                 |
//!         | pure-lean  | region engine          | Code                 |
//!         | lean       | line-based block parser| Text (stray lines)   |
//!
//!     The region engine ([engine]) is table driven; each table lives in [grammar]. Lean block
//!     syntax reuses the same closer for every block, which a marker search cannot pair up, so
//!     it has its own scanner in [lean].
//!
//!     Every parse allocates ids from the caller's [IdCounter], in document order. Input status
//!     is not part of any dialect, so parsed inputs start out unattempted.

pub mod engine;
pub mod grammar;
pub mod lean;

use crate::flow::ast::area::Area;
use crate::flow::ast::document::ProofFlowDocument;
use crate::flow::ast::ids::IdCounter;
use crate::flow::output::{FileType, OutputConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub use engine::parse_with;
pub use lean::parse_lean;

/// A concrete surface syntax: a parser paired with its output grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    Coq,
    #[serde(rename = "coqmd")]
    CoqMD,
    Lean,
    PureLean,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Coq,
        Dialect::CoqMD,
        Dialect::Lean,
        Dialect::PureLean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Coq => "coq",
            Dialect::CoqMD => "coqmd",
            Dialect::Lean => "lean",
            Dialect::PureLean => "pure-lean",
        }
    }

    pub fn output_config(&self) -> OutputConfig {
        match self {
            Dialect::Coq => OutputConfig::coq(),
            Dialect::CoqMD => OutputConfig::coqmd(),
            Dialect::Lean => OutputConfig::lean(),
            Dialect::PureLean => OutputConfig::pure_lean(),
        }
    }

    /// Dialect of a file type; `.lean` files use block syntax unless `pure_lean` is set
    pub fn for_file_type(file_type: FileType, pure_lean: bool) -> Option<Self> {
        match file_type {
            FileType::Coq => Some(Dialect::Coq),
            FileType::CoqMD => Some(Dialect::CoqMD),
            FileType::Lean if pure_lean => Some(Dialect::PureLean),
            FileType::Lean => Some(Dialect::Lean),
            FileType::Unknown => None,
        }
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Dialect::Coq => FileType::Coq,
            Dialect::CoqMD => FileType::CoqMD,
            Dialect::Lean | Dialect::PureLean => FileType::Lean,
        }
    }

    pub fn parse(&self, source: &str, ids: &mut IdCounter) -> Vec<Area> {
        let areas = match self {
            Dialect::Coq => parse_with(&grammar::COQ, source, ids),
            Dialect::CoqMD => parse_with(&grammar::COQMD, source, ids),
            Dialect::PureLean => parse_with(&grammar::PURE_LEAN, source, ids),
            Dialect::Lean => parse_lean(source, ids),
        };
        debug!(dialect = self.name(), areas = areas.len(), "parsed source");
        areas
    }

    /// A document for `uri` in this dialect's grammar; ranges are not computed
    pub fn parse_document(
        &self,
        uri: impl Into<String>,
        source: &str,
        ids: &mut IdCounter,
    ) -> ProofFlowDocument {
        ProofFlowDocument::new(uri, self.output_config()).with_areas(self.parse(source, ids))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown dialect '{}'", s))
    }
}

/// Parse an opened file; `None` when the file type has no dialect
pub fn parse_source(
    file_type: FileType,
    uri: impl Into<String>,
    source: &str,
    ids: &mut IdCounter,
) -> Option<ProofFlowDocument> {
    let dialect = Dialect::for_file_type(file_type, false)?;
    Some(dialect.parse_document(uri, source, ids))
}
