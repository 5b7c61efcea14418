//! Server diagnostics mapped back onto areas
//!
//!     The server reports ranges in the serialized document. The editor wants them relative to
//!     the area the user is looking at. A diagnostic is anchored at its start: the area holding
//!     the character at the start position owns it, so a start on the boundary of two adjacent
//!     areas goes to the area that begins there, and both ends are converted to byte offsets into
//!     that area's content. An end past the owning area is clamped to the end of its content.
//!
//!     Diagnostics that cannot be anchored are skipped: a start outside every area (on a
//!     delimiter, say), on a container's own delimiters, or in a document whose ranges are not
//!     computed.

use crate::convert::from_lsp_position;
use lsp_types::Diagnostic;
use proofflow_parser::flow::ast::{AreaId, ProofFlowDocument};
use tracing::debug;

/// A diagnostic resolved to an area and byte offsets into its content
#[derive(Debug, Clone, PartialEq)]
pub struct MappedDiagnostic {
    pub diagnostic: Diagnostic,
    pub area: AreaId,
    pub start: usize,
    pub end: usize,
}

pub fn map_diagnostic(doc: &ProofFlowDocument, diagnostic: &Diagnostic) -> Option<MappedDiagnostic> {
    let start_pos = from_lsp_position(diagnostic.range.start);
    let area = doc.area_starting_at(start_pos)?;
    let start = doc.get_offset(area.id(), start_pos)?;
    let end = doc
        .get_offset(area.id(), from_lsp_position(diagnostic.range.end))
        .unwrap_or(area.content().len())
        .max(start);
    Some(MappedDiagnostic {
        diagnostic: diagnostic.clone(),
        area: area.id(),
        start,
        end,
    })
}

pub fn map_diagnostics(doc: &ProofFlowDocument, diagnostics: &[Diagnostic]) -> Vec<MappedDiagnostic> {
    let mapped: Vec<MappedDiagnostic> = diagnostics
        .iter()
        .filter_map(|diagnostic| {
            let mapped = map_diagnostic(doc, diagnostic);
            if mapped.is_none() {
                debug!(
                    uri = doc.uri(),
                    range = ?diagnostic.range,
                    message = %diagnostic.message,
                    "diagnostic outside every area, skipped"
                );
            }
            mapped
        })
        .collect();
    debug!(
        uri = doc.uri(),
        received = diagnostics.len(),
        mapped = mapped.len(),
        "diagnostics mapped"
    );
    mapped
}
