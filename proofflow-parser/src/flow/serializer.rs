//! Area tree serialization
//!
//!     Serialization is a pure function of an area and an output grammar. Leaves wrap their
//!     content in the delimiters of their type; containers wrap the concatenation of their
//!     children. Nothing is escaped: content that happens to contain a delimiter of the target
//!     grammar serializes verbatim and will not round-trip through the matching parser.
//!
//!         leaf         prefix(type) + content + suffix(type)
//!         collapsible  collapsible_prefix(title) + children + collapsible_suffix(title)
//!         input        input.prefix + children + input.suffix
//!         document     top-level areas, concatenated
//!
//!     The position mapper relies on this exact layout to locate every area, so the two must be
//!     handed the same [OutputConfig].

use super::ast::area::{Area, LeafArea};
use super::ast::document::ProofFlowDocument;
use super::output::OutputConfig;
use std::fmt;

pub fn serialize_leaf(leaf: &LeafArea, config: &OutputConfig) -> String {
    let delimiters = config.delimiters(leaf.kind().into());
    let mut out = String::with_capacity(
        delimiters.prefix.len() + leaf.content().len() + delimiters.suffix.len(),
    );
    out.push_str(&delimiters.prefix);
    out.push_str(leaf.content());
    out.push_str(&delimiters.suffix);
    out
}

pub fn serialize_area(area: &Area, config: &OutputConfig) -> String {
    match area {
        Area::Leaf(leaf) => serialize_leaf(leaf, config),
        Area::Collapsible(collapsible) => {
            let title = collapsible.title();
            let mut out = config.collapsible_prefix(title);
            push_children(&mut out, collapsible.children(), config);
            out.push_str(config.collapsible_suffix(title));
            out
        }
        Area::Input(input) => {
            let mut out = config.input.prefix.clone();
            push_children(&mut out, input.children(), config);
            out.push_str(&config.input.suffix);
            out
        }
    }
}

pub fn serialize_areas(areas: &[Area], config: &OutputConfig) -> String {
    areas
        .iter()
        .map(|area| serialize_area(area, config))
        .collect()
}

fn push_children(out: &mut String, children: &[LeafArea], config: &OutputConfig) {
    for child in children {
        out.push_str(&serialize_leaf(child, config));
    }
}

impl ProofFlowDocument {
    /// The document in its own output grammar
    pub fn to_source(&self) -> String {
        serialize_areas(self.areas(), self.output_config())
    }

    /// The document in another grammar, leaving its own untouched
    pub fn to_source_with(&self, config: &OutputConfig) -> String {
        serialize_areas(self.areas(), config)
    }
}

impl fmt::Display for ProofFlowDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}
