//! Testing utilities
//!
//!     Shared by the unit tests of this crate and the integration tests of the crates built on
//!     top of it.
//!
//! Samples
//!
//!     Hand-written dialect sources are easy to get subtly wrong: one missing newline after a
//!     fence and the test exercises the wrong code path. Tests should start from the verified
//!     samples in `samples/`, exposed through [Sample]. Every sample is a canonical
//!     serialization: parsing it and serializing the result under the same dialect gives the
//!     file back byte for byte.
//!
//!         let sample = Sample::get(Dialect::CoqMD);
//!         let doc = sample.parse();
//!         assert_eq!(doc.to_source(), sample.source);
//!
//! Building Trees
//!
//!     [TreeBuilder] assembles area lists with ids drawn from its own counter, in document
//!     order, the way a parser would allocate them.
//!
//! Assertions
//!
//!     [assert_same_shape] compares two trees while ignoring ids and ranges, which is what
//!     round-trip tests need. [assert_ranges_match] checks that every leaf's range slices its
//!     own content out of the document's serialization.

use crate::flow::ast::area::{
    Area, AreaType, CollapsibleArea, InputArea, InputStatus, LeafArea, LeafKind,
};
use crate::flow::ast::document::ProofFlowDocument;
use crate::flow::ast::ids::IdCounter;
use crate::flow::output::OutputConfig;
use crate::flow::parsing::Dialect;

/// A verified source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub dialect: Dialect,
    pub source: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "naturals.v",
        dialect: Dialect::Coq,
        source: include_str!("../../samples/naturals.v"),
    },
    Sample {
        name: "naturals.mv",
        dialect: Dialect::CoqMD,
        source: include_str!("../../samples/naturals.mv"),
    },
    Sample {
        name: "naturals.lean",
        dialect: Dialect::Lean,
        source: include_str!("../../samples/naturals.lean"),
    },
    Sample {
        name: "naturals_pure.lean",
        dialect: Dialect::PureLean,
        source: include_str!("../../samples/naturals_pure.lean"),
    },
];

impl Sample {
    pub fn get(dialect: Dialect) -> &'static Sample {
        SAMPLES
            .iter()
            .find(|sample| sample.dialect == dialect)
            .expect("every dialect has a sample")
    }

    pub fn uri(&self) -> String {
        format!("file:///samples/{}", self.name)
    }

    /// Parse with a fresh counter; ranges are computed
    pub fn parse(&self) -> ProofFlowDocument {
        let mut doc = self
            .dialect
            .parse_document(self.uri(), self.source, &mut IdCounter::new());
        doc.update_bounds().expect("sample bounds");
        doc
    }
}

/// Structure of an area with ids and ranges left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf(LeafKind, String),
    Collapsible(String, Vec<(LeafKind, String)>),
    Input(InputStatus, Vec<(LeafKind, String)>),
}

fn leaf_shapes(children: &[LeafArea]) -> Vec<(LeafKind, String)> {
    children
        .iter()
        .map(|leaf| (leaf.kind(), leaf.content().to_string()))
        .collect()
}

pub fn shape(areas: &[Area]) -> Vec<Shape> {
    areas
        .iter()
        .map(|area| match area {
            Area::Leaf(leaf) => Shape::Leaf(leaf.kind(), leaf.content().to_string()),
            Area::Collapsible(collapsible) => Shape::Collapsible(
                collapsible.title().to_string(),
                leaf_shapes(collapsible.children()),
            ),
            Area::Input(input) => Shape::Input(input.status(), leaf_shapes(input.children())),
        })
        .collect()
}

#[track_caller]
pub fn assert_same_shape(actual: &[Area], expected: &[Area]) {
    assert_eq!(shape(actual), shape(expected), "area trees differ");
}

/// Every leaf range slices its own content out of the serialization
#[track_caller]
pub fn assert_ranges_match(doc: &ProofFlowDocument) {
    assert!(doc.bounds_valid(), "bounds have not been computed");
    let source = doc.to_source();
    for area in doc.iter_all() {
        let range = area
            .range()
            .unwrap_or_else(|| panic!("area {} has no range", area.id()));
        assert!(
            range.span.start <= range.span.end && range.span.end <= source.len(),
            "span {:?} of area {} is out of bounds",
            range.span,
            area.id()
        );
        if area.area_type() != AreaType::Collapsible && area.area_type() != AreaType::Input {
            assert_eq!(
                &source[range.span.clone()],
                area.content(),
                "range of area {} does not slice its content",
                area.id()
            );
        }
    }
}

/// Builds area lists with sequential ids
#[derive(Debug, Default)]
pub struct TreeBuilder {
    ids: IdCounter,
    areas: Vec<Area>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            ids: IdCounter::starting_at(first),
            areas: Vec::new(),
        }
    }

    fn leaf(mut self, kind: LeafKind, content: &str) -> Self {
        let leaf = LeafArea::new(self.ids.next_id(), kind, content);
        self.areas.push(leaf.into());
        self
    }

    pub fn text(self, content: &str) -> Self {
        self.leaf(LeafKind::Text, content)
    }

    pub fn code(self, content: &str) -> Self {
        self.leaf(LeafKind::Code, content)
    }

    pub fn math(self, content: &str) -> Self {
        self.leaf(LeafKind::Math, content)
    }

    pub fn collapsible(mut self, title: &str, children: &[(LeafKind, &str)]) -> Self {
        let id = self.ids.next_id();
        let children = self.children(children);
        self.areas
            .push(CollapsibleArea::new(id, title).with_children(children).into());
        self
    }

    pub fn input(mut self, status: InputStatus, children: &[(LeafKind, &str)]) -> Self {
        let id = self.ids.next_id();
        let children = self.children(children);
        self.areas.push(
            InputArea::new(id)
                .with_status(status)
                .with_children(children)
                .into(),
        );
        self
    }

    fn children(&mut self, children: &[(LeafKind, &str)]) -> Vec<LeafArea> {
        children
            .iter()
            .map(|(kind, content)| LeafArea::new(self.ids.next_id(), *kind, *content))
            .collect()
    }

    /// Append an area described by `shape`
    pub fn shape(self, shape: &Shape) -> Self {
        fn refs(children: &[(LeafKind, String)]) -> Vec<(LeafKind, &str)> {
            children
                .iter()
                .map(|(kind, content)| (*kind, content.as_str()))
                .collect()
        }
        match shape {
            Shape::Leaf(kind, content) => self.leaf(*kind, content),
            Shape::Collapsible(title, children) => self.collapsible(title, &refs(children)),
            Shape::Input(status, children) => self.input(*status, &refs(children)),
        }
    }

    pub fn areas(self) -> Vec<Area> {
        self.areas
    }

    pub fn document(self, uri: &str, output_config: OutputConfig) -> ProofFlowDocument {
        ProofFlowDocument::new(uri, output_config).with_areas(self.areas)
    }

    /// The document with ranges computed
    pub fn mapped_document(self, uri: &str, output_config: OutputConfig) -> ProofFlowDocument {
        let mut doc = self.document(uri, output_config);
        doc.update_bounds().expect("bounds");
        doc
    }
}
