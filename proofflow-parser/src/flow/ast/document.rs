//! Document element
//!
//! The document is the root aggregate of a proof flow: the uri of the file it was loaded from,
//! the ordered top-level areas, and the output grammar used to serialize it.
//!
//! Ranges on every area are only meaningful for the current grammar and the current tree.
//! Changing the grammar recomputes them; any mutable access to the tree drops them, so a stale
//! range is never observable: it is either fresh or absent.
//!
//! Parent lookups go through a side table ([ParentIndex]) built from the tree on demand rather
//! than through stored back-references, since documents are rebuilt wholesale on every sync.

use super::area::{Area, AreaType, LeafArea};
use super::ids::AreaId;
use super::range::Range;
use crate::flow::output::OutputConfig;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofFlowDocument {
    uri: String,
    areas: Vec<Area>,
    output_config: OutputConfig,
    bounds_valid: bool,
}

impl ProofFlowDocument {
    pub fn new(uri: impl Into<String>, output_config: OutputConfig) -> Self {
        Self {
            uri: uri.into(),
            areas: Vec::new(),
            output_config,
            bounds_valid: false,
        }
    }

    pub fn with_areas(mut self, areas: Vec<Area>) -> Self {
        self.areas = areas;
        self.invalidate_bounds();
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn output_config(&self) -> &OutputConfig {
        &self.output_config
    }

    /// Whether ranges reflect the current tree and grammar
    pub fn bounds_valid(&self) -> bool {
        self.bounds_valid
    }

    pub fn push(&mut self, area: impl Into<Area>) {
        self.areas.push(area.into());
        self.invalidate_bounds();
    }

    /// Mutable access to the tree; all ranges are dropped
    pub fn areas_mut(&mut self) -> &mut Vec<Area> {
        self.invalidate_bounds();
        &mut self.areas
    }

    pub fn into_areas(self) -> Vec<Area> {
        self.areas
    }

    pub(crate) fn areas_for_bounds(&mut self) -> &mut [Area] {
        &mut self.areas
    }

    pub(crate) fn mark_bounds_valid(&mut self) {
        self.bounds_valid = true;
    }

    pub(crate) fn replace_output_config(&mut self, output_config: OutputConfig) {
        self.output_config = output_config;
        self.invalidate_bounds();
    }

    pub(crate) fn invalidate_bounds(&mut self) {
        self.bounds_valid = false;
        for area in &mut self.areas {
            area.clear_ranges();
        }
    }

    /// Every area in document order, containers before their children
    pub fn iter_all(&self) -> impl Iterator<Item = AreaRef<'_>> {
        self.areas.iter().flat_map(|area| {
            std::iter::once(AreaRef::Top(area)).chain(
                area.children()
                    .iter()
                    .map(move |leaf| AreaRef::Child { parent: area, leaf }),
            )
        })
    }

    pub fn find(&self, id: AreaId) -> Option<AreaRef<'_>> {
        self.iter_all().find(|area| area.id() == id)
    }

    pub fn parent_of(&self, id: AreaId) -> Option<AreaId> {
        self.iter_all().find_map(|area| match area {
            AreaRef::Child { parent, leaf } if leaf.id() == id => Some(parent.id()),
            _ => None,
        })
    }

    pub fn parent_index(&self) -> ParentIndex {
        ParentIndex::build(self)
    }
}

/// Borrowed view of an area anywhere in the tree
#[derive(Debug, Clone, Copy)]
pub enum AreaRef<'a> {
    Top(&'a Area),
    Child { parent: &'a Area, leaf: &'a LeafArea },
}

impl<'a> AreaRef<'a> {
    pub fn id(&self) -> AreaId {
        match *self {
            AreaRef::Top(area) => area.id(),
            AreaRef::Child { leaf, .. } => leaf.id(),
        }
    }

    pub fn area_type(&self) -> AreaType {
        match *self {
            AreaRef::Top(area) => area.area_type(),
            AreaRef::Child { leaf, .. } => leaf.kind().into(),
        }
    }

    pub fn content(&self) -> &'a str {
        match *self {
            AreaRef::Top(area) => area.content(),
            AreaRef::Child { leaf, .. } => leaf.content(),
        }
    }

    pub fn range(&self) -> Option<&'a Range> {
        match *self {
            AreaRef::Top(area) => area.range(),
            AreaRef::Child { leaf, .. } => leaf.range(),
        }
    }

    pub fn parent(&self) -> Option<&'a Area> {
        match *self {
            AreaRef::Top(_) => None,
            AreaRef::Child { parent, .. } => Some(parent),
        }
    }
}

/// Child id -> container id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentIndex {
    parents: HashMap<AreaId, AreaId>,
}

impl ParentIndex {
    pub fn build(document: &ProofFlowDocument) -> Self {
        let parents = document
            .areas()
            .iter()
            .flat_map(|area| {
                area.children()
                    .iter()
                    .map(move |leaf| (leaf.id(), area.id()))
            })
            .collect();
        Self { parents }
    }

    pub fn parent_of(&self, id: AreaId) -> Option<AreaId> {
        self.parents.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ast::area::{CollapsibleArea, InputArea, LeafKind};

    fn sample() -> ProofFlowDocument {
        let collapsible = CollapsibleArea::new(AreaId(1), "Hint").with_children(vec![
            LeafArea::new(AreaId(2), LeafKind::Text, "Try induction."),
            LeafArea::new(AreaId(3), LeafKind::Code, "induction n."),
        ]);
        let input = InputArea::new(AreaId(4)).with_children(vec![LeafArea::new(
            AreaId(5),
            LeafKind::Code,
            "auto.",
        )]);
        ProofFlowDocument::new("file:///sample.mv", OutputConfig::coqmd()).with_areas(vec![
            Area::text(AreaId(0), "Intro"),
            collapsible.into(),
            input.into(),
        ])
    }

    #[test]
    fn test_iter_all_is_document_order() {
        let doc = sample();
        let ids: Vec<u64> = doc.iter_all().map(|area| area.id().get()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parent_lookup() {
        let doc = sample();
        assert_eq!(doc.parent_of(AreaId(3)), Some(AreaId(1)));
        assert_eq!(doc.parent_of(AreaId(5)), Some(AreaId(4)));
        assert_eq!(doc.parent_of(AreaId(0)), None);

        let index = doc.parent_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.parent_of(AreaId(2)), Some(AreaId(1)));
        assert_eq!(index.parent_of(AreaId(1)), None);
    }

    #[test]
    fn test_find() {
        let doc = sample();
        let found = doc.find(AreaId(3)).expect("area 3 exists");
        assert_eq!(found.area_type(), AreaType::Code);
        assert_eq!(found.content(), "induction n.");
        assert_eq!(found.parent().map(|p| p.id()), Some(AreaId(1)));
        assert!(doc.find(AreaId(42)).is_none());
    }

    #[test]
    fn test_mutable_access_invalidates_bounds() {
        let mut doc = sample();
        doc.update_bounds().expect("bounds");
        assert!(doc.bounds_valid());
        assert!(doc.areas()[0].range().is_some());

        doc.areas_mut().pop();
        assert!(!doc.bounds_valid());
        assert!(doc.iter_all().all(|area| area.range().is_none()));
    }
}
