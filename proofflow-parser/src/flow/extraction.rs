//! Area tree extraction from editor snapshots
//!
//!     The editing surface owns the live document. Whenever its content changes it can hand out
//!     a read-only snapshot: a tree of typed nodes carrying text, a persistent numeric id and,
//!     for containers, ordered children. This module rebuilds a [ProofFlowDocument] from such a
//!     snapshot.
//!
//! Snapshot Shape
//!
//!     The root node's children are the top-level blocks. Containers are wrapped the way the
//!     editing surface lays them out:
//!
//!         input                       collapsible
//!           └─ input_content            ├─ collapsible_title   (text = title)
//!                ├─ code                └─ collapsible_content
//!                └─ text                     ├─ text
//!                                            └─ code
//!
//!     Only positions are significant: the input's first child and the collapsible's second
//!     child hold the leaves, whatever their kind tag. Leaves are `text`, `rendered_text` (whose
//!     `original` attribute holds the source before rendering), `math` and `code`. Any other
//!     node is skipped, including containers found where a leaf is expected.
//!
//! Identifiers
//!
//!     Areas keep the ids of their nodes so diagnostics keyed by id stay valid across syncs. The
//!     session counter is checkpointed before the walk and restored after it, which makes
//!     re-extraction counter-neutral. Persisted ids are observed on the way, so an id allocated
//!     later for a genuinely new area can never collide with one already in the editor. A node
//!     without an id is given one from the counter; such ids stay reserved.

use super::ast::area::{Area, CollapsibleArea, InputArea, InputStatus, LeafArea, LeafKind};
use super::ast::document::ProofFlowDocument;
use super::ast::ids::{AreaId, IdCounter};
use super::output::OutputConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorNodeKind {
    Doc,
    Text,
    RenderedText,
    Math,
    Code,
    Input,
    InputContent,
    Collapsible,
    CollapsibleTitle,
    CollapsibleContent,
    #[serde(other)]
    Unknown,
}

/// One node of an editor snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorNode {
    pub kind: EditorNodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Source text of a rendered node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InputStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EditorNode>,
}

impl EditorNode {
    pub fn new(kind: EditorNodeKind) -> Self {
        Self {
            kind,
            id: None,
            text: String::new(),
            original: None,
            status: None,
            children: Vec::new(),
        }
    }

    pub fn doc(children: Vec<EditorNode>) -> Self {
        Self::new(EditorNodeKind::Doc).with_children(children)
    }

    pub fn leaf(kind: EditorNodeKind, id: u64, text: impl Into<String>) -> Self {
        Self::new(kind).with_id(id).with_text(text)
    }

    pub fn rendered(id: u64, rendered: impl Into<String>, original: impl Into<String>) -> Self {
        let mut node = Self::leaf(EditorNodeKind::RenderedText, id, rendered);
        node.original = Some(original.into());
        node
    }

    /// An input container with its content wrapper
    pub fn input(id: u64, status: InputStatus, children: Vec<EditorNode>) -> Self {
        let mut node = Self::new(EditorNodeKind::Input).with_id(id).with_children(vec![
            Self::new(EditorNodeKind::InputContent).with_children(children),
        ]);
        node.status = Some(status);
        node
    }

    /// A collapsible container with its title and content wrappers
    pub fn collapsible(id: u64, title: impl Into<String>, children: Vec<EditorNode>) -> Self {
        Self::new(EditorNodeKind::Collapsible)
            .with_id(id)
            .with_children(vec![
                Self::new(EditorNodeKind::CollapsibleTitle).with_text(title),
                Self::new(EditorNodeKind::CollapsibleContent).with_children(children),
            ])
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_children(mut self, children: Vec<EditorNode>) -> Self {
        self.children = children;
        self
    }
}

struct Extractor<'a> {
    ids: &'a mut IdCounter,
}

impl Extractor<'_> {
    fn id_for(&mut self, node: &EditorNode) -> AreaId {
        let id = match node.id {
            Some(id) => AreaId(id),
            None => {
                let id = self.ids.next_id();
                trace!(%id, kind = ?node.kind, "node without id");
                id
            }
        };
        self.ids.observe(id);
        id
    }

    fn leaf(&mut self, node: &EditorNode) -> Option<LeafArea> {
        let (kind, content) = match node.kind {
            EditorNodeKind::Text => (LeafKind::Text, node.text.as_str()),
            EditorNodeKind::RenderedText => (
                LeafKind::Text,
                node.original.as_deref().unwrap_or(node.text.as_str()),
            ),
            EditorNodeKind::Math => (LeafKind::Math, node.text.as_str()),
            EditorNodeKind::Code => (LeafKind::Code, node.text.as_str()),
            _ => return None,
        };
        Some(LeafArea::new(self.id_for(node), kind, content))
    }

    fn leaves(&mut self, container: Option<&EditorNode>) -> Vec<LeafArea> {
        container
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.leaf(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn area(&mut self, node: &EditorNode) -> Option<Area> {
        match node.kind {
            EditorNodeKind::Input => {
                let id = self.id_for(node);
                let children = self.leaves(node.children.first());
                Some(
                    InputArea::new(id)
                        .with_status(node.status.unwrap_or_default())
                        .with_children(children)
                        .into(),
                )
            }
            EditorNodeKind::Collapsible => {
                let id = self.id_for(node);
                let title = node
                    .children
                    .first()
                    .map(|title| title.text.as_str())
                    .unwrap_or_default();
                let children = self.leaves(node.children.get(1));
                Some(
                    CollapsibleArea::new(id, title)
                        .with_children(children)
                        .into(),
                )
            }
            _ => self.leaf(node).map(Area::from),
        }
    }
}

/// Rebuild the area list from the children of the snapshot root
pub fn extract_areas(root: &EditorNode, ids: &mut IdCounter) -> Vec<Area> {
    let checkpoint = ids.checkpoint();
    let areas: Vec<Area> = {
        let mut extractor = Extractor { ids: &mut *ids };
        root.children
            .iter()
            .filter_map(|node| extractor.area(node))
            .collect()
    };
    ids.restore(checkpoint);
    let skipped = root.children.len() - areas.len();
    debug!(areas = areas.len(), skipped, "extracted snapshot");
    areas
}

/// A fresh document for `uri` built from an editor snapshot; ranges are not computed
pub fn extract_document(
    root: &EditorNode,
    uri: impl Into<String>,
    output_config: OutputConfig,
    ids: &mut IdCounter,
) -> ProofFlowDocument {
    ProofFlowDocument::new(uri, output_config).with_areas(extract_areas(root, ids))
}

fn leaf_node(leaf: &LeafArea) -> EditorNode {
    let kind = match leaf.kind() {
        LeafKind::Text => EditorNodeKind::Text,
        LeafKind::Code => EditorNodeKind::Code,
        LeafKind::Math => EditorNodeKind::Math,
    };
    EditorNode::leaf(kind, leaf.id().get(), leaf.content())
}

/// The snapshot an editing surface would hold after loading `doc`
///
/// Every node carries its area's id, so extracting the result gives the same tree back.
pub fn editor_tree(doc: &ProofFlowDocument) -> EditorNode {
    let nodes = doc
        .areas()
        .iter()
        .map(|area| {
            let children =
                || -> Vec<EditorNode> { area.children().iter().map(leaf_node).collect() };
            match area {
                Area::Leaf(leaf) => leaf_node(leaf),
                Area::Collapsible(collapsible) => EditorNode::collapsible(
                    collapsible.id().get(),
                    collapsible.title(),
                    children(),
                ),
                Area::Input(input) => {
                    EditorNode::input(input.id().get(), input.status(), children())
                }
            }
        })
        .collect();
    EditorNode::doc(nodes)
}
