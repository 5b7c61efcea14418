//! Area elements
//!
//!     An area is one semantic unit of a proof document: a paragraph of prose, a code block, a
//!     math block, or a container grouping such leaves.
//!
//!     Leaves:
//!         - Text: prose, rendered as markdown by the editing surface.
//!         - Code: proof script sent to the prover.
//!         - Math: display math.
//!
//!     Containers:
//!         - Collapsible: a titled section (hints, proof details) that can be folded away.
//!         - Input: the region a student is expected to edit, with a grading status.
//!
//!     Containers hold leaves only. The children of both container types are typed as
//!     `Vec<LeafArea>`, so nesting a container inside another cannot be expressed when building
//!     a tree statically. Callers holding an arbitrary [Area] go through `add_area`, which
//!     refuses containers and reports the refusal as `false`.
//!
//!     Ranges are derived data: they are filled in by the position mapper and dropped as soon as
//!     the area they describe is edited.

use super::ids::AreaId;
use super::range::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five area types, also the keys of an output grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Text,
    Code,
    Math,
    Collapsible,
    Input,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Text => "text",
            AreaType::Code => "code",
            AreaType::Math => "math",
            AreaType::Collapsible => "collapsible",
            AreaType::Input => "input",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, AreaType::Collapsible | AreaType::Input)
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf-only subset of [AreaType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    Text,
    Code,
    Math,
}

impl From<LeafKind> for AreaType {
    fn from(kind: LeafKind) -> Self {
        match kind {
            LeafKind::Text => AreaType::Text,
            LeafKind::Code => AreaType::Code,
            LeafKind::Math => AreaType::Math,
        }
    }
}

impl TryFrom<AreaType> for LeafKind {
    type Error = &'static str;

    fn try_from(area_type: AreaType) -> Result<Self, Self::Error> {
        match area_type {
            AreaType::Text => Ok(LeafKind::Text),
            AreaType::Code => Ok(LeafKind::Code),
            AreaType::Math => Ok(LeafKind::Math),
            AreaType::Collapsible | AreaType::Input => Err("containers are not leaf kinds"),
        }
    }
}

/// Grading state of an input area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStatus {
    Correct,
    Incorrect,
    #[default]
    Unattempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafArea {
    id: AreaId,
    kind: LeafKind,
    content: String,
    range: Option<Range>,
}

impl LeafArea {
    pub fn new(id: AreaId, kind: LeafKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            range: None,
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content, invalidating the range
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.range = None;
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    pub(crate) fn set_range(&mut self, range: Option<Range>) {
        self.range = range;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsibleArea {
    id: AreaId,
    title: String,
    children: Vec<LeafArea>,
    range: Option<Range>,
}

impl CollapsibleArea {
    pub fn new(id: AreaId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            children: Vec::new(),
            range: None,
        }
    }

    pub fn with_children(mut self, children: Vec<LeafArea>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.range = None;
    }

    pub fn children(&self) -> &[LeafArea] {
        &self.children
    }

    pub fn push(&mut self, child: LeafArea) {
        self.children.push(child);
        self.range = None;
    }

    /// Append `area` if it is a leaf; containers are refused and leave the children untouched
    pub fn add_area(&mut self, area: Area) -> bool {
        match area {
            Area::Leaf(leaf) => {
                self.push(leaf);
                true
            }
            Area::Collapsible(_) | Area::Input(_) => false,
        }
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArea {
    id: AreaId,
    status: InputStatus,
    children: Vec<LeafArea>,
    range: Option<Range>,
}

impl InputArea {
    pub fn new(id: AreaId) -> Self {
        Self {
            id,
            status: InputStatus::default(),
            children: Vec::new(),
            range: None,
        }
    }

    pub fn with_status(mut self, status: InputStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_children(mut self, children: Vec<LeafArea>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn status(&self) -> InputStatus {
        self.status
    }

    pub fn set_status(&mut self, status: InputStatus) {
        self.status = status;
    }

    pub fn children(&self) -> &[LeafArea] {
        &self.children
    }

    pub fn push(&mut self, child: LeafArea) {
        self.children.push(child);
        self.range = None;
    }

    /// Append `area` if it is a leaf; containers are refused and leave the children untouched
    pub fn add_area(&mut self, area: Area) -> bool {
        match area {
            Area::Leaf(leaf) => {
                self.push(leaf);
                true
            }
            Area::Collapsible(_) | Area::Input(_) => false,
        }
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }
}

/// Any area that may appear at the top level of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Area {
    Leaf(LeafArea),
    Collapsible(CollapsibleArea),
    Input(InputArea),
}

impl Area {
    pub fn text(id: AreaId, content: impl Into<String>) -> Self {
        Area::Leaf(LeafArea::new(id, LeafKind::Text, content))
    }

    pub fn code(id: AreaId, content: impl Into<String>) -> Self {
        Area::Leaf(LeafArea::new(id, LeafKind::Code, content))
    }

    pub fn math(id: AreaId, content: impl Into<String>) -> Self {
        Area::Leaf(LeafArea::new(id, LeafKind::Math, content))
    }

    pub fn id(&self) -> AreaId {
        match self {
            Area::Leaf(leaf) => leaf.id,
            Area::Collapsible(collapsible) => collapsible.id,
            Area::Input(input) => input.id,
        }
    }

    pub fn area_type(&self) -> AreaType {
        match self {
            Area::Leaf(leaf) => leaf.kind.into(),
            Area::Collapsible(_) => AreaType::Collapsible,
            Area::Input(_) => AreaType::Input,
        }
    }

    /// The leaf content, the collapsible title, or nothing for inputs
    pub fn content(&self) -> &str {
        match self {
            Area::Leaf(leaf) => &leaf.content,
            Area::Collapsible(collapsible) => &collapsible.title,
            Area::Input(_) => "",
        }
    }

    pub fn children(&self) -> &[LeafArea] {
        match self {
            Area::Leaf(_) => &[],
            Area::Collapsible(collapsible) => &collapsible.children,
            Area::Input(input) => &input.children,
        }
    }

    pub fn is_container(&self) -> bool {
        self.area_type().is_container()
    }

    pub fn range(&self) -> Option<&Range> {
        match self {
            Area::Leaf(leaf) => leaf.range.as_ref(),
            Area::Collapsible(collapsible) => collapsible.range.as_ref(),
            Area::Input(input) => input.range.as_ref(),
        }
    }

    pub(crate) fn set_range(&mut self, range: Option<Range>) {
        match self {
            Area::Leaf(leaf) => leaf.range = range,
            Area::Collapsible(collapsible) => collapsible.range = range,
            Area::Input(input) => input.range = range,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [LeafArea] {
        match self {
            Area::Leaf(_) => &mut [],
            Area::Collapsible(collapsible) => &mut collapsible.children,
            Area::Input(input) => &mut input.children,
        }
    }

    /// Drop this area's range and those of its children
    pub(crate) fn clear_ranges(&mut self) {
        self.set_range(None);
        for child in self.children_mut() {
            child.range = None;
        }
    }
}

impl From<LeafArea> for Area {
    fn from(leaf: LeafArea) -> Self {
        Area::Leaf(leaf)
    }
}

impl From<CollapsibleArea> for Area {
    fn from(collapsible: CollapsibleArea) -> Self {
        Area::Collapsible(collapsible)
    }
}

impl From<InputArea> for Area {
    fn from(input: InputArea) -> Self {
        Area::Input(input)
    }
}

impl TryFrom<Area> for LeafArea {
    type Error = &'static str;

    fn try_from(area: Area) -> Result<Self, Self::Error> {
        match area {
            Area::Leaf(leaf) => Ok(leaf),
            Area::Collapsible(_) => Err("Collapsible areas cannot be nested"),
            Area::Input(_) => Err("Input areas cannot be nested"),
        }
    }
}
