//! Area tree definitions
//!
//!     This module provides the data model of a proof flow document: typed areas, the document
//!     aggregate that owns them, their identifiers and the ranges they occupy once serialized.
//!
//! Shape
//!
//!     The tree has exactly two levels. Top-level areas are leaves (Text, Code, Math) or
//!     containers (Collapsible, Input); containers hold leaves only.
//!
//!         Document
//!           ├─ Text
//!           ├─ Code
//!           ├─ Collapsible "Hint"
//!           │    ├─ Text
//!           │    └─ Code
//!           └─ Input
//!                └─ Code
//!
//!     See [area](area) for the element types and [document](document) for the aggregate.
//!
//! Ranges
//!
//!     A range records where an area's content sits inside the serialized document, both as a
//!     byte span and as line/character positions. Ranges are produced by the
//!     [mapping](crate::flow::mapping) module and are only valid for the output grammar they
//!     were computed with. See [range](range) for the position conventions.

pub mod area;
pub mod document;
pub mod ids;
pub mod range;

pub use area::{Area, AreaType, CollapsibleArea, InputArea, InputStatus, LeafArea, LeafKind};
pub use document::{AreaRef, ParentIndex, ProofFlowDocument};
pub use ids::{AreaId, Checkpoint, IdCounter};
pub use range::{Position, Range, SourceLocation};
