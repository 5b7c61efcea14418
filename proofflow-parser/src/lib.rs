//! # proofflow-parser
//!
//! The proof-flow document model: a typed tree of areas (prose, code, math, collapsible
//! sections and student input regions) backing an interactive Coq/Lean proof editor.
//!
//! File Layout
//!
//!     src/flow
//!       ├── ast          Areas, documents, ids and source ranges
//!       ├── output       Output grammars (delimiters per area type and dialect)
//!       ├── serializer   Area tree -> source text
//!       ├── mapping      Serialized text <-> area ranges and local offsets
//!       ├── extraction   Editor snapshot -> area tree
//!       ├── parsing      Source text -> area tree, one parser per dialect
//!       └── testing      Factories and assertions shared by the test suites
//!
//!     Every stage is pure and synchronous. The only stateful piece a caller threads through
//!     is the [IdCounter](flow::ast::IdCounter), which is owned by whoever owns the editing
//!     or parsing session.

pub mod flow;
