//! Format interoperability for proof-flow documents
//!
//!     This crate gives every surface syntax of a proof-flow document the same interface, so the
//!     CLI and the editing session can convert between them without knowing their details.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: discovery and selection of formats by name or file extension
//!     - Format implementations: one per dialect, plus an inspection format
//!
//!     This is a pure lib: it powers proofflow-cli but assumes nothing about a shell. No code here
//!     prints, reads environment variables or touches the file system.
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── dialect.rs          # coq, coqmd, lean and pure-lean
//!     │   ├── treeviz.rs          # one line per area, for inspection
//!     │   └── mod.rs
//!     ├── lib.rs
//!
//! Conversions
//!
//!     Every dialect carries the same area tree, so converting is parse with one dialect and
//!     serialize with another. Conversions are lossless for the tree but not for the bytes:
//!     default regions that end up adjacent in the target dialect merge on the next parse, and
//!     content that happens to contain the target's delimiters does not survive at all.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;
