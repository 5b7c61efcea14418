//! Language-server synchronization for proof-flow documents
//!
//!     The editing surface and the language server never see each other. The editor holds an
//!     area tree; the server holds flat text in one of the dialects. This crate keeps the two
//!     aligned:
//!
//!         editor change ─► Debouncer ─► extract ─► serialize ─► didChange ─► server
//!         editor display ◄─ (area, local offsets) ◄─ position mapper ◄─ diagnostics ◄─┘
//!
//! Architecture
//!
//!     - [LanguageServer](client::LanguageServer): the server as an async trait over `lsp-types`
//!       payloads. [TimedServer](client::TimedServer) wraps any implementation so that no call
//!       waits longer than the configured request timeout.
//!     - [EditorSurface](editor::EditorSurface): the editing surface, narrowed to loading a tree,
//!       handing out snapshots and displaying mapped diagnostics.
//!     - [Debouncer](debounce::Debouncer): a pure state machine deciding when a burst of edits
//!       is synced. It takes timestamps and returns directives, and knows nothing about tasks.
//!     - [SyncController](sync::SyncController): drives the debouncer on tokio, owns the current
//!       document of one open file and talks to the server for it.
//!     - [Session](session::Session): the server handshake plus opening files by path.
//!
//!     The file structure:
//!     .
//!     ├── client.rs          # LanguageServer trait, TimedServer
//!     ├── convert.rs         # positions between the area tree and lsp-types
//!     ├── debounce.rs        # Idle / PendingTypingBuffer / PendingMaxWait
//!     ├── diagnostics.rs     # server diagnostics -> (area, local offsets)
//!     ├── editor.rs          # EditorSurface trait
//!     ├── error.rs
//!     ├── session.rs
//!     ├── sync.rs            # SyncController
//!     ├── testing.rs         # recording server and in-memory editor
//!     └── lib.rs
//!
//! Concurrency
//!
//!     Everything on the document side is synchronous. The server is the only async boundary.
//!     Each controller serializes its own work behind one lock: a sync extracts, compares,
//!     swaps the current document and notifies the server before the next event is looked at.
//!     Readers clone the current `Arc<ProofFlowDocument>` and so always see a whole document.
//!     A new edit never cancels a request already in flight.

pub mod client;
pub mod convert;
pub mod debounce;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod session;
pub mod sync;
pub mod testing;

pub use client::{LanguageServer, TimedServer};
pub use debounce::{DebounceState, Debouncer, Directive};
pub use diagnostics::{map_diagnostic, map_diagnostics, MappedDiagnostic};
pub use editor::EditorSurface;
pub use error::{ClientError, SessionError};
pub use session::Session;
pub use sync::SyncController;
