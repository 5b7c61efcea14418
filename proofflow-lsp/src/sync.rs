//! Incremental sync of one open document
//!
//!     A [SyncController] owns the current document of one file and keeps the server's copy
//!     up to date. Edits are reported with [SyncController::on_change]; the [Debouncer] decides
//!     when they are synced. A sync:
//!
//!         1. takes a snapshot from the editor and extracts a fresh area tree from it,
//!         2. serializes the tree in the file's dialect,
//!         3. drops the tree if the text equals the last synced text (nothing is sent),
//!         4. otherwise computes its ranges, swaps it in as the current document, bumps the
//!            version and sends the full text in `didChange`.
//!
//!     Timers are one tokio task each. A running timer is aborted before another one is armed,
//!     so at most one sync is ever pending. All state sits behind one async mutex, which keeps
//!     syncs, timer firings and flushes in order; the server is notified while the lock is held
//!     so versions arrive in the order they were assigned.

use crate::client::LanguageServer;
use crate::convert::to_lsp_position;
use crate::debounce::{Debouncer, Directive};
use crate::diagnostics::map_diagnostics;
use crate::editor::EditorSurface;
use crate::error::ClientError;
use lsp_types::{
    CompletionParams, CompletionResponse, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverParams, PublishDiagnosticsParams,
    TextDocumentContentChangeEvent, TextDocumentIdentifier, TextDocumentPositionParams, Url,
    VersionedTextDocumentIdentifier,
};
use proofflow_config::SyncConfig;
use proofflow_parser::flow::ast::{AreaId, IdCounter, ProofFlowDocument};
use proofflow_parser::flow::extraction::extract_document;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

struct SyncState {
    debouncer: Debouncer,
    document: Arc<ProofFlowDocument>,
    text: String,
    version: i32,
    ids: IdCounter,
    timer: Option<JoinHandle<()>>,
    opened_at: Instant,
    last_synced_at: Option<Instant>,
}

impl SyncState {
    /// The open counts as a sync: the server received the text then
    fn last_sync(&self) -> Instant {
        self.last_synced_at.unwrap_or(self.opened_at)
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared<E, S> {
    editor: E,
    server: Arc<S>,
    uri: Url,
    state: Mutex<SyncState>,
}

impl<E: EditorSurface, S: LanguageServer> Shared<E, S> {
    async fn sync(&self, state: &mut SyncState) {
        let snapshot = self.editor.snapshot();
        let config = state.document.output_config().clone();
        let mut document = extract_document(&snapshot, self.uri.as_str(), config, &mut state.ids);
        let text = document.to_source();
        if text == state.text {
            debug!(uri = %self.uri, "content unchanged, nothing to send");
            return;
        }

        if document.update_bounds().is_err() {
            debug!(uri = %self.uri, "adopting a document without ranges");
        }
        state.version += 1;
        state.document = Arc::new(document);
        state.text = text.clone();
        state.last_synced_at = Some(Instant::now());
        debug!(uri = %self.uri, version = state.version, "document synced");

        self.server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier::new(
                    self.uri.clone(),
                    state.version,
                ),
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text,
                }],
            })
            .await;
    }

    async fn fire(&self) {
        let mut state = self.state.lock().await;
        if state.debouncer.on_timer(Instant::now()) {
            // this task is the timer; it finishes on its own
            state.timer = None;
            self.sync(&mut state).await;
        }
    }
}

/// Sync driver for one open document
pub struct SyncController<E, S> {
    shared: Arc<Shared<E, S>>,
}

impl<E, S> Clone for SyncController<E, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E: EditorSurface, S: LanguageServer> SyncController<E, S> {
    /// Take over `document`, already announced to the server at `version`
    ///
    /// The document should have its ranges computed; `ids` is the counter it was parsed with.
    pub fn new(
        editor: E,
        server: Arc<S>,
        uri: Url,
        document: ProofFlowDocument,
        version: i32,
        ids: IdCounter,
        config: &SyncConfig,
    ) -> Self {
        let text = document.to_source();
        let opened_at = Instant::now();
        let state = SyncState {
            debouncer: Debouncer::from_config(config, opened_at),
            document: Arc::new(document),
            text,
            version,
            ids,
            timer: None,
            opened_at,
            last_synced_at: None,
        };
        Self {
            shared: Arc::new(Shared {
                editor,
                server,
                uri,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.shared.uri
    }

    pub fn editor(&self) -> &E {
        &self.shared.editor
    }

    /// The current document; later syncs never change it
    pub async fn document(&self) -> Arc<ProofFlowDocument> {
        Arc::clone(&self.shared.state.lock().await.document)
    }

    /// The text the server last received, which is also what gets saved
    pub async fn text(&self) -> String {
        self.shared.state.lock().await.text.clone()
    }

    pub async fn version(&self) -> i32 {
        self.shared.state.lock().await.version
    }

    pub async fn last_synced_at(&self) -> Option<Instant> {
        self.shared.state.lock().await.last_synced_at
    }

    pub async fn is_pending(&self) -> bool {
        self.shared.state.lock().await.debouncer.is_pending()
    }

    /// Report an edit in the editor
    pub async fn on_change(&self) {
        let mut state = self.shared.state.lock().await;
        let last_sync = state.last_sync();
        match state.debouncer.on_change(Instant::now(), last_sync) {
            Directive::SyncNow => {
                state.cancel_timer();
                self.shared.sync(&mut state).await;
            }
            Directive::Schedule(deadline) => {
                state.cancel_timer();
                let shared = Arc::clone(&self.shared);
                state.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    shared.fire().await;
                }));
                trace!(uri = %self.shared.uri, "sync scheduled");
            }
            Directive::Keep => {}
        }
    }

    /// Sync now if a sync is pending
    pub async fn flush(&self) {
        let mut state = self.shared.state.lock().await;
        if state.debouncer.flush() {
            state.cancel_timer();
            self.shared.sync(&mut state).await;
        }
    }

    /// Flush and return the text to write to disk
    pub async fn save(&self) -> String {
        self.flush().await;
        self.text().await
    }

    /// Flush, stop the timer and tell the server the file is closed
    pub async fn close(&self) {
        self.flush().await;
        self.shared.state.lock().await.cancel_timer();
        self.shared
            .server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier::new(self.shared.uri.clone()),
            })
            .await;
        info!(uri = %self.shared.uri, "document closed");
    }

    /// Map server diagnostics onto the current document and show them
    pub async fn on_diagnostics(&self, params: PublishDiagnosticsParams) {
        if params.uri != self.shared.uri {
            trace!(uri = %params.uri, "diagnostics for another document");
            return;
        }
        let document = self.document().await;
        let mapped = map_diagnostics(&document, &params.diagnostics);
        self.shared
            .editor
            .show_diagnostics(self.shared.uri.as_str(), mapped);
    }

    /// Request position for byte `offset` into area `area`
    pub async fn text_document_position(
        &self,
        area: AreaId,
        offset: usize,
    ) -> Option<TextDocumentPositionParams> {
        let position = self.document().await.get_position(area, offset)?;
        Some(TextDocumentPositionParams {
            text_document: TextDocumentIdentifier::new(self.shared.uri.clone()),
            position: to_lsp_position(position),
        })
    }

    pub async fn hover_at(&self, area: AreaId, offset: usize) -> Result<Option<Hover>, ClientError> {
        let Some(position) = self.text_document_position(area, offset).await else {
            return Ok(None);
        };
        self.shared
            .server
            .hover(HoverParams {
                text_document_position_params: position,
                work_done_progress_params: Default::default(),
            })
            .await
    }

    pub async fn definition_at(
        &self,
        area: AreaId,
        offset: usize,
    ) -> Result<Option<GotoDefinitionResponse>, ClientError> {
        let Some(position) = self.text_document_position(area, offset).await else {
            return Ok(None);
        };
        self.shared
            .server
            .definition(GotoDefinitionParams {
                text_document_position_params: position,
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
    }

    pub async fn completion_at(
        &self,
        area: AreaId,
        offset: usize,
    ) -> Result<Option<CompletionResponse>, ClientError> {
        let Some(position) = self.text_document_position(area, offset).await else {
            return Ok(None);
        };
        self.shared
            .server
            .completion(CompletionParams {
                text_document_position: position,
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
    }
}
