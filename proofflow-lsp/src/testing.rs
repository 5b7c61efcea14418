//! Test doubles for both collaborators
//!
//!     [RecordingServer] answers every call and records what it was sent, optionally after a
//!     delay so timeouts can be exercised on a paused clock. [MemoryEditor] keeps the snapshot
//!     tree in memory and lets a test type into it by area id.
//!
//!         let editor = Arc::new(MemoryEditor::new());
//!         let controller = session.open(path, source, Arc::clone(&editor)).await?;
//!         editor.append(3, " more");
//!         controller.on_change().await;

use crate::client::LanguageServer;
use crate::diagnostics::MappedDiagnostic;
use crate::editor::EditorSurface;
use crate::error::ClientError;
use async_trait::async_trait;
use lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents, HoverParams,
    InitializeParams, InitializeResult, InitializedParams, Location, MarkupContent, MarkupKind,
    Position, ServerInfo, TextDocumentIdentifier, TextDocumentPositionParams, Url,
};
use proofflow_parser::flow::extraction::{EditorNode, EditorNodeKind};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Everything a [RecordingServer] has been sent
#[derive(Debug, Clone, Default)]
pub struct ServerLog {
    pub initialized: bool,
    pub shut_down: bool,
    pub exited: bool,
    pub opened: Vec<DidOpenTextDocumentParams>,
    /// (version, full text) per didChange
    pub changes: Vec<(i32, String)>,
    pub closed: Vec<Url>,
    pub hovers: Vec<Position>,
}

#[derive(Debug, Default)]
pub struct RecordingServer {
    delay: Option<Duration>,
    log: Mutex<ServerLog>,
}

impl RecordingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before it is recorded
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn record(&self) -> MutexGuard<'_, ServerLog> {
        self.log.lock().expect("server log poisoned")
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn log(&self) -> ServerLog {
        self.record().clone()
    }

    pub fn changes(&self) -> Vec<(i32, String)> {
        self.record().changes.clone()
    }

    pub fn hovers(&self) -> Vec<Position> {
        self.record().hovers.clone()
    }

    pub fn exited(&self) -> bool {
        self.record().exited
    }
}

#[async_trait]
impl LanguageServer for RecordingServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult, ClientError> {
        self.pause().await;
        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "recording".to_string(),
                version: None,
            }),
            ..InitializeResult::default()
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.pause().await;
        self.record().initialized = true;
    }

    async fn shutdown(&self) -> Result<(), ClientError> {
        self.pause().await;
        self.record().shut_down = true;
        Ok(())
    }

    async fn exit(&self) {
        self.pause().await;
        self.record().exited = true;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.pause().await;
        self.record().opened.push(params);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.pause().await;
        let text = params
            .content_changes
            .into_iter()
            .map(|change| change.text)
            .collect::<String>();
        self.record()
            .changes
            .push((params.text_document.version, text));
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.pause().await;
        self.record().closed.push(params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>, ClientError> {
        self.pause().await;
        let position = params.text_document_position_params.position;
        self.record().hovers.push(position);
        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: format!("hover at {}:{}", position.line, position.character),
            }),
            range: None,
        }))
    }

    async fn definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>, ClientError> {
        self.pause().await;
        let position = params.text_document_position_params;
        Ok(Some(GotoDefinitionResponse::Scalar(Location::new(
            position.text_document.uri,
            lsp_types::Range::new(position.position, position.position),
        ))))
    }
}

/// An editing surface backed by an in-memory snapshot tree
#[derive(Debug)]
pub struct MemoryEditor {
    root: Mutex<EditorNode>,
    shown: Mutex<Vec<(String, Vec<MappedDiagnostic>)>>,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn find_node(node: &mut EditorNode, id: u64) -> Option<&mut EditorNode> {
    if node.id == Some(id) && node.kind != EditorNodeKind::Doc {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_node(child, id))
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(EditorNode::doc(Vec::new())),
            shown: Mutex::new(Vec::new()),
        }
    }

    fn tree(&self) -> MutexGuard<'_, EditorNode> {
        self.root.lock().expect("editor tree poisoned")
    }

    /// Change the text of the node with `id`; false when there is none
    pub fn set_text(&self, id: u64, text: &str) -> bool {
        match find_node(&mut self.tree(), id) {
            Some(node) => {
                node.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Type `suffix` at the end of the node with `id`
    pub fn append(&self, id: u64, suffix: &str) -> bool {
        match find_node(&mut self.tree(), id) {
            Some(node) => {
                node.text.push_str(suffix);
                true
            }
            None => false,
        }
    }

    /// Insert a top-level node at `index`
    pub fn insert(&self, index: usize, node: EditorNode) {
        self.tree().children.insert(index, node);
    }

    /// The most recently displayed diagnostics
    pub fn diagnostics(&self) -> Vec<MappedDiagnostic> {
        self.shown
            .lock()
            .expect("diagnostics poisoned")
            .last()
            .map(|(_, diagnostics)| diagnostics.clone())
            .unwrap_or_default()
    }

    pub fn diagnostic_updates(&self) -> usize {
        self.shown.lock().expect("diagnostics poisoned").len()
    }
}

impl EditorSurface for MemoryEditor {
    fn load(&self, root: EditorNode) {
        *self.tree() = root;
    }

    fn snapshot(&self) -> EditorNode {
        self.tree().clone()
    }

    fn show_diagnostics(&self, uri: &str, diagnostics: Vec<MappedDiagnostic>) {
        self.shown
            .lock()
            .expect("diagnostics poisoned")
            .push((uri.to_string(), diagnostics));
    }
}

pub fn hover_params(uri: &str, line: u32, character: u32) -> HoverParams {
    HoverParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).expect("valid uri"),
            },
            position: Position::new(line, character),
        },
        work_done_progress_params: Default::default(),
    }
}
