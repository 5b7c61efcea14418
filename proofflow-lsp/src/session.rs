//! A language-server session and the files opened in it
//!
//!     Opening a file is the only place source text is parsed:
//!
//!         path ─► file type ─► dialect ─► parse ─► ranges ─► editor.load ─► didOpen
//!
//!     Unknown extensions are refused before anything is read into a tree. From then on the
//!     returned [SyncController] owns the document, and live edits only ever reach it through
//!     extraction.

use crate::client::{LanguageServer, TimedServer};
use crate::editor::EditorSurface;
use crate::error::{ClientError, SessionError};
use crate::sync::SyncController;
use lsp_types::{
    DidOpenTextDocumentParams, InitializeParams, InitializeResult, InitializedParams,
    TextDocumentItem, Url,
};
use proofflow_config::ProofFlowConfig;
use proofflow_parser::flow::ast::IdCounter;
use proofflow_parser::flow::extraction::editor_tree;
use proofflow_parser::flow::output::FileType;
use proofflow_parser::flow::parsing::Dialect;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Version announced in `didOpen`
pub const INITIAL_VERSION: i32 = 1;

pub struct Session<S> {
    server: Arc<TimedServer<S>>,
    config: ProofFlowConfig,
}

impl<S: LanguageServer> Session<S> {
    /// Wrap `server` with the configured request timeout
    pub fn new(server: S, config: ProofFlowConfig) -> Self {
        let timeout = config.server.request_timeout();
        Self {
            server: Arc::new(TimedServer::new(server, timeout)),
            config,
        }
    }

    pub fn server(&self) -> &Arc<TimedServer<S>> {
        &self.server
    }

    pub fn config(&self) -> &ProofFlowConfig {
        &self.config
    }

    /// The `initialize` / `initialized` handshake
    pub async fn start(&self, params: InitializeParams) -> Result<InitializeResult, ClientError> {
        let result = self.server.initialize(params).await?;
        self.server.initialized(InitializedParams {}).await;
        info!(
            server = result
                .server_info
                .as_ref()
                .map(|info| info.name.as_str())
                .unwrap_or("unknown"),
            "language server initialized"
        );
        Ok(result)
    }

    /// Dialect used for `path`, if it has one
    pub fn dialect_for(&self, path: &Path) -> Option<Dialect> {
        Dialect::for_file_type(FileType::from_path(path), self.config.output.pure_lean)
    }

    /// Parse `source` read from `path`, load it into `editor` and announce it to the server
    pub async fn open<E: EditorSurface>(
        &self,
        path: &Path,
        source: &str,
        editor: E,
    ) -> Result<SyncController<E, TimedServer<S>>, SessionError> {
        let file_type = FileType::from_path(path);
        let dialect = self
            .dialect_for(path)
            .ok_or_else(|| SessionError::UnsupportedFileType(path.to_path_buf()))?;
        let uri =
            Url::from_file_path(path).map_err(|_| SessionError::InvalidPath(path.to_path_buf()))?;

        let mut ids = IdCounter::new();
        let mut document = dialect.parse_document(uri.as_str(), source, &mut ids);
        document.update_bounds()?;
        debug!(%uri, %dialect, areas = document.areas().len(), "opened document");

        editor.load(editor_tree(&document));

        let language_id = self
            .config
            .server
            .language_ids
            .for_file_type(file_type)
            .unwrap_or(dialect.name())
            .to_string();
        self.server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem::new(
                    uri.clone(),
                    language_id,
                    INITIAL_VERSION,
                    document.to_source(),
                ),
            })
            .await;

        Ok(SyncController::new(
            editor,
            Arc::clone(&self.server),
            uri,
            document,
            INITIAL_VERSION,
            ids,
            &self.config.sync,
        ))
    }

    /// The `shutdown` request followed by `exit`
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        self.server.shutdown().await?;
        self.server.exit().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryEditor, RecordingServer};
    use proofflow_config::Loader;
    use proofflow_parser::flow::extraction::EditorNodeKind;

    fn session() -> Session<RecordingServer> {
        Session::new(
            RecordingServer::new(),
            proofflow_config::load_defaults().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_unknown_extension_is_refused() {
        let session = session();
        let result = session
            .open(Path::new("/work/notes.txt"), "text", MemoryEditor::new())
            .await;
        assert!(matches!(result, Err(SessionError::UnsupportedFileType(path)) if path.ends_with("notes.txt")));
        assert!(session.server().inner().log().opened.is_empty());
    }

    #[tokio::test]
    async fn test_open_announces_document() {
        let session = session();
        let source = "Intro\n```coq\nQed.\n```\n";
        let controller = session
            .open(Path::new("/work/chapter.mv"), source, MemoryEditor::new())
            .await
            .unwrap();

        let opened = session.server().inner().log().opened;
        assert_eq!(opened.len(), 1);
        let item = &opened[0].text_document;
        assert_eq!(item.uri.as_str(), "file:///work/chapter.mv");
        assert_eq!(item.language_id, "coqmd");
        assert_eq!(item.version, INITIAL_VERSION);
        assert_eq!(item.text, source);

        let snapshot = controller.editor().snapshot();
        let kinds: Vec<EditorNodeKind> = snapshot.children.iter().map(|node| node.kind).collect();
        assert_eq!(kinds, vec![EditorNodeKind::Text, EditorNodeKind::Code]);
        assert!(controller.document().await.bounds_valid());
    }

    #[tokio::test]
    async fn test_lean_language_id_and_pure_lean_switch() {
        let session = session();
        assert_eq!(
            session.dialect_for(Path::new("Basic.lean")),
            Some(Dialect::Lean)
        );
        session
            .open(Path::new("/work/Basic.lean"), ":::code\nrfl\n:::\n", MemoryEditor::new())
            .await
            .unwrap();
        assert_eq!(
            session.server().inner().log().opened[0].text_document.language_id,
            "lean4"
        );

        let config = Loader::new()
            .set_override("output.pure_lean", true)
            .unwrap()
            .build()
            .unwrap();
        let pure = Session::new(RecordingServer::new(), config);
        assert_eq!(
            pure.dialect_for(Path::new("Basic.lean")),
            Some(Dialect::PureLean)
        );
    }

    #[tokio::test]
    async fn test_relative_path_is_refused() {
        let result = session()
            .open(Path::new("proof.v"), "auto.", MemoryEditor::new())
            .await;
        assert!(matches!(result, Err(SessionError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let session = session();
        let result = session.start(InitializeParams::default()).await.unwrap();
        assert_eq!(result.server_info.unwrap().name, "recording");
        session.shutdown().await.unwrap();

        let log = session.server().inner().log();
        assert!(log.initialized);
        assert!(log.shut_down);
        assert!(log.exited);
    }
}
