//! The language server as seen from the document side
//!
//!     [LanguageServer] mirrors the client half of the protocol: lifecycle, document
//!     notifications and the position requests the editor issues. Transport is the implementor's
//!     business. Requests have defaults answering `None`, so a server only implements what it
//!     supports.
//!
//!     [TimedServer] decorates any implementation with the request timeout. A call that does not
//!     finish in time fails with [ClientError::Timeout] and the feature is simply unavailable;
//!     notifications that time out are dropped with a warning.

use crate::error::ClientError;
use async_trait::async_trait;
use lsp_types::request::{
    GotoDeclarationParams, GotoDeclarationResponse, GotoTypeDefinitionParams,
    GotoTypeDefinitionResponse,
};
use lsp_types::{
    CompletionParams, CompletionResponse, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverParams,
    InitializeParams, InitializeResult, InitializedParams, Location, ReferenceParams,
    SignatureHelp, SignatureHelpParams,
};
use std::future::Future;
use std::time::Duration;
use tracing::{trace, warn};

#[async_trait]
pub trait LanguageServer: Send + Sync + 'static {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, ClientError>;

    async fn initialized(&self, params: InitializedParams);

    async fn shutdown(&self) -> Result<(), ClientError>;

    async fn exit(&self);

    async fn did_open(&self, params: DidOpenTextDocumentParams);

    async fn did_change(&self, params: DidChangeTextDocumentParams);

    async fn did_close(&self, params: DidCloseTextDocumentParams);

    async fn hover(&self, _params: HoverParams) -> Result<Option<Hover>, ClientError> {
        Ok(None)
    }

    async fn definition(
        &self,
        _params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>, ClientError> {
        Ok(None)
    }

    async fn type_definition(
        &self,
        _params: GotoTypeDefinitionParams,
    ) -> Result<Option<GotoTypeDefinitionResponse>, ClientError> {
        Ok(None)
    }

    async fn references(
        &self,
        _params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>, ClientError> {
        Ok(None)
    }

    async fn signature_help(
        &self,
        _params: SignatureHelpParams,
    ) -> Result<Option<SignatureHelp>, ClientError> {
        Ok(None)
    }

    async fn completion(
        &self,
        _params: CompletionParams,
    ) -> Result<Option<CompletionResponse>, ClientError> {
        Ok(None)
    }

    async fn goto_declaration(
        &self,
        _params: GotoDeclarationParams,
    ) -> Result<Option<GotoDeclarationResponse>, ClientError> {
        Ok(None)
    }
}

/// A server whose every call is bounded by a timeout
pub struct TimedServer<S> {
    inner: S,
    timeout: Duration,
}

impl<S: LanguageServer> TimedServer<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request<T: Send>(
        &self,
        method: &'static str,
        call: impl Future<Output = Result<T, ClientError>> + Send,
    ) -> Result<T, ClientError> {
        trace!(method, "request");
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(method, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                Err(ClientError::Timeout {
                    method,
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn notify(&self, method: &'static str, call: impl Future<Output = ()> + Send) {
        trace!(method, "notification");
        if tokio::time::timeout(self.timeout, call).await.is_err() {
            warn!(method, timeout_ms = self.timeout.as_millis() as u64, "notification dropped");
        }
    }
}

#[async_trait]
impl<S: LanguageServer> LanguageServer for TimedServer<S> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, ClientError> {
        self.request("initialize", self.inner.initialize(params)).await
    }

    async fn initialized(&self, params: InitializedParams) {
        self.notify("initialized", self.inner.initialized(params)).await
    }

    async fn shutdown(&self) -> Result<(), ClientError> {
        self.request("shutdown", self.inner.shutdown()).await
    }

    async fn exit(&self) {
        self.notify("exit", self.inner.exit()).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.notify("textDocument/didOpen", self.inner.did_open(params)).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.notify("textDocument/didChange", self.inner.did_change(params)).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.notify("textDocument/didClose", self.inner.did_close(params)).await
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>, ClientError> {
        self.request("textDocument/hover", self.inner.hover(params)).await
    }

    async fn definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>, ClientError> {
        self.request("textDocument/definition", self.inner.definition(params)).await
    }

    async fn type_definition(
        &self,
        params: GotoTypeDefinitionParams,
    ) -> Result<Option<GotoTypeDefinitionResponse>, ClientError> {
        self.request(
            "textDocument/typeDefinition",
            self.inner.type_definition(params),
        )
        .await
    }

    async fn references(
        &self,
        params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>, ClientError> {
        self.request("textDocument/references", self.inner.references(params)).await
    }

    async fn signature_help(
        &self,
        params: SignatureHelpParams,
    ) -> Result<Option<SignatureHelp>, ClientError> {
        self.request(
            "textDocument/signatureHelp",
            self.inner.signature_help(params),
        )
        .await
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>, ClientError> {
        self.request("textDocument/completion", self.inner.completion(params)).await
    }

    async fn goto_declaration(
        &self,
        params: GotoDeclarationParams,
    ) -> Result<Option<GotoDeclarationResponse>, ClientError> {
        self.request(
            "textDocument/declaration",
            self.inner.goto_declaration(params),
        )
        .await
    }
}
