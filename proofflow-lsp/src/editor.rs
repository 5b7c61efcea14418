//! The editing surface as seen from the sync side

use crate::diagnostics::MappedDiagnostic;
use proofflow_parser::flow::extraction::EditorNode;

/// A rich-text editor holding one open document
///
/// Calls come from the controller's task; implementations hand the work over to their own UI
/// thread if they have one.
pub trait EditorSurface: Send + Sync + 'static {
    /// Replace the editor content with a freshly opened document
    fn load(&self, root: EditorNode);

    /// The current content as a snapshot tree
    fn snapshot(&self) -> EditorNode;

    /// Display diagnostics for `uri`, replacing the previous set
    fn show_diagnostics(&self, uri: &str, diagnostics: Vec<MappedDiagnostic>);
}

impl<T: EditorSurface> EditorSurface for std::sync::Arc<T> {
    fn load(&self, root: EditorNode) {
        (**self).load(root)
    }

    fn snapshot(&self) -> EditorNode {
        (**self).snapshot()
    }

    fn show_diagnostics(&self, uri: &str, diagnostics: Vec<MappedDiagnostic>) {
        (**self).show_diagnostics(uri, diagnostics)
    }
}
