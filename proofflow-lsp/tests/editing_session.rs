//! A whole editing session against a recording server
//!
//! Opens the CoqMD sample, edits it the way a student would and checks what the server and the
//! editor get to see along the way.

use lsp_types::{Diagnostic, DiagnosticSeverity, Position, PublishDiagnosticsParams, Range};
use proofflow_lsp::testing::{MemoryEditor, RecordingServer};
use proofflow_lsp::Session;
use proofflow_parser::flow::ast::{AreaId, AreaType};
use proofflow_parser::flow::extraction::{EditorNode, EditorNodeKind};
use proofflow_parser::flow::parsing::Dialect;
use proofflow_parser::flow::testing::Sample;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Id of the first code leaf inside the input area
fn input_code_id(doc: &proofflow_parser::flow::ast::ProofFlowDocument) -> AreaId {
    doc.areas()
        .iter()
        .find(|area| area.area_type() == AreaType::Input)
        .and_then(|input| input.children().first())
        .map(|leaf| leaf.id())
        .expect("sample has an input area")
}

#[tokio::test(start_paused = true)]
async fn test_student_edits_input_area() {
    let sample = Sample::get(Dialect::CoqMD);
    let session = Session::new(
        RecordingServer::new(),
        proofflow_config::load_defaults().unwrap(),
    );
    let editor = Arc::new(MemoryEditor::new());
    let controller = session
        .open(
            Path::new("/course/naturals.mv"),
            sample.source,
            Arc::clone(&editor),
        )
        .await
        .unwrap();

    let opened = controller.document().await;
    let code = input_code_id(&opened);

    // typing a proof, one tactic at a time
    for tactic in ["\n  induction n.", "\n  reflexivity.", "\n  simpl."] {
        editor.append(code.get(), tactic);
        controller.on_change().await;
        tokio::time::sleep(ms(60)).await;
    }
    tokio::time::sleep(ms(1000)).await;

    let changes = session.server().inner().changes();
    assert_eq!(changes.len(), 1);
    let (version, text) = &changes[0];
    assert_eq!(*version, 2);
    assert!(text.contains("Admitted.\n  induction n.\n  reflexivity.\n  simpl.\n```\n</input-area>"));

    // the server complains about the last tactic
    let current = controller.document().await;
    let leaf = current.find(code).unwrap();
    let range = leaf.range().unwrap();
    let line = range.end.line as u32;
    let diagnostic = Diagnostic {
        severity: Some(DiagnosticSeverity::ERROR),
        ..Diagnostic::new_simple(
            Range::new(Position::new(line, 2), Position::new(line, 8)),
            "No such goal.".to_string(),
        )
    };
    controller
        .on_diagnostics(PublishDiagnosticsParams::new(
            controller.uri().clone(),
            vec![diagnostic],
            Some(*version),
        ))
        .await;

    let shown = editor.diagnostics();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].area, code);
    let content = leaf.content();
    assert_eq!(&content[shown[0].start..shown[0].end], "simpl.");

    // saving writes what the server has
    assert_eq!(controller.save().await, *text);
}

#[tokio::test(start_paused = true)]
async fn test_inserted_area_gets_a_fresh_id() {
    let sample = Sample::get(Dialect::Coq);
    let session = Session::new(
        RecordingServer::new(),
        proofflow_config::load_defaults().unwrap(),
    );
    let editor = Arc::new(MemoryEditor::new());
    let controller = session
        .open(Path::new("/course/naturals.v"), sample.source, Arc::clone(&editor))
        .await
        .unwrap();
    let highest = controller
        .document()
        .await
        .iter_all()
        .map(|area| area.id())
        .max()
        .unwrap();

    tokio::time::sleep(ms(1000)).await;
    editor.insert(
        0,
        EditorNode::new(EditorNodeKind::Text).with_text("Exercise 1"),
    );
    controller.on_change().await;

    let doc = controller.document().await;
    assert_eq!(doc.areas()[0].content(), "Exercise 1");
    assert!(doc.areas()[0].id() > highest);
    assert!(session.server().inner().changes()[0]
        .1
        .starts_with("(** Exercise 1 *)"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_server_does_not_block_editing() {
    let session = Session::new(
        RecordingServer::new().with_delay(ms(60_000)),
        proofflow_config::load_defaults().unwrap(),
    );
    let editor = Arc::new(MemoryEditor::new());
    let controller = session
        .open(Path::new("/course/a.v"), "auto.", Arc::clone(&editor))
        .await
        .unwrap();

    let hover = controller.hover_at(AreaId(0), 1).await;
    assert!(hover.is_err());

    tokio::time::sleep(ms(1000)).await;
    editor.set_text(0, "lia.");
    controller.on_change().await;
    assert_eq!(controller.version().await, 2);
    assert_eq!(controller.text().await, "lia.");
}
