//! Conversion tests (dialect → dialect)
//!
//! These go through the registry the way the CLI does: parse with one dialect, serialize with
//! another, and parse the result again with the target.

use proofflow_babel::{FormatError, FormatRegistry};
use proofflow_parser::flow::ast::IdCounter;
use proofflow_parser::flow::parsing::Dialect;
use proofflow_parser::flow::testing::{assert_ranges_match, assert_same_shape, Sample};
use rstest::rstest;
use std::path::Path;

const COQMD_EXAMPLE: &str = "Some intro text\n```coq\nTheorem t : True.\n```\n<hint title=\"Proof\">\n```coq\nProof. trivial. Qed.\n```\n</hint>";

#[test]
fn test_coqmd_to_coq() {
    let registry = FormatRegistry::with_defaults();
    let doc = registry
        .parse("file:///t.mv", COQMD_EXAMPLE, "coqmd", &mut IdCounter::new())
        .unwrap();
    let coq = registry.serialize(&doc, "coq").unwrap();
    assert_eq!(
        coq,
        "(** Some intro text *)Theorem t : True.(* begin details : Proof *)Proof. trivial. Qed.(* end details *)"
    );
}

#[rstest]
#[case::coq(Dialect::Coq)]
#[case::coqmd(Dialect::CoqMD)]
#[case::pure_lean(Dialect::PureLean)]
fn test_lean_sample_converts(#[case] target: Dialect) {
    let registry = FormatRegistry::with_defaults();
    let sample = Sample::get(Dialect::Lean);
    let original = registry
        .parse("file:///a.lean", sample.source, "lean", &mut IdCounter::new())
        .unwrap();

    let converted = registry.serialize(&original, target.name()).unwrap();
    let reparsed = registry
        .parse("file:///b", &converted, target.name(), &mut IdCounter::new())
        .unwrap();

    assert_same_shape(reparsed.areas(), original.areas());
    assert_ranges_match(&reparsed);
}

#[rstest]
#[case::coq(Dialect::Coq)]
#[case::coqmd(Dialect::CoqMD)]
#[case::lean(Dialect::Lean)]
#[case::pure_lean(Dialect::PureLean)]
fn test_samples_through_lean(#[case] dialect: Dialect) {
    let registry = FormatRegistry::with_defaults();
    let sample = Sample::get(dialect);
    let original = registry
        .parse(&sample.uri(), sample.source, dialect.name(), &mut IdCounter::new())
        .unwrap();

    let lean = registry.serialize(&original, "lean").unwrap();
    let back = registry
        .parse("file:///c.lean", &lean, "lean", &mut IdCounter::new())
        .unwrap();
    assert_same_shape(back.areas(), original.areas());

    // Serializing in the sample's own dialect gives the sample back
    assert_eq!(
        registry.serialize(&back, dialect.name()).unwrap(),
        sample.source
    );
}

#[test]
fn test_treeviz_of_every_sample() {
    let registry = FormatRegistry::with_defaults();
    for sample in proofflow_parser::flow::testing::SAMPLES {
        let doc = sample.parse();
        let view = registry.serialize(&doc, "treeviz").unwrap();
        let lines = view.lines().count();
        let expected = 1 + doc.iter_all().count();
        assert_eq!(lines, expected, "{}", sample.name);
    }
}

#[rstest]
#[case("proof.v", false, "coq")]
#[case("chapter.mv", false, "coqmd")]
#[case("Basic.lean", false, "lean")]
#[case("Basic.lean", true, "pure-lean")]
fn test_format_for_path(#[case] path: &str, #[case] pure_lean: bool, #[case] expected: &str) {
    let registry = FormatRegistry::with_defaults();
    let format = registry.for_path(Path::new(path), pure_lean).unwrap();
    assert_eq!(format.name(), expected);
}

#[test]
fn test_unknown_format() {
    let registry = FormatRegistry::with_defaults();
    let result = registry.parse("file:///a", "x", "html", &mut IdCounter::new());
    assert!(matches!(result, Err(FormatError::FormatNotFound(name)) if name == "html"));
}
