//! Property tests for the parse/serialize round trip and the position mapper

use proofflow_parser::flow::ast::{Area, InputStatus, LeafKind, Position};
use proofflow_parser::flow::ast::IdCounter;
use proofflow_parser::flow::parsing::Dialect;
use proofflow_parser::flow::serializer::serialize_areas;
use proofflow_parser::flow::testing::{assert_ranges_match, shape, Shape, TreeBuilder};
use proptest::prelude::*;

/// Content that never contains a delimiter of any grammar
fn content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;=+\n]{0,24}"
}

fn title() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Z][a-z]{0,8}"]
}

fn leaf_kind() -> impl Strategy<Value = LeafKind> {
    prop_oneof![
        Just(LeafKind::Text),
        Just(LeafKind::Code),
        Just(LeafKind::Math)
    ]
}

fn leaf() -> impl Strategy<Value = (LeafKind, String)> {
    (leaf_kind(), content())
}

fn area_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        3 => leaf().prop_map(|(kind, content)| Shape::Leaf(kind, content)),
        1 => (title(), prop::collection::vec(leaf(), 0..4))
            .prop_map(|(title, children)| Shape::Collapsible(title, children)),
        1 => prop::collection::vec(leaf(), 0..4)
            .prop_map(|children| Shape::Input(InputStatus::Unattempted, children)),
    ]
}

fn tree() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(area_shape(), 0..8)
}

fn build(shapes: &[Shape]) -> Vec<Area> {
    shapes
        .iter()
        .fold(TreeBuilder::new(), |builder, shape| builder.shape(shape))
        .areas()
}

/// Adjacent leaves of the default kind are indistinguishable once serialized, and an empty
/// one leaves no trace at all
fn merge_defaults(leaves: Vec<(LeafKind, String)>, default: LeafKind) -> Vec<(LeafKind, String)> {
    let mut merged: Vec<(LeafKind, String)> = Vec::new();
    for (kind, content) in leaves {
        if kind == default {
            if content.is_empty() {
                continue;
            }
            if let Some((last_kind, last)) = merged.last_mut() {
                if *last_kind == default {
                    last.push_str(&content);
                    continue;
                }
            }
        }
        merged.push((kind, content));
    }
    merged
}

fn expected_shape(shapes: &[Shape], dialect: Dialect) -> Vec<Shape> {
    let default = match dialect {
        Dialect::Lean => return shapes.to_vec(),
        Dialect::CoqMD => LeafKind::Text,
        Dialect::Coq | Dialect::PureLean => LeafKind::Code,
    };
    let mut out = Vec::new();
    let mut pending: Vec<(LeafKind, String)> = Vec::new();
    let flush = |pending: &mut Vec<(LeafKind, String)>, out: &mut Vec<Shape>| {
        for (kind, content) in merge_defaults(std::mem::take(pending), default) {
            out.push(Shape::Leaf(kind, content));
        }
    };
    for shape in shapes {
        match shape {
            Shape::Leaf(kind, content) => pending.push((*kind, content.clone())),
            Shape::Collapsible(title, children) => {
                flush(&mut pending, &mut out);
                out.push(Shape::Collapsible(
                    title.clone(),
                    merge_defaults(children.clone(), default),
                ));
            }
            Shape::Input(status, children) => {
                flush(&mut pending, &mut out);
                out.push(Shape::Input(*status, merge_defaults(children.clone(), default)));
            }
        }
    }
    flush(&mut pending, &mut out);
    out
}

fn round_trip(shapes: &[Shape], dialect: Dialect) -> (String, Vec<Area>) {
    let source = serialize_areas(&build(shapes), &dialect.output_config());
    let parsed = dialect.parse(&source, &mut IdCounter::new());
    (source, parsed)
}

proptest! {
    #[test]
    fn test_coq_round_trip(shapes in tree()) {
        let (source, parsed) = round_trip(&shapes, Dialect::Coq);
        prop_assert_eq!(shape(&parsed), expected_shape(&shapes, Dialect::Coq), "source: {:?}", source);
    }

    #[test]
    fn test_coqmd_round_trip(shapes in tree()) {
        let (source, parsed) = round_trip(&shapes, Dialect::CoqMD);
        prop_assert_eq!(shape(&parsed), expected_shape(&shapes, Dialect::CoqMD), "source: {:?}", source);
    }

    #[test]
    fn test_lean_round_trip(shapes in tree()) {
        let (source, parsed) = round_trip(&shapes, Dialect::Lean);
        prop_assert_eq!(shape(&parsed), expected_shape(&shapes, Dialect::Lean), "source: {:?}", source);
    }

    #[test]
    fn test_pure_lean_round_trip(shapes in tree()) {
        let (source, parsed) = round_trip(&shapes, Dialect::PureLean);
        prop_assert_eq!(shape(&parsed), expected_shape(&shapes, Dialect::PureLean), "source: {:?}", source);
    }

    #[test]
    fn test_reserialization_is_stable(shapes in tree()) {
        for dialect in Dialect::ALL {
            let config = dialect.output_config();
            let (source, parsed) = round_trip(&shapes, dialect);
            prop_assert_eq!(serialize_areas(&parsed, &config), source);
        }
    }

    #[test]
    fn test_bounds_are_idempotent_and_consistent(shapes in tree()) {
        for dialect in Dialect::ALL {
            let mut doc = shapes
                .iter()
                .fold(TreeBuilder::new(), |builder, shape| builder.shape(shape))
                .document("file:///prop", dialect.output_config());
            doc.update_bounds().expect("bounds");
            assert_ranges_match(&doc);
            let first: Vec<_> = doc.iter_all().map(|area| area.range().cloned()).collect();
            doc.update_bounds().expect("bounds");
            let second: Vec<_> = doc.iter_all().map(|area| area.range().cloned()).collect();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn test_offset_position_inverse(shapes in tree()) {
        let doc = shapes
            .iter()
            .fold(TreeBuilder::new(), |builder, shape| builder.shape(shape))
            .mapped_document("file:///prop", Dialect::CoqMD.output_config());
        for area in doc.iter_all().filter(|area| !area.area_type().is_container()) {
            let content = area.content();
            let offsets = content
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(content.len()));
            for offset in offsets {
                let pos: Position = area.position_of(offset).expect("offset inside content");
                prop_assert_eq!(area.offset_of(pos), Some(offset));
            }
        }
    }
}
