//! Tests for the node-kind registry.

use rstest::rstest;
use strum::EnumCount;

use super::fixture;
use crate::{Any, NodeKind, NodeRef, SCHEMA, Span};

#[test]
fn registry_covers_every_kind() {
    assert_eq!(NodeKind::COUNT, 44);
    assert_eq!(SCHEMA.len(), NodeKind::COUNT);
    assert_eq!(SCHEMA.entries().count(), NodeKind::COUNT);
    assert!(!SCHEMA.is_empty());
}

#[test]
fn tags_round_trip_through_their_string_form() {
    for kind in NodeKind::all() {
        let parsed: NodeKind = kind
            .as_str()
            .parse()
            .unwrap_or_else(|err| panic!("tag {kind} should parse: {err}"));
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn indices_are_dense_and_ordered() {
    let indices: Vec<usize> = NodeKind::all().map(NodeKind::index).collect();
    let expected: Vec<usize> = (0..NodeKind::COUNT).collect();
    assert_eq!(indices, expected);
}

#[rstest]
#[case::program("Program", NodeKind::Program)]
#[case::grammar("grammar", NodeKind::Grammar)]
#[case::zero_or_more("zero_or_more", NodeKind::ZeroOrMore)]
#[case::import_binding_all("import_binding_all", NodeKind::ImportBindingAll)]
#[case::punctuation("punc", NodeKind::Punc)]
#[case::block_comment("Block", NodeKind::Block)]
#[case::line_comment("Line", NodeKind::Line)]
fn tags_match_serialized_names(#[case] tag: &str, #[case] kind: NodeKind) {
    assert_eq!(kind.as_str(), tag);
    assert_eq!(tag.parse::<NodeKind>().ok(), Some(kind));
}

#[rstest]
#[case::wrong_case("program")]
#[case::camel_case("zeroOrMore")]
#[case::unknown("bogus")]
fn unknown_tags_are_rejected(#[case] tag: &str) {
    assert!(tag.parse::<NodeKind>().is_err());
    assert_eq!(SCHEMA.slots_for_tag(tag), None);
}

#[rstest]
#[case::constant(NodeKind::Constant)]
#[case::variable(NodeKind::Variable)]
#[case::class(NodeKind::Class)]
#[case::any(NodeKind::Any)]
#[case::name(NodeKind::Name)]
#[case::punc(NodeKind::Punc)]
#[case::block(NodeKind::Block)]
#[case::line(NodeKind::Line)]
fn leaf_kinds_declare_no_slots(#[case] kind: NodeKind) {
    assert!(kind.is_leaf());
    assert!(SCHEMA.slots(kind).is_empty());
}

#[rstest]
#[case::program(NodeKind::Program, &["body", "comments"])]
#[case::grammar(
    NodeKind::Grammar,
    &["imports", "topLevelInitializer", "initializer", "rules"]
)]
#[case::repeated(
    NodeKind::Repeated,
    &["expression", "pipe1", "boundaries", "delimiter", "pipe2"]
)]
#[case::labeled(NodeKind::Labeled, &["at", "name", "colon", "expression"])]
#[case::library_ref(NodeKind::LibraryRef, &["name", "library"])]
#[case::suffix(NodeKind::OneOrMore, &["expression", "operator"])]
#[case::prefix(NodeKind::SimpleNot, &["operator", "expression"])]
#[case::code(NodeKind::Code, &["open", "close"])]
fn composite_kinds_declare_ordered_slots(
    #[case] kind: NodeKind,
    #[case] expected: &[&str],
) {
    assert_eq!(kind.slots(), expected);
    assert_eq!(SCHEMA.slots_for_tag(kind.as_str()), Some(kind.slots()));
}

#[test]
fn schema_json_maps_tags_to_slot_arrays() {
    let json = SCHEMA.to_json();
    let object = json.as_object().expect("schema renders as an object");
    assert_eq!(object.len(), NodeKind::COUNT);
    assert_eq!(
        json.get("rule"),
        Some(&serde_json::json!(["name", "equals", "expression", "semi"]))
    );
    assert_eq!(json.get("any"), Some(&serde_json::json!([])));
}

#[test]
fn every_declared_slot_resolves_on_fixture_nodes() {
    let program = fixture::every_kind();
    let mut pending = vec![NodeRef::Program(&program)];
    let mut seen = 0_usize;
    while let Some(node) = pending.pop() {
        seen += 1;
        for (_, slot) in node.children() {
            pending.extend(slot.nodes().iter().copied());
        }
    }
    assert!(seen > NodeKind::COUNT);
}

#[test]
#[should_panic(expected = "node kind `any` has no slot `expression`")]
fn undeclared_slot_lookup_panics() {
    let dot = Any {
        span: Span::default(),
    };
    drop(NodeRef::Any(&dot).slot("expression"));
}

#[test]
fn wide_kinds_list_their_slots_in_order() {
    let table = SCHEMA
        .entries()
        .filter(|(_, slots)| slots.len() >= 4)
        .map(|(kind, slots)| format!("{kind}: {}", slots.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(table, @r"
    grammar: imports, topLevelInitializer, initializer, rules
    top_level_initializer: open, code, close, semi
    rule: name, equals, expression, semi
    repeated: expression, pipe1, boundaries, delimiter, pipe2
    labeled: at, name, colon, expression
    ");
}
