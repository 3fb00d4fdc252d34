//! Tests for successful parses.

use std::collections::BTreeSet;

use peggy_ast::{
    Boundary, ClassPart, Comment, ExportName, Expression, ImportClause, LineCol, NodeKind,
    Visitor,
};
use rstest::rstest;

use super::support::{first_expression, kind_of, parse_ok};

const EVERY_KIND: &str = r#"// Line comment at the top
import * as lib from "./lib.js";
import def, {one, "two" as two2} from './other.js';
{{
  const NUMS = [3, 5];
}}
{
  let currentNumber = 1;
}
/* Block comment */
top "top rule" = @first:start rest:$("x" / [a-z0-9]i)* { return first; };
start = &{ return true; } !{ return false; } &"a" !"b" . item|1..3, ","| end|2| more|..n| last|{ return 1; }..|
item = (lib.thing / "c"i)? "d"+ "e"* $[^\]]
end = 'e'
more = "m"
last = "l"
"#;

#[rstest]
#[case::literal(r#"start = "a""#, NodeKind::Literal)]
#[case::single_quoted_literal("start = 'a'i", NodeKind::Literal)]
#[case::class("start = [a-z]", NodeKind::Class)]
#[case::any("start = .", NodeKind::Any)]
#[case::rule_ref("start = other", NodeKind::RuleRef)]
#[case::library_ref("start = lib.other", NodeKind::LibraryRef)]
#[case::choice(r#"start = "a" / "b""#, NodeKind::Choice)]
#[case::sequence(r#"start = "a" "b""#, NodeKind::Sequence)]
#[case::action(r#"start = "a" { return 1; }"#, NodeKind::Action)]
#[case::labeled(r#"start = x:"a""#, NodeKind::Labeled)]
#[case::plucked(r#"start = @"a""#, NodeKind::Labeled)]
#[case::text(r#"start = $"a""#, NodeKind::Text)]
#[case::simple_and(r#"start = &"a""#, NodeKind::SimpleAnd)]
#[case::simple_not(r#"start = !"a""#, NodeKind::SimpleNot)]
#[case::optional(r#"start = "a"?"#, NodeKind::Optional)]
#[case::zero_or_more(r#"start = "a"*"#, NodeKind::ZeroOrMore)]
#[case::one_or_more(r#"start = "a"+"#, NodeKind::OneOrMore)]
#[case::repeated(r#"start = "a"|2|"#, NodeKind::Repeated)]
#[case::group(r#"start = ("a")"#, NodeKind::Group)]
#[case::semantic_and("start = &{ return true; }", NodeKind::SemanticAnd)]
#[case::semantic_not("start = !{ return true; }", NodeKind::SemanticNot)]
#[case::named(r#"start "Start" = "a""#, NodeKind::Named)]
fn expressions_parse_to_their_kind(#[case] text: &str, #[case] expected: NodeKind) {
    let parsed = parse_ok(text);
    assert_eq!(kind_of(first_expression(&parsed)), expected);
}

#[test]
fn every_grammar_kind_is_produced() {
    let parsed = parse_ok(EVERY_KIND);
    let mut kinds = BTreeSet::new();
    Visitor::<()>::new()
        .on_enter_any(|node, _| {
            kinds.insert(node.kind());
            Ok(None)
        })
        .visit(&parsed.grammar)
        .expect("infallible visit");

    let expected: BTreeSet<NodeKind> = NodeKind::all()
        .filter(|kind| !matches!(kind, NodeKind::Program | NodeKind::Block | NodeKind::Line))
        .collect();
    assert_eq!(kinds, expected);
    assert_eq!(parsed.comments.len(), 2);
}

#[test]
fn child_spans_nest_within_their_parents() {
    let parsed = parse_ok(EVERY_KIND);
    let mut checked = 0_usize;
    Visitor::<()>::new()
        .on_enter_any(|node, context| {
            if let Some(parent) = context.parent() {
                assert!(
                    parent.span().contains(node.span()),
                    "{} {:?} escapes {} {:?}",
                    node.kind(),
                    node.span().range(),
                    parent.kind(),
                    parent.span().range(),
                );
                checked += 1;
            }
            Ok(None)
        })
        .visit(&parsed.grammar)
        .expect("infallible visit");
    assert!(checked > 100);
}

#[test]
fn spans_carry_line_and_column() {
    let parsed = parse_ok("a = 'x'\nstart = \"a\"");
    let rule = parsed.grammar.rule("start").expect("start rule");
    let span = rule.expression.span();
    assert_eq!(span.range(), 16..19);
    assert_eq!(*span.start(), LineCol::new(2, 9));
    assert_eq!(*span.end(), LineCol::new(2, 12));
    assert_eq!(parsed.grammar.span.range(), 0..19);
}

#[test]
fn imports_record_every_clause_form() {
    let parsed = parse_ok(EVERY_KIND);
    let imports = &parsed.grammar.imports;
    assert_eq!(imports.len(), 2);

    let namespace = imports.first().expect("namespace import");
    assert_eq!(namespace.from.value, "./lib.js");
    assert!(matches!(
        namespace.what.as_slice(),
        [ImportClause::All(clause)] if clause.binding.id.value == "lib"
    ));

    let mixed = imports.get(1).expect("mixed import");
    assert_eq!(mixed.from.value, "./other.js");
    assert_eq!(mixed.from.raw, "'./other.js'");
    let bindings: Vec<&str> = mixed
        .what
        .iter()
        .map(|clause| clause.binding().id.value.as_str())
        .collect();
    assert_eq!(bindings, ["def", "one", "two2"]);
    assert!(matches!(mixed.what.first(), Some(ImportClause::Default(_))));
    assert!(matches!(mixed.what.get(1), Some(ImportClause::Named(_))));
    assert!(matches!(
        mixed.what.get(2),
        Some(ImportClause::Rename(rename))
            if matches!(&rename.rename, ExportName::Quoted(name) if name.value == "two")
    ));
}

#[test]
fn bare_imports_have_no_clauses() {
    let parsed = parse_ok("import './side-effect.js';\nstart = 'a'");
    let import = parsed.grammar.imports.first().expect("one import");
    assert!(import.what.is_empty());
    assert_eq!(import.from.value, "./side-effect.js");
}

#[rstest]
#[case::namespace_import("lib", Some(1))]
#[case::named_import_is_not_a_library("one", None)]
#[case::unknown("missing", None)]
fn library_references_are_numbered_by_import(
    #[case] library: &str,
    #[case] expected: Option<usize>,
) {
    let text = format!(
        "import {{one}} from './a.js';\nimport * as lib from './b.js';\nstart = {library}.rule"
    );
    let parsed = parse_ok(&text);
    match first_expression(&parsed) {
        Expression::LibraryRef(reference) => {
            assert_eq!(reference.library.value, library);
            assert_eq!(reference.name.value, "rule");
            assert_eq!(reference.library_number, expected);
        }
        other => panic!("expected a library reference, got {other:?}"),
    }
}

#[test]
fn initializers_are_told_apart_by_brace_count() {
    let parsed = parse_ok("{{ const a = 1; }};\n{ let b = 2; }\nstart = 'a'");
    let top = parsed
        .grammar
        .top_level_initializer
        .as_ref()
        .expect("top-level initializer");
    assert_eq!(top.code.value, " const a = 1; ");
    assert!(top.semi.is_some());
    let per_parse = parsed.grammar.initializer.as_ref().expect("initializer");
    assert_eq!(per_parse.code.value, " let b = 2; ");
    assert!(per_parse.semi.is_none());
}

#[test]
fn code_blocks_keep_nested_braces() {
    let parsed = parse_ok("start = 'a' { if (x) { return { y: 1 }; } }");
    match first_expression(&parsed) {
        Expression::Action(action) => {
            assert_eq!(action.code.value, " if (x) { return { y: 1 }; } ");
        }
        other => panic!("expected an action, got {other:?}"),
    }
}

#[test]
fn comments_are_collected_in_source_order() {
    let parsed = parse_ok("// head\nstart = \"a\" /* mid */ \"b\" // tail");
    let texts: Vec<(&str, &str)> = parsed
        .comments
        .iter()
        .map(|comment| match comment {
            Comment::Block(text) => ("block", text.value.as_str()),
            Comment::Line(text) => ("line", text.value.as_str()),
        })
        .collect();
    assert_eq!(texts, [("line", " head"), ("block", " mid "), ("line", " tail")]);
    let head = parsed.comments.first().expect("head comment");
    assert_eq!(head.span().range(), 0..7);
}

#[rstest]
#[case::simple_escapes(r#"start = "a\n\t\\""#, "a\n\t\\")]
#[case::hex_and_unicode(r#"start = "\x41B\u{43}""#, "ABC")]
#[case::quotes(r#"start = 'it\'s'"#, "it's")]
#[case::nul(r#"start = "\0""#, "\0")]
#[case::identity_escape(r#"start = "\q""#, "q")]
#[case::line_continuation("start = \"a\\\nb\"", "ab")]
fn literal_escapes_are_decoded(#[case] text: &str, #[case] expected: &str) {
    let parsed = parse_ok(text);
    match first_expression(&parsed) {
        Expression::Literal(literal) => assert_eq!(literal.value, expected),
        other => panic!("expected a literal, got {other:?}"),
    }
}

#[test]
fn classes_record_parts_and_flags() {
    let parsed = parse_ok(r"start = [^a-z_\]]i");
    match first_expression(&parsed) {
        Expression::Class(class) => {
            assert!(class.inverted);
            assert!(class.ignore_case);
            assert_eq!(
                class.parts,
                [
                    ClassPart::Range('a', 'z'),
                    ClassPart::Char('_'),
                    ClassPart::Char(']'),
                ]
            );
        }
        other => panic!("expected a class, got {other:?}"),
    }
}

#[test]
fn trailing_dash_in_a_class_is_a_character() {
    let parsed = parse_ok("start = [a-]");
    match first_expression(&parsed) {
        Expression::Class(class) => {
            assert_eq!(class.parts, [ClassPart::Char('a'), ClassPart::Char('-')]);
        }
        other => panic!("expected a class, got {other:?}"),
    }
}

fn describe(boundary: Option<&Boundary>) -> String {
    match boundary {
        None => "-".to_owned(),
        Some(Boundary::Constant(constant)) => constant.value.to_string(),
        Some(Boundary::Variable(variable)) => variable.value.clone(),
        Some(Boundary::Function(function)) => format!("{{{}}}", function.code.value),
    }
}

#[rstest]
#[case::exact("|2|", "2", false, "-", false)]
#[case::open_max("|1..|", "1", true, "-", false)]
#[case::open_min("|..3|", "-", true, "3", false)]
#[case::unbounded("|..|", "-", true, "-", false)]
#[case::variable_with_delimiter(r#"|1..n, ","|"#, "1", true, "n", true)]
#[case::function("|{return 2;}|", "{return 2;}", false, "-", false)]
#[case::spaced("| 2 .. 4 , ',' |", "2", true, "4", true)]
fn repetition_boundaries_are_recorded(
    #[case] suffix: &str,
    #[case] min: &str,
    #[case] has_dots: bool,
    #[case] max: &str,
    #[case] has_delimiter: bool,
) {
    let parsed = parse_ok(&format!("start = 'a'{suffix}"));
    match first_expression(&parsed) {
        Expression::Repeated(repeated) => {
            let boundaries = &repeated.boundaries;
            assert_eq!(describe(boundaries.min.as_ref()), min);
            assert_eq!(boundaries.dots.is_some(), has_dots);
            assert_eq!(describe(boundaries.max.as_ref()), max);
            assert_eq!(repeated.delimiter.is_some(), has_delimiter);
            assert_eq!(boundaries.is_exact(), !has_dots);
        }
        other => panic!("expected a repetition, got {other:?}"),
    }
}

#[test]
fn labels_and_plucks_are_distinguished() {
    let parsed = parse_ok(r#"start = @head:"a" tail:"b" @"c""#);
    let Expression::Sequence(sequence) = first_expression(&parsed) else {
        panic!("expected a sequence");
    };
    let labels: Vec<(Option<&str>, bool)> = sequence
        .elements
        .iter()
        .map(|element| match element {
            Expression::Labeled(labeled) => (
                labeled.name.as_ref().map(|name| name.value.as_str()),
                labeled.pick,
            ),
            other => panic!("expected a labeled element, got {other:?}"),
        })
        .collect();
    assert_eq!(
        labels,
        [(Some("head"), true), (Some("tail"), false), (None, true)]
    );
}

#[test]
fn display_names_wrap_the_rule_expression() {
    let parsed = parse_ok("start \"Start rule\" = 'a'");
    match first_expression(&parsed) {
        Expression::Named(named) => {
            assert_eq!(named.name.value, "Start rule");
            assert_eq!(kind_of(&named.expression), NodeKind::Literal);
        }
        other => panic!("expected a named expression, got {other:?}"),
    }
}

#[test]
fn rule_references_stop_before_the_next_rule() {
    let parsed = parse_ok("a = b\nb \"B\" = 'x';\nc = a;");
    let names: Vec<&str> = parsed
        .grammar
        .rules
        .iter()
        .map(|rule| rule.name.value.as_str())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
    let semis: Vec<bool> = parsed
        .grammar
        .rules
        .iter()
        .map(|rule| rule.semi.is_some())
        .collect();
    assert_eq!(semis, [false, true, true]);
}

#[test]
fn reserved_words_are_allowed_as_labels_by_default() {
    let parsed = parse_ok("start = class:'a'");
    assert_eq!(kind_of(first_expression(&parsed)), NodeKind::Labeled);
}
