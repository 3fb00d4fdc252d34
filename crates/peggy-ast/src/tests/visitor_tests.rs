//! Tests for the traversal engine.

use std::collections::{BTreeSet, HashSet};

use rstest::rstest;
use strum::EnumCount;

use super::fixture;
use crate::{Any, Event, Expression, NodeKind, NodeRef, Program, Span, Visitor};

fn literal_value(node: NodeRef<'_>) -> Option<&str> {
    match node {
        NodeRef::Literal(literal) => Some(&literal.value),
        _ => None,
    }
}

#[test]
fn wildcard_enter_reaches_every_kind() {
    let program = fixture::every_kind();
    let mut kinds = BTreeSet::new();
    Visitor::<()>::new()
        .on_enter_any(|node, _| {
            kinds.insert(node.kind());
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");

    let expected: BTreeSet<NodeKind> = NodeKind::all().collect();
    assert_eq!(kinds, expected);
}

#[test]
fn enter_and_exit_pair_up_with_stack_discipline() {
    let program = fixture::every_kind();
    let events = std::cell::RefCell::new(Vec::new());
    Visitor::<()>::new()
        .on_enter_any(|node, _| {
            events.borrow_mut().push((true, node.id()));
            Ok(None)
        })
        .on_exit_any(|node, _| {
            events.borrow_mut().push((false, node.id()));
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    let mut open = Vec::new();
    let mut entered = 0_usize;
    for (is_enter, id) in events.into_inner() {
        if is_enter {
            entered += 1;
            open.push(id);
        } else {
            assert_eq!(open.pop(), Some(id), "exit must close the innermost node");
        }
    }
    assert!(open.is_empty());
    assert!(entered > NodeKind::COUNT);
}

#[test]
fn kind_callbacks_run_while_their_node_is_open() {
    let program = fixture::every_kind();
    let open = std::cell::RefCell::new(Vec::new());
    let checked = std::cell::Cell::new(0_usize);
    let assert_innermost = |node: NodeRef<'_>| {
        assert_eq!(open.borrow().last(), Some(&node.id()), "{}", node.kind());
        checked.set(checked.get() + 1);
    };
    Visitor::<()>::new()
        .on_enter_any(|node, _| {
            open.borrow_mut().push(node.id());
            Ok(None)
        })
        .on_enter(NodeKind::Rule, |node, _| {
            assert_innermost(node);
            Ok(None)
        })
        .on_enter(NodeKind::Literal, |node, _| {
            assert_innermost(node);
            Ok(None)
        })
        .on_exit(NodeKind::Rule, |node, _| {
            assert_innermost(node);
            Ok(())
        })
        .on_exit(NodeKind::Literal, |node, _| {
            assert_innermost(node);
            Ok(())
        })
        .on_exit_any(|node, _| {
            assert_eq!(open.borrow_mut().pop(), Some(node.id()));
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    assert!(open.borrow().is_empty());
    // Each rule and literal is checked once on entry and once on exit.
    assert!(checked.get() >= 4);
    assert_eq!(checked.get() % 2, 0);
}

#[test]
fn node_ids_are_unique_within_a_tree() {
    let program = fixture::every_kind();
    let mut ids = HashSet::new();
    let mut visits = 0_usize;
    Visitor::<()>::new()
        .on_enter_any(|node, _| {
            visits += 1;
            ids.insert(node.id());
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");
    assert_eq!(ids.len(), visits);
}

#[test]
fn array_children_are_visited_in_source_order() {
    let program = fixture::single_choice();
    let mut values = Vec::new();
    Visitor::<()>::new()
        .on_enter(NodeKind::Literal, |node, _| {
            values.extend(literal_value(node).map(str::to_owned));
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");
    assert_eq!(values, ["a", "b", "c"]);
}

#[test]
fn wildcard_results_thread_the_ancestor_path() {
    let program = fixture::single_choice();
    let mut paths = Vec::new();
    Visitor::<String>::new()
        .on_enter_any(|node, context| {
            let path = context.parent_result().map_or_else(
                || node.kind().to_string(),
                |parent| format!("{parent}/{}", node.kind()),
            );
            Ok(Some(path))
        })
        .on_exit(NodeKind::Literal, |_, context| {
            paths.extend(context.this_result().cloned());
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    assert_eq!(paths.len(), 3);
    assert!(
        paths
            .iter()
            .all(|path| path == "Program/grammar/rule/choice/literal")
    );
}

#[test]
fn specific_enter_runs_after_wildcard_and_wins() {
    let program = fixture::single_choice();
    let mut rule_saw = Vec::new();
    let mut choice_saw = Vec::new();
    Visitor::<&str>::new()
        .on_enter_any(|_, _| Ok(Some("wildcard")))
        .on_enter(NodeKind::Rule, |_, context| {
            rule_saw.push(context.parent_result().copied());
            Ok(Some("rule"))
        })
        .on_exit(NodeKind::Choice, |_, context| {
            choice_saw.push(context.parent_result().copied());
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    // The rule callback sees the value inherited from `grammar`, not the
    // wildcard's value for the rule itself.
    assert_eq!(rule_saw, [Some("wildcard")]);
    assert_eq!(choice_saw, [Some("rule")]);
}

#[test]
fn specific_enter_returning_none_clears_the_threaded_value() {
    let program = fixture::single_choice();
    let mut seen = Vec::new();
    Visitor::<&str>::new()
        .on_enter_any(|_, _| Ok(Some("wildcard")))
        .on_enter(NodeKind::Choice, |_, _| Ok(None))
        .on_exit(NodeKind::Literal, |_, context| {
            seen.push((context.parent_result().copied(), context.this_result().copied()));
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    assert_eq!(seen, [(None, Some("wildcard")); 3]);
}

#[test]
fn exit_sees_inherited_value_when_no_enter_ran() {
    let program = fixture::single_choice();
    let mut seen = Vec::new();
    Visitor::<u32>::new()
        .on_enter(NodeKind::Rule, |_, _| Ok(Some(7)))
        .on_exit(NodeKind::Name, |_, context| {
            seen.push((context.parent_result().copied(), context.this_result().copied()));
            Ok(())
        })
        .visit(&program)
        .expect("infallible visit");

    assert_eq!(seen, [(Some(7), Some(7))]);
}

#[test]
fn root_context_has_no_slot_or_parent() {
    let program = fixture::single_choice();
    let mut roots = Vec::new();
    Visitor::<()>::new()
        .on_enter(NodeKind::Program, |_, context| {
            roots.push((context.slot(), context.parent().is_none(), context.is_array()));
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");
    assert_eq!(roots, [(None, true, false)]);
}

#[rstest]
#[case::rule_expression(NodeKind::Choice, "expression", false, NodeKind::Rule)]
#[case::choice_alternative(NodeKind::Literal, "alternatives", true, NodeKind::Choice)]
#[case::grammar_rules(NodeKind::Rule, "rules", true, NodeKind::Grammar)]
#[case::program_body(NodeKind::Grammar, "body", false, NodeKind::Program)]
fn contexts_describe_the_holding_slot(
    #[case] kind: NodeKind,
    #[case] slot: &str,
    #[case] is_array: bool,
    #[case] parent: NodeKind,
) {
    let program = fixture::single_choice();
    let mut contexts = Vec::new();
    Visitor::<()>::new()
        .on_enter(kind, |_, context| {
            contexts.push((
                context.slot(),
                context.is_array(),
                context.parent().map(NodeRef::kind),
            ));
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");

    assert!(!contexts.is_empty());
    assert!(
        contexts
            .iter()
            .all(|seen| *seen == (Some(slot), is_array, Some(parent)))
    );
}

#[test]
fn nearest_finds_the_enclosing_rule() {
    let program = fixture::every_kind();
    let mut owners = BTreeSet::new();
    Visitor::<()>::new()
        .on_enter(NodeKind::Any, |_, context| {
            if let Some(NodeRef::Rule(rule)) = context.nearest(NodeKind::Rule) {
                owners.insert(rule.name.value.clone());
            }
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");
    assert_eq!(owners.into_iter().collect::<Vec<_>>(), ["start"]);
}

#[test]
fn leaf_nodes_still_fire_enter_and_exit() {
    let dot = Any {
        span: Span::default(),
    };
    let log = std::cell::RefCell::new(Vec::new());
    Visitor::<()>::new()
        .on_enter(NodeKind::Any, |_, _| {
            log.borrow_mut().push("enter");
            Ok(None)
        })
        .on_exit(NodeKind::Any, |_, _| {
            log.borrow_mut().push("exit");
            Ok(())
        })
        .visit(NodeRef::Any(&dot))
        .expect("infallible visit");
    assert_eq!(log.into_inner(), ["enter", "exit"]);
}

#[test]
fn visit_with_seeds_the_root_parent_result() {
    let program = fixture::single_choice();
    let mut seen = Vec::new();
    Visitor::<&str>::new()
        .on_exit(NodeKind::Program, |_, context| {
            seen.push((context.parent_result().copied(), context.this_result().copied()));
            Ok(())
        })
        .visit_with(&program, Some("seed"))
        .expect("infallible visit");
    assert_eq!(seen, [(Some("seed"), Some("seed"))]);
}

#[test]
fn threaded_values_skip_silent_nodes_and_unwind_on_exit() {
    let program = Program::wrap(
        fixture::grammar(vec![
            fixture::rule("a", fixture::group(fixture::group(fixture::literal("x")))),
            fixture::rule("b", fixture::literal("y")),
        ]),
        Vec::new(),
    );
    let seen = std::cell::RefCell::new(Vec::new());
    Visitor::<String>::new()
        .on_enter(NodeKind::Rule, |node, _| match node {
            NodeRef::Rule(rule) => Ok(Some(rule.name.value.clone())),
            _ => Ok(None),
        })
        .on_enter(NodeKind::Literal, |node, context| {
            seen.borrow_mut().push(format!(
                "{} in {:?}",
                literal_value(node).unwrap_or_default(),
                context.parent_result()
            ));
            Ok(None)
        })
        .on_exit(NodeKind::Rule, |_, context| {
            seen.borrow_mut().push(format!(
                "exit {:?} from {:?}",
                context.this_result(),
                context.parent_result()
            ));
            Ok(())
        })
        .on_exit(NodeKind::Grammar, |_, context| {
            seen.borrow_mut().push(format!("grammar {:?}", context.this_result()));
            Ok(())
        })
        .visit_with(&program, Some("root".to_owned()))
        .expect("infallible visit");

    assert_eq!(
        seen.into_inner(),
        [
            r#"x in Some("a")"#,
            r#"exit Some("a") from Some("root")"#,
            r#"y in Some("b")"#,
            r#"exit Some("b") from Some("root")"#,
            r#"grammar Some("root")"#,
        ]
    );
}

#[test]
fn inherited_values_reach_deep_nodes_without_rescanning_ancestors() {
    const DEPTH: usize = 100_000;
    let mut expression = fixture::literal("core");
    for _ in 0..DEPTH {
        expression = fixture::group(expression);
    }
    let program = Program::wrap(
        fixture::grammar(vec![fixture::rule("deep", expression)]),
        Vec::new(),
    );

    // Only the seed produces a value; every node below it is silent.
    let mut inherited = 0_usize;
    Visitor::<&str>::new()
        .on_exit_any(|_, context| {
            if context.parent_result() == Some(&"seed") {
                inherited += 1;
            }
            Ok(())
        })
        .visit_with(&program, Some("seed"))
        .expect("infallible visit");
    // Program, grammar, rule, the groups and the literal.
    assert_eq!(inherited, DEPTH + 4);
    std::mem::forget(program);
}

#[test]
fn callback_errors_abort_the_walk() {
    let program = fixture::every_kind();
    let entered = std::cell::Cell::new(0_usize);
    let exited = std::cell::Cell::new(0_usize);
    let result = Visitor::<(), String>::new()
        .on_enter_any(|_, _| {
            entered.set(entered.get() + 1);
            Ok(None)
        })
        .on_enter(NodeKind::Rule, |node, _| match node {
            NodeRef::Rule(rule) => Err(format!("stop at {}", rule.name.value)),
            _ => Ok(None),
        })
        .on_exit_any(|_, _| {
            exited.set(exited.get() + 1);
            Ok(())
        })
        .visit(&program);

    assert_eq!(result, Err("stop at start".to_owned()));
    let entered_before_stop = entered.get();
    let exited_before_stop = exited.get();
    assert!(entered_before_stop > 0);
    // Everything in the imports and initializers closed before the first
    // rule; nothing enclosing the rule did.
    assert!(exited_before_stop < entered_before_stop);
}

#[test]
fn deep_trees_do_not_exhaust_the_call_stack() {
    const DEPTH: usize = 100_000;
    let mut expression = fixture::literal("core");
    for _ in 0..DEPTH {
        expression = fixture::group(expression);
    }
    let program = Program::wrap(
        fixture::grammar(vec![fixture::rule("deep", expression)]),
        Vec::new(),
    );

    let mut deepest = 0_usize;
    Visitor::<()>::new()
        .on_enter(NodeKind::Literal, |_, context| {
            deepest = context.ancestors().len();
            Ok(None)
        })
        .visit(&program)
        .expect("infallible visit");
    // Program, grammar and rule sit above the groups.
    assert_eq!(deepest, DEPTH + 3);
    // Drop glue for the nested boxes recurses; leak the tree instead.
    std::mem::forget(program);
}

#[test]
fn events_lists_registered_callbacks() {
    let visitor = Visitor::<()>::new()
        .on_exit_any(|_, _| Ok(()))
        .on_exit(NodeKind::Rule, |_, _| Ok(()))
        .on_enter(NodeKind::Rule, |_, _| Ok(None))
        .on_enter(NodeKind::Program, |_, _| Ok(None));
    assert_eq!(
        visitor.events(),
        [
            Event::ExitAny,
            Event::Enter(NodeKind::Program),
            Event::Enter(NodeKind::Rule),
            Event::Exit(NodeKind::Rule),
        ]
    );
}

#[rstest]
#[case::enter("rule", Event::Enter(NodeKind::Rule))]
#[case::exit("rule:exit", Event::Exit(NodeKind::Rule))]
#[case::program_exit("Program:exit", Event::Exit(NodeKind::Program))]
#[case::wildcard("*", Event::EnterAny)]
#[case::wildcard_exit("*:exit", Event::ExitAny)]
fn event_names_parse_and_print(#[case] name: &str, #[case] expected: Event) {
    let parsed: Event = name
        .parse()
        .unwrap_or_else(|err| panic!("{name} should parse: {err}"));
    assert_eq!(parsed, expected);
    assert_eq!(expected.to_string(), name);
}

#[rstest]
#[case::unknown_kind("rules")]
#[case::unknown_phase("rule:enter")]
#[case::empty("")]
fn malformed_event_names_are_rejected(#[case] name: &str) {
    let error = name.parse::<Event>().expect_err("should be rejected");
    assert_eq!(error.event(), name);
}

#[test]
fn expression_spans_match_node_ref_spans() {
    let program = fixture::every_kind();
    for rule in &program.body.rules {
        let expression: &Expression = &rule.expression;
        assert_eq!(expression.span(), NodeRef::from(expression).span());
    }
}
