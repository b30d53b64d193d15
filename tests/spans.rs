#[macro_use]
mod macros;

use macros::{parse, ruleset};
use moss::ast::{Selector, Stmt};
use moss::codemap::Span;

fn assert_contains(outer: Span, inner: Span) {
    assert!(
        outer.low() <= inner.low() && inner.high() <= outer.high(),
        "expected {:?} to contain {:?}",
        outer,
        inner
    );
}

#[test]
fn declaration_spans_nest_in_ruleset_span() {
    let rule = ruleset("a { color: red; background: blue; }");

    for stmt in &rule.body {
        match stmt {
            Stmt::Declaration(decl) => {
                assert!(decl.span.low() <= decl.span.high());
                assert_contains(rule.span, decl.span);
                if let Some(value) = &decl.value {
                    assert_contains(decl.span, value.span);
                }
            }
            stmt => panic!("expected a declaration, got {:?}", stmt),
        }
    }
}

#[test]
fn selector_span_nests_in_ruleset_span() {
    let rule = ruleset("a.b > c { color: red; }");
    match &rule.selector {
        Selector::List(list) => assert_contains(rule.span, list.span),
        Selector::Schema(schema) => panic!("expected a static selector, got {:?}", schema),
    }
}

#[test]
fn nested_ruleset_spans_nest() {
    let rule = ruleset("a { b { c { color: red; } } }");
    match &rule.body[0] {
        Stmt::RuleSet(inner) => {
            assert_contains(rule.span, inner.span);
            match &inner.body[0] {
                Stmt::RuleSet(innermost) => assert_contains(inner.span, innermost.span),
                stmt => panic!("expected a ruleset, got {:?}", stmt),
            }
        }
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn variable_decl_span_covers_value() {
    let mut sheet = parse("$very-long-name: 1 + 2;");
    match sheet.body.remove(0) {
        Stmt::VariableDecl(decl) => {
            assert!(decl.span.len() >= "$very-long-name: 1 + 2".len() as u64);
        }
        stmt => panic!("expected a variable declaration, got {:?}", stmt),
    }
}

#[test]
fn statement_spans_are_ordered_like_the_source() {
    let sheet = parse("a { x: y; }\nb { x: y; }\nc { x: y; }");

    let spans: Vec<Span> = sheet
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::RuleSet(rule) => rule.span,
            stmt => panic!("expected a ruleset, got {:?}", stmt),
        })
        .collect();

    for pair in spans.windows(2) {
        assert!(pair[0].low() < pair[1].low());
    }
}

#[test]
fn schema_selector_span_covers_interpolation() {
    let rule = ruleset(".#{$n}-suffix { color: red; }");
    match &rule.selector {
        Selector::Schema(schema) => {
            assert!(schema.span.len() > 0);
            assert_contains(rule.span, schema.span);
        }
        Selector::List(list) => panic!("expected a schema, got {:?}", list),
    }
}
