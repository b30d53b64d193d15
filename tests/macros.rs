#![allow(dead_code)]

use moss::ast::{Declaration, Expr, RuleSet, Stmt, StyleSheet};

pub fn parse(input: &str) -> StyleSheet {
    moss::parse_stylesheet(input.to_owned(), "input.scss", &moss::Options::default())
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
}

/// The first line of the error report for `input`, without trailing context.
pub fn parse_err(input: &str) -> String {
    match moss::parse_stylesheet(input.to_owned(), "input.scss", &moss::Options::default()) {
        Ok(..) => panic!("expected {:?} to fail", input),
        Err(e) => e
            .to_string()
            .chars()
            .take_while(|c| *c != '\n')
            .collect::<String>(),
    }
}

/// Parse a stylesheet whose single statement is a ruleset.
pub fn ruleset(input: &str) -> RuleSet {
    let mut sheet = parse(input);
    assert_eq!(sheet.body.len(), 1, "expected one statement in {:?}", input);
    match sheet.body.remove(0) {
        Stmt::RuleSet(ruleset) => ruleset,
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

/// Parse `a {{ color: <value>; }}` and return the declaration's value.
pub fn value_of(value: &str) -> Expr {
    let mut rule = ruleset(&format!("a {{ color: {}; }}", value));
    assert_eq!(rule.body.len(), 1);
    match rule.body.remove(0) {
        Stmt::Declaration(Declaration {
            value: Some(value), ..
        }) => value.node,
        stmt => panic!("expected a declaration with a value, got {:?}", stmt),
    }
}

/// The declarations of the single ruleset in `input`.
pub fn declarations(input: &str) -> Vec<Declaration> {
    ruleset(input)
        .body
        .into_iter()
        .filter_map(|stmt| match stmt {
            Stmt::Declaration(decl) => Some(decl),
            _ => None,
        })
        .collect()
}

#[macro_export]
macro_rules! assert_err {
    ($err:literal, $input:expr) => {
        assert_eq!($err, crate::macros::parse_err($input));
    };
}
