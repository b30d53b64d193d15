#[macro_use]
mod macros;

use macros::parse;
use moss::ast::{CssMediaQuery, Expr, MediaQueryExpression, Stmt, SupportsCondition};

#[test]
fn media_type_query() {
    let mut sheet = parse("@media screen { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Media(media) => {
            assert_eq!(media.queries.len(), 1);
            let query = &media.queries[0];
            assert!(query.modifier.is_none());
            assert_eq!(
                query.media_type.as_ref().and_then(|t| t.as_plain()),
                Some("screen")
            );
            assert!(query.features.is_empty());
            assert_eq!(media.body.len(), 1);
        }
        stmt => panic!("expected a @media, got {:?}", stmt),
    }
}

#[test]
fn media_feature_query() {
    let mut sheet = parse("@media (min-width: 600px) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Media(media) => {
            let query = &media.queries[0];
            assert!(query.media_type.is_none());
            assert_eq!(query.features.len(), 1);
            match &query.features[0] {
                MediaQueryExpression::Feature { name, value, .. } => {
                    match &name.node {
                        Expr::String(s, ..) => assert_eq!(s.0.as_plain(), Some("min-width")),
                        v => panic!("expected a feature name, got {:?}", v),
                    }
                    assert!(matches!(
                        value.as_ref().map(|v| &v.node),
                        Some(Expr::Number { .. })
                    ));
                }
                feature => panic!("expected a feature expression, got {:?}", feature),
            }
        }
        stmt => panic!("expected a @media, got {:?}", stmt),
    }
}

#[test]
fn media_modifier_and_conjunction() {
    let mut sheet = parse("@media only screen and (color) and (grid) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Media(media) => {
            let query = &media.queries[0];
            assert_eq!(
                query.modifier.as_ref().and_then(|m| m.as_plain()),
                Some("only")
            );
            assert_eq!(
                query.media_type.as_ref().and_then(|t| t.as_plain()),
                Some("screen")
            );
            assert_eq!(query.features.len(), 2);
        }
        stmt => panic!("expected a @media, got {:?}", stmt),
    }
}

#[test]
fn media_query_list() {
    let mut sheet = parse("@media screen, print { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Media(media) => assert_eq!(media.queries.len(), 2),
        stmt => panic!("expected a @media, got {:?}", stmt),
    }
}

#[test]
fn media_query_with_interpolated_feature() {
    let mut sheet = parse("@media #{$query} { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Media(media) => {
            let query = &media.queries[0];
            assert!(query.media_type.as_ref().map_or(false, |t| t.has_interpolants()));
        }
        stmt => panic!("expected a @media, got {:?}", stmt),
    }
}

#[test]
fn css_media_query_parser() {
    let mut map = moss::codemap::CodeMap::new();
    let file = map.add_file("query".to_owned(), "screen and (color)".to_owned());

    let queries = CssMediaQuery::parse_list("screen and (color)", file.span).unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].media_type.as_deref(), Some("screen"));
    assert_eq!(queries[0].conditions, vec!["(color)".to_owned()]);
    assert!(queries[0].conjunction);
    assert_eq!(queries[0].to_string(), "screen and (color)");
}

#[test]
fn css_media_query_negation() {
    let mut map = moss::codemap::CodeMap::new();
    let file = map.add_file("query".to_owned(), "not (color)".to_owned());

    let queries = CssMediaQuery::parse_list("not (color)", file.span).unwrap();
    assert_eq!(queries[0].conditions, vec!["(not (color))".to_owned()]);
    assert!(queries[0].matches_all_types());
}

#[test]
fn supports_declaration() {
    let mut sheet = parse("@supports (display: grid) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Supports(supports) => {
            match &supports.condition {
                SupportsCondition::Declaration { name, .. } => {
                    assert!(matches!(name, Expr::String(..)));
                }
                condition => panic!("expected a declaration condition, got {:?}", condition),
            }
            assert_eq!(supports.body.len(), 1);
        }
        stmt => panic!("expected a @supports, got {:?}", stmt),
    }
}

#[test]
fn supports_negation() {
    let mut sheet = parse("@supports not (display: grid) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Supports(supports) => {
            assert!(matches!(
                supports.condition,
                SupportsCondition::Negation(..)
            ));
        }
        stmt => panic!("expected a @supports, got {:?}", stmt),
    }
}

#[test]
fn supports_operation_chain() {
    let mut sheet = parse("@supports (a: b) and (c: d) and (e: f) { x { y: z } }");
    match sheet.body.remove(0) {
        Stmt::Supports(supports) => match supports.condition {
            SupportsCondition::Operation { operator, left, .. } => {
                assert_eq!(operator, "and");
                assert!(matches!(*left, SupportsCondition::Operation { .. }));
            }
            condition => panic!("expected an operation, got {:?}", condition),
        },
        stmt => panic!("expected a @supports, got {:?}", stmt),
    }
}

#[test]
fn supports_interpolation_condition() {
    let mut sheet = parse("@supports #{$cond} { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Supports(supports) => {
            assert!(matches!(
                supports.condition,
                SupportsCondition::Interpolation(..)
            ));
        }
        stmt => panic!("expected a @supports, got {:?}", stmt),
    }
}

#[test]
fn supports_chains_may_not_mix_operators() {
    assert_err!(
        "Error: Expected \"and\".",
        "@supports (a: b) and (c: d) or (e: f) { x { y: z } }"
    );
}
