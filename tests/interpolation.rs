#[macro_use]
mod macros;

use macros::{declarations, value_of};
use moss::ast::{Expr, InterpolationPart};
use moss::value::QuoteKind;

#[test]
fn interpolation_in_quoted_string() {
    match value_of("\"x#{1 + 2}y\"") {
        Expr::String(s, ..) => {
            assert_eq!(s.1, QuoteKind::Quoted);
            let parts = &s.0.parts;
            assert_eq!(parts.len(), 3);
            assert!(matches!(&parts[0], InterpolationPart::Text(text) if text == "x"));
            assert!(matches!(&parts[1], InterpolationPart::Expr(..)));
            assert!(matches!(&parts[2], InterpolationPart::Text(text) if text == "y"));
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn interpolated_identifier_value_is_one_schema() {
    match value_of("pre#{$x}post") {
        Expr::String(s, ..) => {
            assert_eq!(s.1, QuoteKind::None);
            let parts = &s.0.parts;
            assert_eq!(parts.len(), 3);
            assert!(matches!(&parts[0], InterpolationPart::Text(text) if text == "pre"));
            assert!(matches!(&parts[1], InterpolationPart::Expr(..)));
            assert!(matches!(&parts[2], InterpolationPart::Text(text) if text == "post"));
        }
        v => panic!("expected a string schema, got {:?}", v),
    }
}

#[test]
fn interpolation_only_value() {
    match value_of("#{$x}") {
        Expr::String(s, ..) => {
            assert!(s.0.has_interpolants());
        }
        v => panic!("expected a string schema, got {:?}", v),
    }
}

#[test]
fn interpolation_interior_is_a_full_expression() {
    match value_of("\"#{1 + 2 * 3}\"") {
        Expr::String(s, ..) => match &s.0.parts[0] {
            InterpolationPart::Expr(e) => {
                assert!(matches!(&e.node, Expr::BinaryOp(..)));
            }
            part => panic!("expected an expression part, got {:?}", part),
        },
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn nested_interpolation() {
    match value_of("\"#{\"inner #{$x}\"}\"") {
        Expr::String(s, ..) => {
            assert!(s.0.has_interpolants());
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn empty_interpolation_is_an_error() {
    assert_err!("Error: Expected expression.", "a { b: \"#{}\"; }");
    assert_err!("Error: Expected expression.", "a { b: \"#{ }\"; }");
}

#[test]
fn unterminated_interpolation_is_an_error() {
    assert_err!("Error: expected \"}\".", "a { b: \"#{1\"; }");
}

#[test]
fn custom_property_value_is_raw() {
    let decls = declarations("a { --x: some !arbitrary? ##text; }");
    assert!(decls[0].is_custom_property());
    match decls[0].value.as_ref().map(|v| &v.node) {
        Some(Expr::String(s, ..)) => {
            // The whitespace after the colon belongs to the value.
            assert_eq!(s.0.as_plain(), Some(" some !arbitrary? ##text"));
        }
        v => panic!("expected a raw string value, got {:?}", v),
    }
}

#[test]
fn custom_property_value_tracks_brackets() {
    // The semicolon inside the brackets does not terminate the value.
    let decls = declarations("a { --x: fn(1;2) [a;b]; }");
    match decls[0].value.as_ref().map(|v| &v.node) {
        Some(Expr::String(s, ..)) => {
            assert_eq!(s.0.as_plain(), Some(" fn(1;2) [a;b]"));
        }
        v => panic!("expected a raw string value, got {:?}", v),
    }
}

#[test]
fn custom_property_with_interpolation() {
    let decls = declarations("a { --x: calc(#{$y} + 1px); }");
    match decls[0].value.as_ref().map(|v| &v.node) {
        Some(Expr::String(s, ..)) => {
            assert!(s.0.has_interpolants());
            assert!(s.0.initial_plain().trim_start().starts_with("calc("));
        }
        v => panic!("expected a raw string value, got {:?}", v),
    }
}

#[test]
fn empty_custom_property_is_an_error() {
    assert_err!("Error: Expected token.", "a { --x: ; }");
}

#[test]
fn custom_property_detection() {
    let decls = declarations("a { --custom: 1; regular: 2; }");
    assert!(decls[0].is_custom_property());
    assert!(!decls[1].is_custom_property());
}

#[test]
fn interpolated_url() {
    match value_of("url(http://example.com/#{$path})") {
        Expr::String(s, ..) => {
            assert!(s.0.has_interpolants());
            assert!(s.0.initial_plain().starts_with("url("));
        }
        v => panic!("expected a url schema, got {:?}", v),
    }
}

#[test]
fn interpolation_in_loud_comment() {
    let sheet = macros::parse("/* version #{$v} */");
    match &sheet.body[0] {
        moss::ast::Stmt::LoudComment(comment) => {
            assert!(comment.text.has_interpolants());
        }
        stmt => panic!("expected a loud comment, got {:?}", stmt),
    }
}

#[test]
fn interpolated_property_name() {
    let decls = declarations("a { border-#{$side}: 1px; }");
    assert!(decls[0].name.has_interpolants());
    assert_eq!(decls[0].name.initial_plain(), "border-");
}
