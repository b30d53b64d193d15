#[macro_use]
mod macros;

use macros::{parse, ruleset, value_of};
use moss::ast::{Expr, Stmt};
use moss::value::{BinaryOp, Brackets, ColorFormat, ListSeparator, QuoteKind, UnaryOp, Unit};

#[test]
fn named_color_value() {
    match value_of("red") {
        Expr::Color(color) => {
            assert_eq!(color.red(), 255);
            assert_eq!(color.green(), 0);
            assert_eq!(color.blue(), 0);
            assert_eq!(color.alpha(), 1.0);
            assert_eq!(*color.format(), ColorFormat::Literal("red".to_owned()));
        }
        v => panic!("expected a color, got {:?}", v),
    }
}

#[test]
fn three_digit_hex_color() {
    match value_of("#abc") {
        Expr::Color(color) => {
            assert_eq!(
                (color.red(), color.green(), color.blue()),
                (0xAA, 0xBB, 0xCC)
            );
            assert_eq!(color.alpha(), 1.0);
            assert_eq!(*color.format(), ColorFormat::Literal("#abc".to_owned()));
        }
        v => panic!("expected a color, got {:?}", v),
    }
}

#[test]
fn four_digit_hex_color_has_alpha() {
    match value_of("#abcd") {
        Expr::Color(color) => {
            assert_eq!(
                (color.red(), color.green(), color.blue()),
                (0xAA, 0xBB, 0xCC)
            );
            assert_eq!(color.alpha(), f64::from(0xDD) / 255.0);
        }
        v => panic!("expected a color, got {:?}", v),
    }
}

#[test]
fn six_and_eight_digit_hex_colors() {
    match value_of("#a1b2c3") {
        Expr::Color(color) => {
            assert_eq!(
                (color.red(), color.green(), color.blue()),
                (0xA1, 0xB2, 0xC3)
            );
            assert_eq!(color.alpha(), 1.0);
        }
        v => panic!("expected a color, got {:?}", v),
    }

    match value_of("#a1b2c380") {
        Expr::Color(color) => {
            assert_eq!(color.alpha(), f64::from(0x80) / 255.0);
            assert_eq!(
                *color.format(),
                ColorFormat::Literal("#a1b2c380".to_owned())
            );
        }
        v => panic!("expected a color, got {:?}", v),
    }
}

#[test]
fn non_hex_hash_is_a_string() {
    match value_of("#abcx") {
        Expr::String(s, ..) => assert_eq!(s.0.as_plain(), Some("#abcx")),
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn number_units_are_preserved() {
    match value_of("10px") {
        Expr::Number { value, unit, .. } => {
            assert_eq!(value, 10.0);
            assert_eq!(unit, Unit::Px);
        }
        v => panic!("expected a number, got {:?}", v),
    }

    match value_of("50%") {
        Expr::Number { unit, .. } => assert_eq!(unit, Unit::Percent),
        v => panic!("expected a number, got {:?}", v),
    }

    match value_of("3fribbles") {
        Expr::Number { unit, .. } => assert_eq!(unit.to_string(), "fribbles"),
        v => panic!("expected a number, got {:?}", v),
    }
}

#[test]
fn leading_zero_flag_round_trips() {
    match value_of(".5") {
        Expr::Number {
            value,
            leading_zero,
            ..
        } => {
            assert_eq!(value, 0.5);
            assert!(!leading_zero);
        }
        v => panic!("expected a number, got {:?}", v),
    }

    match value_of("0.5") {
        Expr::Number {
            value,
            leading_zero,
            ..
        } => {
            assert_eq!(value, 0.5);
            assert!(leading_zero);
        }
        v => panic!("expected a number, got {:?}", v),
    }
}

#[test]
fn scientific_notation() {
    match value_of("1e3") {
        Expr::Number { value, .. } => assert_eq!(value, 1000.0),
        v => panic!("expected a number, got {:?}", v),
    }
}

#[test]
fn boolean_and_null_literals() {
    assert!(matches!(value_of("true"), Expr::True));
    assert!(matches!(value_of("false"), Expr::False));
    assert!(matches!(value_of("null"), Expr::Null));
}

#[test]
fn operator_precedence() {
    // `1 + 2 * 3` parses as `1 + (2 * 3)`.
    let mut sheet = parse("$x: 1 + 2 * 3;");
    let decl = match sheet.body.remove(0) {
        Stmt::VariableDecl(decl) => decl,
        stmt => panic!("expected a variable declaration, got {:?}", stmt),
    };

    assert_eq!(decl.name.as_str(), "x");
    assert!(!decl.is_guarded);
    assert!(!decl.is_global);

    match decl.value {
        Expr::BinaryOp(outer) => {
            assert_eq!(outer.op, BinaryOp::Plus);
            assert!(matches!(outer.lhs, Expr::Number { value, .. } if value == 1.0));
            match &outer.rhs {
                Expr::BinaryOp(inner) => {
                    assert_eq!(inner.op, BinaryOp::Mul);
                    assert!(matches!(inner.lhs, Expr::Number { value, .. } if value == 2.0));
                    assert!(matches!(inner.rhs, Expr::Number { value, .. } if value == 3.0));
                }
                v => panic!("expected a binary op, got {:?}", v),
            }
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn comparison_and_logic_precedence() {
    // `a == b and c` parses as `(a == b) and c`.
    match value_of("1 == 2 and 3") {
        Expr::BinaryOp(outer) => {
            assert_eq!(outer.op, BinaryOp::And);
            assert!(
                matches!(&outer.lhs, Expr::BinaryOp(inner) if inner.op == BinaryOp::Equal)
            );
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn division_between_literals_is_delayed() {
    match value_of("16px/24px") {
        Expr::BinaryOp(binop) => {
            assert_eq!(binop.op, BinaryOp::Div);
            assert!(binop.is_delayed);
            assert!(matches!(
                binop.lhs,
                Expr::Number {
                    value,
                    unit: Unit::Px,
                    ..
                } if value == 16.0
            ));
            assert!(matches!(
                binop.rhs,
                Expr::Number {
                    value,
                    unit: Unit::Px,
                    ..
                } if value == 24.0
            ));
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn division_in_parens_is_not_delayed() {
    match value_of("(16px/24px)") {
        Expr::Paren(inner) => match &*inner {
            Expr::BinaryOp(binop) => {
                assert_eq!(binop.op, BinaryOp::Div);
                assert!(!binop.is_delayed);
            }
            v => panic!("expected a binary op, got {:?}", v),
        },
        v => panic!("expected parens, got {:?}", v),
    }
}

#[test]
fn division_with_variable_operand_is_not_delayed() {
    match value_of("$x/2") {
        Expr::BinaryOp(binop) => {
            assert_eq!(binop.op, BinaryOp::Div);
            assert!(!binop.is_delayed);
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn division_nested_under_addition_loses_delay() {
    match value_of("1/2 + 3") {
        Expr::BinaryOp(outer) => {
            assert_eq!(outer.op, BinaryOp::Plus);
            match &outer.lhs {
                Expr::BinaryOp(inner) => {
                    assert_eq!(inner.op, BinaryOp::Div);
                    assert!(!inner.is_delayed);
                }
                v => panic!("expected a binary op, got {:?}", v),
            }
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn chained_division_stays_delayed() {
    match value_of("1/2/3") {
        Expr::BinaryOp(outer) => {
            assert_eq!(outer.op, BinaryOp::Div);
            assert!(outer.is_delayed);
        }
        v => panic!("expected a binary op, got {:?}", v),
    }
}

#[test]
fn minus_disambiguation() {
    // `10 - 5` subtracts.
    assert!(matches!(
        value_of("10 - 5"),
        Expr::BinaryOp(binop) if binop.op == BinaryOp::Minus
    ));

    // `10 -5` is a two-element space list.
    match value_of("10 -5") {
        Expr::List(list) => {
            assert_eq!(list.separator, ListSeparator::Space);
            assert_eq!(list.elems.len(), 2);
            assert!(matches!(list.elems[1].node, Expr::Number { value, .. } if value == -5.0));
        }
        v => panic!("expected a list, got {:?}", v),
    }

    // `10px-5px` is two dimension tokens.
    match value_of("10px-5px") {
        Expr::List(list) => {
            assert_eq!(list.separator, ListSeparator::Space);
            assert_eq!(list.elems.len(), 2);
        }
        v => panic!("expected a list, got {:?}", v),
    }

    // `1-2` subtracts.
    assert!(matches!(
        value_of("1-2"),
        Expr::BinaryOp(binop) if binop.op == BinaryOp::Minus
    ));

    // `-foo` is an identifier.
    match value_of("-foo") {
        Expr::String(s, ..) => assert_eq!(s.0.as_plain(), Some("-foo")),
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn unary_operators() {
    assert!(matches!(
        value_of("-$x"),
        Expr::UnaryOp(UnaryOp::Neg, ..)
    ));
    assert!(matches!(
        value_of("not true"),
        Expr::UnaryOp(UnaryOp::Not, ..)
    ));
    assert!(matches!(
        value_of("/16px"),
        Expr::UnaryOp(UnaryOp::Div, ..)
    ));
}

#[test]
fn comma_list_does_not_nest_directly() {
    match value_of("1 2, 3 4") {
        Expr::List(list) => {
            assert_eq!(list.separator, ListSeparator::Comma);
            assert_eq!(list.elems.len(), 2);
            for elem in &list.elems {
                match &elem.node {
                    Expr::List(inner) => assert_eq!(inner.separator, ListSeparator::Space),
                    v => panic!("expected a space list, got {:?}", v),
                }
            }
        }
        v => panic!("expected a list, got {:?}", v),
    }
}

#[test]
fn parenthesized_comma_list_nests() {
    match value_of("(1, 2), 3") {
        Expr::List(outer) => {
            assert_eq!(outer.separator, ListSeparator::Comma);
            assert_eq!(outer.elems.len(), 2);
            assert!(matches!(
                &outer.elems[0].node,
                Expr::List(inner) if inner.separator == ListSeparator::Comma
            ));
        }
        v => panic!("expected a list, got {:?}", v),
    }
}

#[test]
fn bracketed_lists() {
    match value_of("[a b]") {
        Expr::List(list) => {
            assert_eq!(list.brackets, Brackets::Bracketed);
            assert_eq!(list.separator, ListSeparator::Space);
            assert_eq!(list.elems.len(), 2);
        }
        v => panic!("expected a list, got {:?}", v),
    }

    match value_of("[a, b]") {
        Expr::List(list) => {
            assert_eq!(list.brackets, Brackets::Bracketed);
            assert_eq!(list.separator, ListSeparator::Comma);
        }
        v => panic!("expected a list, got {:?}", v),
    }

    match value_of("[]") {
        Expr::List(list) => {
            assert_eq!(list.brackets, Brackets::Bracketed);
            assert!(list.elems.is_empty());
        }
        v => panic!("expected a list, got {:?}", v),
    }
}

#[test]
fn map_literals() {
    let mut sheet = parse("$m: (a: 1, b: 2);");
    let decl = match sheet.body.remove(0) {
        Stmt::VariableDecl(decl) => decl,
        stmt => panic!("expected a variable declaration, got {:?}", stmt),
    };

    match decl.value {
        Expr::Map(map) => {
            assert_eq!(map.0.len(), 2);
        }
        v => panic!("expected a map, got {:?}", v),
    }
}

#[test]
fn parenthesized_single_value_is_not_a_map() {
    assert!(matches!(value_of("(1)"), Expr::Paren(..)));
}

#[test]
fn empty_parens_are_an_empty_list() {
    match value_of("()") {
        Expr::List(list) => {
            assert!(list.elems.is_empty());
            assert_eq!(list.brackets, Brackets::None);
        }
        v => panic!("expected a list, got {:?}", v),
    }
}

#[test]
fn function_calls() {
    match value_of("rgba(10, 20, 30, 0.5)") {
        Expr::FunctionCall(call) => {
            assert_eq!(call.name.as_str(), "rgba");
            assert_eq!(call.arguments.positional.len(), 4);
        }
        v => panic!("expected a function call, got {:?}", v),
    }
}

#[test]
fn named_arguments() {
    match value_of("foo($a: 1, $b: 2)") {
        Expr::FunctionCall(call) => {
            assert!(call.arguments.positional.is_empty());
            assert_eq!(call.arguments.named.len(), 2);
        }
        v => panic!("expected a function call, got {:?}", v),
    }
}

#[test]
fn calc_is_preserved_verbatim() {
    match value_of("calc(100% - #{$x})") {
        Expr::String(s, ..) => {
            assert_eq!(s.1, QuoteKind::None);
            assert!(s.0.initial_plain().starts_with("calc("));
            assert!(s.0.has_interpolants());
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn progid_filter_is_preserved() {
    match value_of("progid:DXImageTransform.Microsoft.gradient(enabled='false')") {
        Expr::String(s, ..) => {
            assert!(s.0.initial_plain().starts_with("progid:"));
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn url_token() {
    match value_of("url(http://example.com/a.png)") {
        Expr::String(s, ..) => {
            assert_eq!(s.0.as_plain(), Some("url(http://example.com/a.png)"));
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn important_is_a_value() {
    match value_of("red !important") {
        Expr::List(list) => {
            assert_eq!(list.elems.len(), 2);
            match &list.elems[1].node {
                Expr::String(s, ..) => assert_eq!(s.0.as_plain(), Some("!important")),
                v => panic!("expected !important, got {:?}", v),
            }
        }
        v => panic!("expected a list, got {:?}", v),
    }
}

#[test]
fn variable_flags() {
    let mut sheet = parse("$x: 1 !default !global;");
    match sheet.body.remove(0) {
        Stmt::VariableDecl(decl) => {
            assert!(decl.is_guarded);
            assert!(decl.is_global);
        }
        stmt => panic!("expected a variable declaration, got {:?}", stmt),
    }
}

#[test]
fn quoted_strings() {
    match value_of("\"hello world\"") {
        Expr::String(s, ..) => {
            assert_eq!(s.1, QuoteKind::Quoted);
            assert_eq!(s.0.as_plain(), Some("hello world"));
        }
        v => panic!("expected a string, got {:?}", v),
    }
}

#[test]
fn parent_selector_as_value() {
    let rule = ruleset("a { content: &; }");
    match &rule.body[0] {
        Stmt::Declaration(decl) => {
            assert!(matches!(
                decl.value.as_ref().map(|v| &v.node),
                Some(Expr::ParentSelector)
            ));
        }
        stmt => panic!("expected a declaration, got {:?}", stmt),
    }
}
