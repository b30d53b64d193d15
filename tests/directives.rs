#[macro_use]
mod macros;

use macros::parse;
use moss::ast::{Expr, Import, Selector, Stmt};
use moss::value::BinaryOp;

#[test]
fn if_else_chain() {
    let mut sheet = parse("@if $x > 0 { a {b: c} } @else { a {b: d} }");
    assert_eq!(sheet.body.len(), 1);

    let if_rule = match sheet.body.remove(0) {
        Stmt::If(if_rule) => if_rule,
        stmt => panic!("expected an @if, got {:?}", stmt),
    };

    match &if_rule.condition {
        Expr::BinaryOp(binop) => {
            assert_eq!(binop.op, BinaryOp::GreaterThan);
            assert!(matches!(
                &binop.lhs,
                Expr::Variable { name } if name.node.as_str() == "x"
            ));
            assert!(matches!(binop.rhs, Expr::Number { value, .. } if value == 0.0));
        }
        v => panic!("expected a binary op, got {:?}", v),
    }

    assert_eq!(if_rule.body.len(), 1);
    assert!(matches!(&if_rule.body[0], Stmt::RuleSet(..)));

    let alternative = if_rule.alternative.expect("@else block");
    assert_eq!(alternative.len(), 1);
    assert!(matches!(&alternative[0], Stmt::RuleSet(..)));
}

#[test]
fn else_if_nests() {
    let mut sheet = parse("@if $a { x { y: z } } @else if $b { x { y: w } } @else { x { y: v } }");
    let if_rule = match sheet.body.remove(0) {
        Stmt::If(if_rule) => if_rule,
        stmt => panic!("expected an @if, got {:?}", stmt),
    };

    let alternative = if_rule.alternative.expect("@else if");
    assert_eq!(alternative.len(), 1);

    match &alternative[0] {
        Stmt::If(nested) => {
            assert!(matches!(&nested.condition, Expr::Variable { .. }));
            assert!(nested.alternative.is_some());
        }
        stmt => panic!("expected a nested @if, got {:?}", stmt),
    }
}

#[test]
fn bare_else_is_an_error() {
    assert_err!(
        "Error: Invalid CSS: @else must come after @if",
        "@else { a { b: c } }"
    );
}

#[test]
fn for_rule_bounds() {
    let mut sheet = parse("@for $i from 1 through 3 { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::For(for_rule) => {
            assert_eq!(for_rule.variable.node.as_str(), "i");
            assert!(for_rule.is_inclusive);
            assert!(matches!(for_rule.from.node, Expr::Number { value, .. } if value == 1.0));
            assert!(matches!(for_rule.to.node, Expr::Number { value, .. } if value == 3.0));
        }
        stmt => panic!("expected a @for, got {:?}", stmt),
    }

    let mut sheet = parse("@for $i from 1 to 3 {}");
    match sheet.body.remove(0) {
        Stmt::For(for_rule) => assert!(!for_rule.is_inclusive),
        stmt => panic!("expected a @for, got {:?}", stmt),
    }
}

#[test]
fn for_requires_to_or_through() {
    assert_err!(
        "Error: Expected \"to\" or \"through\".",
        "@for $i from 1 { a { b: c } }"
    );
}

#[test]
fn each_rule_variables() {
    let mut sheet = parse("@each $key, $value in $map { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::Each(each) => {
            assert_eq!(each.variables.len(), 2);
            assert_eq!(each.variables[0].as_str(), "key");
            assert_eq!(each.variables[1].as_str(), "value");
            assert!(matches!(each.list, Expr::Variable { .. }));
        }
        stmt => panic!("expected an @each, got {:?}", stmt),
    }
}

#[test]
fn while_rule() {
    let mut sheet = parse("@while $i < 3 { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::While(while_rule) => {
            assert!(matches!(
                while_rule.condition,
                Expr::BinaryOp(binop) if binop.op == BinaryOp::LessThan
            ));
        }
        stmt => panic!("expected a @while, got {:?}", stmt),
    }
}

#[test]
fn while_requires_a_condition() {
    assert_err!(
        "Error: Invalid CSS after \"@while\": expected expression (e.g. 1px, bold), was \"{ a { b: c } }\"",
        "@while { a { b: c } }"
    );
}

#[test]
fn mixin_and_include() {
    let mut sheet = parse("@mixin pad($x: 1px) { padding: $x; } a { @include pad(2px); }");
    assert_eq!(sheet.body.len(), 2);

    match sheet.body.remove(0) {
        Stmt::Mixin(mixin) => {
            assert_eq!(mixin.name.as_str(), "pad");
            assert_eq!(mixin.params.params.len(), 1);
            assert!(mixin.params.params[0].default.is_some());
            assert!(!mixin.has_content);
        }
        stmt => panic!("expected a @mixin, got {:?}", stmt),
    }

    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::Include(include) => {
                assert_eq!(include.name.node.as_str(), "pad");
                assert_eq!(include.args.positional.len(), 1);
                assert!(include.content.is_none());
            }
            stmt => panic!("expected an @include, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn mixin_with_content_block() {
    let mut sheet = parse("@mixin media { @content; } a { @include media { color: red; } }");

    match sheet.body.remove(0) {
        Stmt::Mixin(mixin) => assert!(mixin.has_content),
        stmt => panic!("expected a @mixin, got {:?}", stmt),
    }

    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::Include(include) => {
                let content = include.content.as_ref().expect("content block");
                assert_eq!(content.body.len(), 1);
                assert!(content.params.params.is_empty());
            }
            stmt => panic!("expected an @include, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn include_using_block_params() {
    let mut sheet =
        parse("@mixin each-item { @content(1); } a { @include each-item using ($n) { b: $n; } }");
    sheet.body.remove(0);
    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::Include(include) => {
                let content = include.content.as_ref().expect("content block");
                assert_eq!(content.params.params.len(), 1);
            }
            stmt => panic!("expected an @include, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn include_using_requires_params() {
    assert_err!(
        "Error: Invalid CSS after \"...include m using\": expected \"(\", was \"{ a: b; } }\"",
        "x { @include m using { a: b; } }"
    );
}

#[test]
fn content_outside_mixin_is_an_error() {
    assert_err!(
        "Error: @content is only allowed within mixin declarations.",
        "@content;"
    );
    assert_err!(
        "Error: @content is only allowed within mixin declarations.",
        "a { @content; }"
    );
}

#[test]
fn function_declarations() {
    let mut sheet = parse("@function double($x) { @return $x * 2; }");
    match sheet.body.remove(0) {
        Stmt::FunctionDecl(func) => {
            assert_eq!(func.name.node.as_str(), "double");
            assert_eq!(func.params.params.len(), 1);
            assert_eq!(func.body.len(), 1);
            assert!(matches!(&func.body[0], Stmt::Return(..)));
        }
        stmt => panic!("expected a @function, got {:?}", stmt),
    }
}

#[test]
fn function_rest_params() {
    let mut sheet = parse("@function sum($values...) { @return $values; }");
    match sheet.body.remove(0) {
        Stmt::FunctionDecl(func) => {
            assert!(func.params.params.is_empty());
            assert_eq!(func.params.rest.map(|r| r.as_str().to_owned()), Some("values".to_owned()));
        }
        stmt => panic!("expected a @function, got {:?}", stmt),
    }
}

#[test]
fn reserved_function_names_are_rejected() {
    assert_err!(
        "Error: Invalid function name.",
        "@function and() { @return 1; }"
    );
    assert_err!(
        "Error: Invalid function name.",
        "@function or() { @return 1; }"
    );
    assert_err!(
        "Error: Invalid function name.",
        "@function not() { @return 1; }"
    );
}

#[test]
fn functions_may_not_contain_style_rules() {
    assert_err!(
        "Error: @function rules may not contain style rules.",
        "@function f() { a { b: c } }"
    );
}

#[test]
fn return_outside_function_is_an_error() {
    assert_err!("Error: This at-rule is not allowed here.", "@return 1;");
    assert_err!(
        "Error: This at-rule is not allowed here.",
        "a { @return 1; }"
    );
}

#[test]
fn diagnostics_scope_enforcement() {
    // Legal at root, in mixins, functions, control flow, and style rules.
    parse("@debug 1;");
    parse("a { @debug 1; }");
    parse("@mixin m { @warn \"w\"; }");
    parse("@if true { @debug 1; }");

    // Illegal under a property set.
    assert_err!(
        "Error: Illegal nesting: Only properties may be nested beneath properties.",
        "a { font: { @debug 1; } }"
    );
}

#[test]
fn error_rule() {
    let mut sheet = parse("@error \"boom\";");
    match sheet.body.remove(0) {
        Stmt::Error(error) => {
            assert!(matches!(error.value, Expr::String(..)));
        }
        stmt => panic!("expected an @error, got {:?}", stmt),
    }
}

#[test]
fn extend_rule() {
    let mut sheet = parse("a { @extend .b !optional; }");
    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::Extend(extend) => {
                assert!(extend.is_optional);
                assert!(matches!(&extend.selector, Selector::List(..)));
            }
            stmt => panic!("expected an @extend, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn extend_with_interpolation_is_a_schema() {
    let mut sheet = parse("a { @extend .#{$name}; }");
    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::Extend(extend) => {
                assert!(matches!(&extend.selector, Selector::Schema(..)));
            }
            stmt => panic!("expected an @extend, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn extend_at_root_is_an_error() {
    assert_err!(
        "Error: @extend may only be used within style rules.",
        "@extend .b;"
    );
}

#[test]
fn import_forms() {
    let mut sheet = parse("@import \"foo\", \"bar.css\", url(baz.css);");
    match sheet.body.remove(0) {
        Stmt::ImportRule(import) => {
            assert_eq!(import.imports.len(), 3);
            assert!(matches!(
                &import.imports[0],
                Import::Dynamic(dynamic) if dynamic.url == "foo" && !dynamic.handled
            ));
            assert!(matches!(&import.imports[1], Import::Css(..)));
            assert!(matches!(&import.imports[2], Import::Css(..)));
        }
        stmt => panic!("expected an @import, got {:?}", stmt),
    }
}

#[test]
fn import_with_media_modifiers_stays_css() {
    let mut sheet = parse("@import \"theme\" screen and (min-width: 600px);");
    match sheet.body.remove(0) {
        Stmt::ImportRule(import) => match &import.imports[0] {
            Import::Css(css) => {
                let modifiers = css.modifiers.as_ref().expect("media modifiers");
                assert!(modifiers.initial_plain().starts_with("screen"));
            }
            import => panic!("expected a css import, got {:?}", import),
        },
        stmt => panic!("expected an @import, got {:?}", stmt),
    }
}

#[test]
fn import_inside_control_flow_is_an_error() {
    assert_err!(
        "Error: This at-rule is not allowed here.",
        "@if true { @import \"foo\"; }"
    );
    assert_err!(
        "Error: This at-rule is not allowed here.",
        "@mixin m { @import \"foo\"; }"
    );
}

#[test]
fn custom_importers_claim_targets() {
    #[derive(Debug)]
    struct ClaimAll;

    impl moss::Importer for ClaimAll {
        fn import(
            &self,
            url: &str,
            _containing_path: &std::path::Path,
            _span: moss::codemap::Span,
        ) -> bool {
            url == "handled"
        }
    }

    let importer = ClaimAll;
    let options = moss::Options::default().importer(&importer);
    let mut sheet = moss::parse_stylesheet(
        "@import \"handled\", \"unhandled\";".to_owned(),
        "input.scss",
        &options,
    )
    .unwrap();

    match sheet.body.remove(0) {
        Stmt::ImportRule(import) => {
            assert!(matches!(
                &import.imports[0],
                Import::Dynamic(dynamic) if dynamic.handled
            ));
            assert!(matches!(
                &import.imports[1],
                Import::Dynamic(dynamic) if !dynamic.handled
            ));
        }
        stmt => panic!("expected an @import, got {:?}", stmt),
    }
}

#[test]
fn at_root_forms() {
    let mut sheet = parse("@at-root { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::AtRoot(at_root) => {
            assert!(at_root.query.is_none());
            assert_eq!(at_root.body.len(), 1);
        }
        stmt => panic!("expected an @at-root, got {:?}", stmt),
    }

    let mut sheet = parse("a { @at-root b { c: d } }");
    match sheet.body.remove(0) {
        Stmt::RuleSet(rule) => match &rule.body[0] {
            Stmt::AtRoot(at_root) => {
                assert_eq!(at_root.body.len(), 1);
                match &at_root.body[0] {
                    Stmt::RuleSet(inner) => {
                        assert!(matches!(&inner.selector, Selector::List(..)));
                    }
                    stmt => panic!("expected a ruleset, got {:?}", stmt),
                }
            }
            stmt => panic!("expected an @at-root, got {:?}", stmt),
        },
        stmt => panic!("expected a ruleset, got {:?}", stmt),
    }
}

#[test]
fn at_root_query() {
    let mut sheet = parse("@at-root (without: media) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::AtRoot(at_root) => {
            let query = at_root.query.expect("query");
            assert!(!query.node.include);
            assert!(query.node.names.contains("media"));
            assert!(query.node.excludes_name("media"));
        }
        stmt => panic!("expected an @at-root, got {:?}", stmt),
    }

    let mut sheet = parse("@at-root (with: rule) { a { b: c } }");
    match sheet.body.remove(0) {
        Stmt::AtRoot(at_root) => {
            assert!(at_root.query.expect("query").node.include);
        }
        stmt => panic!("expected an @at-root, got {:?}", stmt),
    }
}

#[test]
fn unknown_at_rule_with_block() {
    let mut sheet = parse("@keyframes spin { from { transform: rotate(0deg); } }");
    match sheet.body.remove(0) {
        Stmt::UnknownAtRule(rule) => {
            assert_eq!(rule.name.as_plain(), Some("keyframes"));
            let value = rule.value.expect("prelude");
            assert_eq!(value.as_plain().map(str::trim_end), Some("spin"));
            assert_eq!(rule.body.expect("body").len(), 1);
        }
        stmt => panic!("expected an unknown at-rule, got {:?}", stmt),
    }
}

#[test]
fn unknown_at_rule_without_block() {
    let mut sheet = parse("@namespace svg url(http://www.w3.org/2000/svg);");
    match sheet.body.remove(0) {
        Stmt::UnknownAtRule(rule) => {
            assert_eq!(rule.name.as_plain(), Some("namespace"));
            assert!(rule.body.is_none());
        }
        stmt => panic!("expected an unknown at-rule, got {:?}", stmt),
    }
}

#[test]
fn charset_is_consumed() {
    let sheet = parse("@charset \"UTF-8\";\na { color: red; }");
    assert_eq!(sheet.body.len(), 1);
}

#[test]
fn comments_are_statements() {
    let sheet = parse("// silent\n/* loud */\na { color: red; }");
    assert_eq!(sheet.body.len(), 3);
    assert!(matches!(&sheet.body[0], Stmt::SilentComment(c) if c.text == " silent"));
    match &sheet.body[1] {
        Stmt::LoudComment(c) => assert_eq!(c.text.as_plain(), Some("/* loud */")),
        stmt => panic!("expected a loud comment, got {:?}", stmt),
    }
}

#[test]
fn mixins_may_not_nest() {
    assert_err!(
        "Error: Mixins may not contain mixin declarations.",
        "@mixin a { @mixin b {} }"
    );
    assert_err!(
        "Error: Mixins may not be declared in control directives.",
        "@if true { @mixin a {} }"
    );
}
