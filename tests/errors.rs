#[macro_use]
mod macros;

use macros::parse_err;

#[test]
fn unclosed_block() {
    assert_err!("Error: Invalid CSS after \"a {\": expected \"}\", was \"\"", "a {");
    assert_err!(
        "Error: Invalid CSS after \"a { color: red\": expected \"}\", was \"\"",
        "a { color: red"
    );
}

#[test]
fn unmatched_closing_brace() {
    assert_err!("Error: unmatched \"}\".", "}");
}

#[test]
fn declaration_at_root() {
    assert_err!(
        "Error: Invalid CSS after \"\": expected 1 selector or at-rule, was \"color: red;\"",
        "color: red;"
    );
}

#[test]
fn missing_semicolon_between_declarations() {
    assert_err!("Error: expected \";\".", "a {foo: bar: baz;}");
    assert_err!("Error: expected \";\".", "a {foo: bar?}");
}

#[test]
fn nothing_after_decimal() {
    assert_err!("Error: Expected digit.", "a {color: 1.;}");
}

#[test]
fn empty_declaration_value() {
    assert_err!("Error: style declaration must contain a value", "a {color: ;}");
}

#[test]
fn expected_expression() {
    assert_err!("Error: Expected expression.", "a {color: }");
}

#[test]
fn variable_missing_colon() {
    assert_err!(
        "Error: expected ':' after x in assignment statement",
        "$x 1;"
    );
}

#[test]
fn variable_empty_value() {
    assert_err!(
        "Error: Invalid CSS after \"$x:\": expected expression (e.g. 1px, bold), was \";\"",
        "$x: ;"
    );
}

#[test]
fn invalid_variable_flag() {
    assert_err!("Error: Invalid flag name.", "$x: 1 !wrong;");
}

#[test]
fn duplicate_mixin_parameter() {
    assert_err!("Error: Duplicate argument.", "@mixin m($a, $a) {}");
}

#[test]
fn duplicate_named_argument() {
    assert_err!("Error: Duplicate argument.", "a { b: foo($x: 1, $x: 2); }");
}

#[test]
fn positional_after_named_argument() {
    assert_err!(
        "Error: Positional arguments must come before keyword arguments.",
        "a { b: foo($x: 1, 2); }"
    );
}

#[test]
fn error_location_is_reported() {
    let err = moss::parse_stylesheet(
        "a {\n  color: red\n  background: blue;\n}\n".to_owned(),
        "input.scss",
        &moss::Options::default(),
    )
    .unwrap_err();

    let loc = err.location().expect("resolved location");
    // The parser notices the missing semicolon on line 3.
    assert_eq!(loc.begin.line, 2);

    let report = err.to_string();
    assert!(report.contains("input.scss"));
    assert!(report.contains("background: blue;"));
}

#[test]
fn framed_error_elides_long_lines() {
    let err = parse_err("this-is-a-very-long-property-name: red;");
    assert_eq!(
        err,
        "Error: Invalid CSS after \"\": expected 1 selector or at-rule, was \"this-is-a-very-...\""
    );
}

#[test]
fn depth_guard_stops_runaway_nesting() {
    let mut input = String::from("a { b: ");
    for _ in 0..10_000 {
        input.push('(');
    }

    assert_err!("Error: Exceeded maximum nesting level.", &input);
}

#[test]
fn depth_guard_is_configurable() {
    let result = moss::parse_stylesheet(
        "a { b: ((((1)))); }".to_owned(),
        "input.scss",
        &moss::Options::default().max_nesting(2),
    );

    assert!(result.is_err());
}

#[test]
fn utf16_bom_is_rejected_by_name() {
    let err = moss::parse_bytes(
        b"\xFF\xFEa\x00 \x00{\x00}\x00".to_vec(),
        "input.scss",
        &moss::Options::default(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string().lines().next().unwrap(),
        "Error: only UTF-8 documents are currently supported; your document appears to be UTF-16 (little endian)"
    );
}

#[test]
fn utf8_bom_is_skipped() {
    let sheet = moss::parse_bytes(
        b"\xEF\xBB\xBFa { color: red; }".to_vec(),
        "input.scss",
        &moss::Options::default(),
    )
    .unwrap();

    assert_eq!(sheet.body.len(), 1);
}

#[test]
fn invalid_utf8_names_the_byte_offset() {
    let err = moss::parse_bytes(
        b"a { color: r\xFFed; }".to_vec(),
        "input.scss",
        &moss::Options::default(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string().lines().next().unwrap(),
        "Error: Invalid UTF-8 byte 0xFF at offset 12."
    );
}

#[test]
fn unclosed_loud_comment() {
    assert_err!("Error: expected more input.", "/* unclosed");
}

#[test]
fn unclosed_string() {
    assert_err!("Error: Expected \".", "a { b: \"unclosed; }");
}

#[test]
fn unknown_unicode_bom_is_not_skipped() {
    // No recognized BOM: the bytes reach the parser untouched.
    let sheet = moss::parse_bytes(
        b"a { color: red; }".to_vec(),
        "input.scss",
        &moss::Options::default(),
    )
    .unwrap();
    assert_eq!(sheet.body.len(), 1);
}
