//! Parser/decoder contract tests: accepted grammar, payload validation,
//! and the diagnostic prefix of every error kind.

use sisl_core::{parse, Map, Value};

fn obj(entries: &[(&str, Value)]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert((*key).to_string(), value.clone());
    }
    Value::Obj(map)
}

fn err_of(input: &str) -> String {
    parse(input)
        .expect_err(&format!("input should not parse: {input}"))
        .to_string()
}

// ============================================================================
// Accepted documents
// ============================================================================

#[test]
fn decode_simple_string() {
    let doc = parse(r#"{hello: !str "world"}"#).unwrap();
    assert_eq!(doc, obj(&[("hello", Value::Str("world".to_string()))]));
}

#[test]
fn decode_empty_document() {
    assert_eq!(parse("{}").unwrap(), obj(&[]));
}

#[test]
fn decode_all_scalar_tags() {
    let doc = parse(
        r#"{s: !str "x", i: !int "-3", f: !float "2.5", b: !bool "true", n: !null ""}"#,
    )
    .unwrap();
    assert_eq!(
        doc,
        obj(&[
            ("s", Value::Str("x".to_string())),
            ("i", Value::Int(-3)),
            ("f", Value::Float(2.5)),
            ("b", Value::Bool(true)),
            ("n", Value::Null),
        ])
    );
}

#[test]
fn decode_tolerates_whitespace_between_tokens() {
    let doc = parse("{\n  hello :\t!str\r\n \"world\" ,\n  n : !int \"1\"\n}").unwrap();
    assert_eq!(
        doc,
        obj(&[
            ("hello", Value::Str("world".to_string())),
            ("n", Value::Int(1)),
        ])
    );
}

#[test]
fn decode_scientific_float() {
    let doc = parse(r#"{n: !float "6.02e23"}"#).unwrap();
    assert_eq!(doc, obj(&[("n", Value::Float(6.02e23))]));
}

#[test]
fn decode_i64_boundaries() {
    let doc = parse(r#"{min: !int "-9223372036854775808", max: !int "9223372036854775807"}"#)
        .unwrap();
    assert_eq!(
        doc,
        obj(&[("min", Value::Int(i64::MIN)), ("max", Value::Int(i64::MAX))])
    );
}

#[test]
fn decode_nested_containers() {
    let doc = parse(r#"{a: !obj {b: !list {_0: !str "x"}}}"#).unwrap();
    assert_eq!(
        doc,
        obj(&[("a", obj(&[("b", Value::List(vec![Value::Str("x".to_string())]))]))])
    );
}

#[test]
fn decode_list_orders_by_index() {
    let doc = parse(r#"{l: !list {_1: !int "2", _0: !int "1"}}"#).unwrap();
    assert_eq!(
        doc,
        obj(&[("l", Value::List(vec![Value::Int(1), Value::Int(2)]))])
    );
}

#[test]
fn decode_list_fills_gaps_with_null() {
    let doc = parse(r#"{l: !list {_2: !int "3"}}"#).unwrap();
    assert_eq!(
        doc,
        obj(&[(
            "l",
            Value::List(vec![Value::Null, Value::Null, Value::Int(3)])
        )])
    );
}

#[test]
fn decode_empty_containers() {
    let doc = parse(r#"{o: !obj {}, l: !list {}}"#).unwrap();
    assert_eq!(doc, obj(&[("o", obj(&[])), ("l", Value::List(vec![]))]));
}

#[test]
fn decode_keys_with_dots_and_hyphens() {
    let doc = parse(r#"{a.b-c: !int "1", _x: !int "2", 0key: !int "3"}"#).unwrap();
    assert_eq!(
        doc,
        obj(&[
            ("a.b-c", Value::Int(1)),
            ("_x", Value::Int(2)),
            ("0key", Value::Int(3)),
        ])
    );
}

// ============================================================================
// String escapes
// ============================================================================

#[test]
fn decode_basic_escapes() {
    let doc = parse(r#"{s: !str "a\"b\\c\nd\te\rf"}"#).unwrap();
    assert_eq!(doc, obj(&[("s", Value::Str("a\"b\\c\nd\te\rf".to_string()))]));
}

#[test]
fn decode_hex_and_unicode_escapes() {
    let doc = parse(r#"{s: !str "\x41é\U0001F600"}"#).unwrap();
    assert_eq!(doc, obj(&[("s", Value::Str("A\u{e9}\u{1F600}".to_string()))]));
}

#[test]
fn decode_raw_newline_in_string() {
    let doc = parse("{s: !str \"line1\nline2\"}").unwrap();
    assert_eq!(doc, obj(&[("s", Value::Str("line1\nline2".to_string()))]));
}

// ============================================================================
// sisl-parse errors
// ============================================================================

#[test]
fn error_missing_opening_brace() {
    assert!(err_of(r#"hello: !str "world""#).starts_with("sisl-parse:"));
}

#[test]
fn error_unterminated_document() {
    assert!(err_of(r#"{hello: !str "world""#).starts_with("sisl-parse:"));
}

#[test]
fn error_trailing_input() {
    assert!(err_of(r#"{} extra"#).starts_with("sisl-parse:"));
}

#[test]
fn error_second_document() {
    assert!(err_of(r#"{a: !int "1"} {b: !int "2"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_trailing_comma() {
    let err = err_of(r#"{a: !int "1",}"#);
    assert!(err.starts_with("sisl-parse:"), "unexpected error: {err}");
    assert!(err.contains("trailing comma"), "unexpected error: {err}");
}

#[test]
fn error_missing_colon() {
    assert!(err_of(r#"{a !int "1"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_missing_tag() {
    assert!(err_of(r#"{a: "1"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_unterminated_string() {
    assert!(err_of(r#"{a: !str "oops}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_invalid_escape() {
    assert!(err_of(r#"{a: !str "\q"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_short_hex_escape() {
    assert!(err_of(r#"{a: !str "\u12"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_surrogate_codepoint() {
    assert!(err_of(r#"{a: !str "\uD800"}"#).starts_with("sisl-parse:"));
}

#[test]
fn error_reports_position() {
    let err = err_of("{\n  a: !int x\n}");
    assert!(err.contains("line 2"), "position missing from: {err}");
}

// ============================================================================
// sisl-tag errors
// ============================================================================

#[test]
fn error_unknown_tag() {
    assert!(err_of(r#"{a: !date "2020"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_bool_payload() {
    assert!(err_of(r#"{a: !bool "yes"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_null_payload_not_empty() {
    assert!(err_of(r#"{a: !null "x"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_int_payload_garbage() {
    assert!(err_of(r#"{a: !int "12x"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_int_payload_overflow() {
    // One past i64::MAX: not widened to float, rejected.
    assert!(err_of(r#"{a: !int "9223372036854775808"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_float_payload_garbage() {
    assert!(err_of(r#"{a: !float "fast"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_float_payload_non_finite() {
    assert!(err_of(r#"{a: !float "inf"}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_scalar_tag_with_grouping_payload() {
    assert!(err_of(r#"{a: !int {}}"#).starts_with("sisl-tag:"));
}

#[test]
fn error_obj_tag_with_string_payload() {
    assert!(err_of(r#"{a: !obj "x"}"#).starts_with("sisl-tag:"));
}

// ============================================================================
// sisl-list-index errors
// ============================================================================

#[test]
fn error_list_key_not_index() {
    assert!(err_of(r#"{a: !list {b: !int "1"}}"#).starts_with("sisl-list-index:"));
}

#[test]
fn error_list_key_bare_underscore() {
    assert!(err_of(r#"{a: !list {_: !int "1"}}"#).starts_with("sisl-list-index:"));
}

#[test]
fn error_duplicate_list_index() {
    assert!(
        err_of(r#"{a: !list {_0: !int "1", _0: !int "2"}}"#).starts_with("sisl-list-index:")
    );
}
