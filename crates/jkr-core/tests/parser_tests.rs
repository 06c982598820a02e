/// Parser tests: table literal text → `Value` tree.
use jkr_core::parser::deserialize;
use jkr_core::{serialize, JkrError, Key, Table, Value};

fn parse_table(text: &str) -> Table {
    match deserialize(text).unwrap() {
        Value::Table(t) => t,
        other => panic!("expected table, got {}", other.type_name()),
    }
}

/// Assert the input fails with a format error and return its offset and message.
fn format_error(text: &str) -> (usize, String) {
    match deserialize(text) {
        Err(JkrError::Format { offset, message }) => (offset, message),
        Err(other) => panic!("expected format error for {text:?}, got {other:?}"),
        Ok(v) => panic!("expected format error for {text:?}, parsed {v:?}"),
    }
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn parse_nil_and_booleans() {
    assert_eq!(deserialize("return nil").unwrap(), Value::Nil);
    assert_eq!(deserialize("return true").unwrap(), Value::Boolean(true));
    assert_eq!(deserialize("return false").unwrap(), Value::Boolean(false));
}

#[test]
fn parse_numbers() {
    assert_eq!(deserialize("return 42").unwrap(), Value::Number(42.0));
    assert_eq!(deserialize("return -7").unwrap(), Value::Number(-7.0));
    assert_eq!(deserialize("return 3.25").unwrap(), Value::Number(3.25));
    assert_eq!(deserialize("return 1e3").unwrap(), Value::Number(1000.0));
    assert_eq!(deserialize("return 2.5E-2").unwrap(), Value::Number(0.025));
    assert_eq!(deserialize("return +4").unwrap(), Value::Number(4.0));
    assert_eq!(deserialize("return .5").unwrap(), Value::Number(0.5));
}

#[test]
fn parse_string() {
    assert_eq!(deserialize(r#"return "hello""#).unwrap(), Value::from("hello"));
    assert_eq!(deserialize(r#"return """#).unwrap(), Value::from(""));
}

#[test]
fn parse_string_escapes() {
    let v = deserialize(r#"return "a\"b\\c\nd\te\rf\'g""#).unwrap();
    assert_eq!(v, Value::from("a\"b\\c\nd\te\rf'g"));
}

#[test]
fn parse_decimal_escapes() {
    let v = deserialize(r#"return "\65\066\0001""#).unwrap();
    assert_eq!(v, Value::from("AB\u{0}1"));
}

#[test]
fn parse_backslash_newline_is_newline() {
    let v = deserialize("return \"a\\\nb\\\r\nc\"").unwrap();
    assert_eq!(v, Value::from("a\nb\nc"));
}

#[test]
fn parse_raw_newline_in_string() {
    assert_eq!(deserialize("return \"a\nb\"").unwrap(), Value::from("a\nb"));
}

#[test]
fn parse_unicode_string() {
    assert_eq!(
        deserialize("return \"\u{4f60}\u{597d}\"").unwrap(),
        Value::from("\u{4f60}\u{597d}")
    );
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn parse_empty_table() {
    assert!(parse_table("return {}").is_empty());
}

#[test]
fn parse_mixed_keys() {
    let t = parse_table(r#"return {[1]="a",["name"]="bob",}"#);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&Key::Int(1)), Some(&Value::from("a")));
    assert_eq!(t.get(&Key::from("name")), Some(&Value::from("bob")));
}

#[test]
fn parse_preserves_entry_order() {
    let t = parse_table(r#"return {["z"]=1,[3]=2,["a"]=3,}"#);
    let keys: Vec<Key> = t.keys().cloned().collect();
    assert_eq!(keys, vec![Key::from("z"), Key::Int(3), Key::from("a")]);
}

#[test]
fn parse_integer_and_string_keys_stay_distinct() {
    let t = parse_table(r#"return {[1]=true,["1"]=false,}"#);
    assert_eq!(t.get(&Key::Int(1)), Some(&Value::Boolean(true)));
    assert_eq!(t.get(&Key::from("1")), Some(&Value::Boolean(false)));
}

#[test]
fn parse_last_entry_without_comma() {
    let t = parse_table(r#"return {["a"]=1,["b"]=2}"#);
    assert_eq!(t.len(), 2);
}

#[test]
fn parse_semicolon_separator() {
    let t = parse_table(r#"return {["a"]=1;["b"]=2;}"#);
    assert_eq!(t.len(), 2);
}

#[test]
fn parse_tolerates_whitespace() {
    let t = parse_table("return  {\n  [ \"a\" ] = { [1] = true , } ,\n\t[2]=nil\n}\n");
    assert_eq!(t.len(), 2);
    let inner = t.get(&Key::from("a")).and_then(Value::as_table).unwrap();
    assert_eq!(inner.get(&Key::Int(1)), Some(&Value::Boolean(true)));
    assert_eq!(t.get(&Key::Int(2)), Some(&Value::Nil));
}

#[test]
fn parse_nested_save_shape() {
    let text = r#"return {["unlocked"]={["j_joker"]=true,["v_overstock_norm"]=true,},["discovered"]={},["alerted"]={["c_base"]=true,},}"#;
    let t = parse_table(text);
    let unlocked = t.get(&Key::from("unlocked")).and_then(Value::as_table).unwrap();
    assert_eq!(unlocked.len(), 2);
    assert_eq!(
        unlocked.get(&Key::from("j_joker")).and_then(Value::as_bool),
        Some(true)
    );
    assert!(t
        .get(&Key::from("discovered"))
        .and_then(Value::as_table)
        .unwrap()
        .is_empty());
}

#[test]
fn parse_duplicate_key_keeps_last_value() {
    let t = parse_table(r#"return {["a"]=1,["b"]=2,["a"]=3,}"#);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&Key::from("a")), Some(&Value::Number(3.0)));
}

#[test]
fn parse_nesting_keeps_every_level() {
    let depth = 200;
    let text = format!("return {}{}", "{[1]=".repeat(depth), "}".repeat(depth));
    let text = text.replacen("{[1]=}", "{}", 1);
    let mut v = deserialize(&text).unwrap();
    let mut levels = 0;
    while let Value::Table(t) = v {
        levels += 1;
        match t.into_iter().next() {
            Some((_, child)) => v = child,
            None => break,
        }
    }
    assert_eq!(levels, depth);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_return_prefix_fails() {
    let (offset, message) = format_error(r#"{["a"]=1,}"#);
    assert_eq!(offset, 0);
    assert!(message.contains("return"), "{message}");
}

#[test]
fn return_without_space_fails() {
    format_error("return{}");
}

#[test]
fn empty_input_fails() {
    format_error("");
    format_error("return ");
}

#[test]
fn unterminated_table_fails() {
    let (offset, message) = format_error(r#"return {["a"]=1,"#);
    assert_eq!(offset, 7);
    assert!(message.contains("unterminated table"), "{message}");
}

#[test]
fn unterminated_string_fails() {
    let (offset, message) = format_error(r#"return {["abc]=1,}"#);
    assert_eq!(offset, 9);
    assert!(message.contains("unterminated string"), "{message}");
}

#[test]
fn trailing_input_fails() {
    format_error("return {} {}");
}

#[test]
fn unknown_identifier_fails() {
    format_error("return {[1]=os.exit,}");
    format_error("return nilly");
    format_error("return truex");
}

#[test]
fn unbracketed_key_fails() {
    format_error("return {a=1}");
}

#[test]
fn positional_value_fails() {
    format_error("return {1,2,3}");
}

#[test]
fn negative_or_fractional_key_fails() {
    format_error("return {[-1]=true}");
    format_error("return {[1.5]=true}");
}

#[test]
fn integer_key_out_of_range_fails() {
    let (_, message) = format_error("return {[99999999999999999999999]=true}");
    assert!(message.contains("out of range"), "{message}");
}

#[test]
fn missing_equals_fails() {
    format_error(r#"return {["a"]1}"#);
}

#[test]
fn malformed_number_fails() {
    format_error("return 1.2.3");
    format_error("return --1");
    format_error("return 1e");
}

#[test]
fn overflowing_number_fails() {
    let (_, message) = format_error("return 1e999");
    assert!(message.contains("out of range"), "{message}");
}

#[test]
fn invalid_escape_fails() {
    format_error(r#"return "\q""#);
}

#[test]
fn decimal_escape_above_255_fails() {
    format_error(r#"return "\256""#);
}

#[test]
fn decimal_escape_producing_invalid_utf8_fails() {
    let (_, message) = format_error(r#"return "\255""#);
    assert!(message.contains("UTF-8"), "{message}");
}

#[test]
fn unterminated_deep_table_fails_at_its_open_brace() {
    let text = format!("return {}", "{[1]=".repeat(1000));
    let (offset, message) = format_error(&text);
    assert!(message.contains("unexpected end of input"), "{message}");
    assert_eq!(offset, text.len());

    let text = format!("return {}{{", "{[1]=".repeat(1000));
    let (offset, message) = format_error(&text);
    assert!(message.contains("unterminated table"), "{message}");
    assert_eq!(offset, text.len() - 1);
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn very_deep_nesting_parses_and_writes_back() {
    let depth = 100_000;
    let text = format!(
        "return {}{{}}{}",
        "{[1]=".repeat(depth),
        ",}".repeat(depth)
    );
    let v = deserialize(&text).unwrap();
    assert_eq!(serialize(&v).unwrap(), text);
}
