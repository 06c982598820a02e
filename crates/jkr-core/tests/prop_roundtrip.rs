/// Property-based roundtrip tests.
///
/// Uses `proptest` to generate random value trees, texts and JSON objects and checks
/// that every encode/decode pair in the codec is an inverse:
///
/// - `deserialize(serialize(v)) == v` for value trees
/// - `decompress(compress(t)) == t` for any text
/// - `decode_keys(encode_keys(o)) == o` for plain JSON objects
/// - `from_jkr(to_jkr(o)) == o` for plain JSON objects mixing integer-like and other keys
///
/// Known limitations excluded from testing:
/// - Verbatim strings containing `"` or `\` (only the escaped style carries them)
/// - Integral JSON floats such as `2.0`, which come back as the JSON integer `2`
/// - Arrays at the JSON boundary, which come back as objects keyed `"1"`, `"2"`, ...
use jkr_core::serializer::{serialize_with, SerializeOptions, StringStyle};
use jkr_core::{
    compress, decode_keys, decompress, deserialize, encode_keys, from_jkr, serialize, to_jkr,
    Key, Table, Value,
};
use proptest::prelude::*;
use serde_json::{Map, Number, Value as JsonValue};

// ============================================================================
// Strategies
// ============================================================================

/// Strings the verbatim writer can carry: no quote, no backslash.
fn arb_plain_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_ ]{0,20}",
        Just(String::new()),
        Just("j_joker".to_string()),
        Just("caf\u{00e9} \u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        Just("[1]={},".to_string()),
        Just("nil".to_string()),
        Just("42".to_string()),
    ]
}

/// Any string at all, for the escaped writer.
fn arb_any_string() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        Just("say \"hi\"".to_string()),
        Just("C:\\path\\to".to_string()),
        Just("\\\"\\\\\"".to_string()),
        Just("\u{0}\u{1}9\u{7f}".to_string()),
    ]
}

fn arb_finite_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64),
        Just(0.1),
        Just(1e300),
        Just(5e-324),
    ]
}

fn arb_key(strings: BoxedStrategy<String>) -> impl Strategy<Value = Key> {
    prop_oneof![any::<u64>().prop_map(Key::Int), strings.prop_map(Key::Str)]
}

fn arb_value(strings: BoxedStrategy<String>) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Boolean),
        arb_finite_f64().prop_map(Value::Number),
        strings.clone().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, move |inner| {
        prop::collection::vec((arb_key(strings.clone()), inner), 0..6)
            .prop_map(|entries| Value::Table(entries.into_iter().collect::<Table>()))
    })
}

/// Object keys for the JSON boundary: a mix of canonical integers and names.
fn arb_json_key() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..10_000).prop_map(|n| n.to_string()),
        "[a-z_][a-z0-9_]{0,12}",
        Just("01".to_string()),
        Just("-1".to_string()),
    ]
}

fn arb_json_number() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        3 => (-1_000_000_000i64..1_000_000_000i64).prop_map(|n| JsonValue::Number(n.into())),
        1 => (-100_000_000i64..100_000_000i64, 1u32..5u32).prop_filter_map(
            "must be fractional",
            |(mantissa, decimals)| {
                let f = mantissa as f64 / 10f64.powi(decimals as i32);
                if f.fract() == 0.0 {
                    return None;
                }
                Number::from_f64(f).map(JsonValue::Number)
            },
        ),
    ]
}

fn arb_json_object() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        arb_json_number(),
        arb_plain_string().prop_map(JsonValue::String),
    ];
    let tree = leaf.prop_recursive(4, 48, 6, |inner| {
        prop::collection::vec((arb_json_key(), inner), 0..6).prop_map(|pairs| {
            let mut map = Map::new();
            for (k, v) in pairs {
                map.insert(k, v);
            }
            JsonValue::Object(map)
        })
    });
    prop::collection::vec((arb_json_key(), tree), 0..6).prop_map(|pairs| {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        JsonValue::Object(map)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn text_roundtrip_verbatim(v in arb_value(arb_plain_string().boxed())) {
        let text = serialize(&v).unwrap();
        prop_assert_eq!(deserialize(&text).unwrap(), v);
    }

    #[test]
    fn text_roundtrip_escaped(v in arb_value(arb_any_string().boxed())) {
        let options = SerializeOptions { strings: StringStyle::Escaped };
        let text = serialize_with(&v, &options).unwrap();
        prop_assert_eq!(deserialize(&text).unwrap(), v);
    }

    #[test]
    fn container_roundtrip(text in any::<String>()) {
        let bytes = compress(&text).unwrap();
        prop_assert_eq!(decompress(&bytes).unwrap(), text);
    }

    #[test]
    fn key_tagging_roundtrip(o in arb_json_object()) {
        prop_assert_eq!(decode_keys(encode_keys(&o).unwrap()).unwrap(), o);
    }

    #[test]
    fn jkr_roundtrip(o in arb_json_object()) {
        let bytes = to_jkr(&o).unwrap();
        prop_assert_eq!(from_jkr(&bytes).unwrap(), o);
    }

    #[test]
    fn garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = from_jkr(&bytes);
    }
}
