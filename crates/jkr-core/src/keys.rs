//! Integer-key tagging and the bridge between JSON and the [`Value`] tree.
//!
//! JSON object keys are always strings, but a table literal distinguishes `[1]` from
//! `["1"]`. Inside the codec an integer key `k` travels through JSON as the string
//! [`KEY_TAG`] followed by the digits of `k`:
//!
//! ```text
//! plain JSON          tagged JSON             Value tree
//! {"1": true}   <->   {"\t\f1": true}   <->   {[1]=true}
//! {"a": true}   <->   {"a": true}       <->   {["a"]=true}
//! ```
//!
//! [`encode_keys`] and [`decode_keys`] move between plain and tagged JSON;
//! [`Value::from_tagged_json`] and [`Value::to_tagged_json`] move between tagged JSON
//! and the tree. Only object keys are tagged: arrays are passed through untouched and
//! become sequence tables (`[1]`, `[2]`, ...) when they reach the tree.
//!
//! The tag prefix is reserved. A key that already starts with it on the way in, or
//! two keys that would become the same string on the way out, fail with
//! [`JkrError::KeyTagCollision`] rather than being silently merged.

use crate::error::{JkrError, Result};
use crate::value::{Key, Table, Value};
use serde_json::{Map, Number, Value as JsonValue};

/// Prefix marking an integer key in tagged JSON: TAB followed by FORM FEED.
pub const KEY_TAG: &str = "\t\x0c";

/// Largest integer that an `f64` (and so a JSON number in most consumers) holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Does `key` spell a non-negative integer in canonical form (`"0"`, `"17"`, not
/// `"017"`, `"-1"` or `"1.0"`) that fits a `u64`?
pub fn is_integer_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'))
        && key.parse::<u64>().is_ok()
}

/// The tagged form of integer key `n`.
pub fn tag_key(n: u64) -> String {
    format!("{KEY_TAG}{n}")
}

/// The integer a tagged key stands for, or `None` if `key` is not tagged.
pub fn untag_key(key: &str) -> Option<u64> {
    key.strip_prefix(KEY_TAG)?.parse().ok()
}

/// Plain JSON → tagged JSON: rewrite every integer-like object key to its tagged form.
///
/// Walks nested objects but not arrays.
pub fn encode_keys(value: &JsonValue) -> Result<JsonValue> {
    let JsonValue::Object(root) = value else {
        return Ok(value.clone());
    };
    let mut current = EncodeFrame::new(root);
    let mut parents: Vec<(EncodeFrame, String)> = Vec::new();
    loop {
        match current.entries.next() {
            Some((key, child)) => {
                if key.starts_with(KEY_TAG) {
                    return Err(JkrError::KeyTagCollision { key: key.clone() });
                }
                let key = if is_integer_key(key) {
                    format!("{KEY_TAG}{key}")
                } else {
                    key.clone()
                };
                match child {
                    JsonValue::Object(map) => {
                        parents.push((std::mem::replace(&mut current, EncodeFrame::new(map)), key));
                    }
                    other => {
                        current.out.insert(key, other.clone());
                    }
                }
            }
            None => {
                let EncodeFrame { out, .. } = current;
                match parents.pop() {
                    Some((mut parent, key)) => {
                        parent.out.insert(key, JsonValue::Object(out));
                        current = parent;
                    }
                    None => return Ok(JsonValue::Object(out)),
                }
            }
        }
    }
}

struct EncodeFrame<'a> {
    entries: serde_json::map::Iter<'a>,
    out: Map<String, JsonValue>,
}

impl<'a> EncodeFrame<'a> {
    fn new(map: &'a Map<String, JsonValue>) -> Self {
        Self {
            entries: map.iter(),
            out: Map::with_capacity(map.len()),
        }
    }
}

/// Tagged JSON → plain JSON: strip the tag from every tagged object key.
///
/// Walks nested objects but not arrays. Fails if an untagged key lands on a key
/// already present in the same object.
pub fn decode_keys(value: JsonValue) -> Result<JsonValue> {
    let root = match value {
        JsonValue::Object(map) => map,
        other => return Ok(other),
    };
    let mut current = DecodeFrame::new(root);
    let mut parents: Vec<(DecodeFrame, String)> = Vec::new();
    loop {
        match current.entries.next() {
            Some((key, child)) => {
                let key = match untag_key(&key) {
                    Some(n) => n.to_string(),
                    None => key,
                };
                // Nested objects are inserted when complete; no sibling is read before.
                if current.out.contains_key(&key) {
                    return Err(JkrError::KeyTagCollision { key });
                }
                match child {
                    JsonValue::Object(map) => {
                        parents.push((std::mem::replace(&mut current, DecodeFrame::new(map)), key));
                    }
                    other => {
                        current.out.insert(key, other);
                    }
                }
            }
            None => {
                let DecodeFrame { out, .. } = current;
                match parents.pop() {
                    Some((mut parent, key)) => {
                        parent.out.insert(key, JsonValue::Object(out));
                        current = parent;
                    }
                    None => return Ok(JsonValue::Object(out)),
                }
            }
        }
    }
}

struct DecodeFrame {
    entries: serde_json::map::IntoIter,
    out: Map<String, JsonValue>,
}

impl DecodeFrame {
    fn new(map: Map<String, JsonValue>) -> Self {
        Self {
            out: Map::with_capacity(map.len()),
            entries: map.into_iter(),
        }
    }
}

impl Value {
    /// Build a tree from tagged JSON.
    ///
    /// Tagged keys become integer keys and all other keys string keys. Arrays become
    /// sequence tables keyed `1..=n`; `null` becomes `Nil`.
    pub fn from_tagged_json(json: &JsonValue) -> Value {
        let mut current = match TaggedNode::of(json) {
            TaggedNode::Leaf(value) => return value,
            TaggedNode::Table(entries) => FromJsonFrame::new(entries),
        };
        let mut parents: Vec<(FromJsonFrame, Key)> = Vec::new();
        loop {
            match current.entries.next() {
                Some((key, child)) => match TaggedNode::of(child) {
                    TaggedNode::Leaf(value) => {
                        current.table.insert(key, value);
                    }
                    TaggedNode::Table(entries) => {
                        let child = FromJsonFrame::new(entries);
                        parents.push((std::mem::replace(&mut current, child), key));
                    }
                },
                None => {
                    let FromJsonFrame { table, .. } = current;
                    match parents.pop() {
                        Some((mut parent, key)) => {
                            parent.table.insert(key, Value::Table(table));
                            current = parent;
                        }
                        None => return Value::Table(table),
                    }
                }
            }
        }
    }

    /// Render the tree as tagged JSON.
    ///
    /// Integral numbers within ±2^53 become JSON integers, other numbers JSON floats.
    /// Fails on NaN/infinite numbers and on string keys that start with [`KEY_TAG`].
    pub fn to_tagged_json(&self) -> Result<JsonValue> {
        Ok(match self {
            Value::Nil => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(json_number(*n)?),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Table(table) => table_to_tagged_json(table)?,
        })
    }
}

/// One step of [`Value::from_tagged_json`]: a finished leaf, or the entries of a
/// table still to be built.
enum TaggedNode<'a> {
    Leaf(Value),
    Table(Vec<(Key, &'a JsonValue)>),
}

impl<'a> TaggedNode<'a> {
    fn of(json: &'a JsonValue) -> Self {
        match json {
            JsonValue::Null => TaggedNode::Leaf(Value::Nil),
            JsonValue::Bool(b) => TaggedNode::Leaf(Value::Boolean(*b)),
            JsonValue::Number(n) => {
                TaggedNode::Leaf(Value::Number(n.as_f64().unwrap_or(f64::NAN)))
            }
            JsonValue::String(s) => TaggedNode::Leaf(Value::String(s.clone())),
            JsonValue::Array(items) => TaggedNode::Table(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (Key::Int(i as u64 + 1), item))
                    .collect(),
            ),
            JsonValue::Object(map) => TaggedNode::Table(
                map.iter()
                    .map(|(key, child)| {
                        let key = match untag_key(key) {
                            Some(n) => Key::Int(n),
                            None => Key::Str(key.clone()),
                        };
                        (key, child)
                    })
                    .collect(),
            ),
        }
    }
}

struct FromJsonFrame<'a> {
    entries: std::vec::IntoIter<(Key, &'a JsonValue)>,
    table: Table,
}

impl<'a> FromJsonFrame<'a> {
    fn new(entries: Vec<(Key, &'a JsonValue)>) -> Self {
        Self {
            table: Table::with_capacity(entries.len()),
            entries: entries.into_iter(),
        }
    }
}

fn table_to_tagged_json(root: &Table) -> Result<JsonValue> {
    let mut current = ToJsonFrame::new(root);
    let mut parents: Vec<(ToJsonFrame, String)> = Vec::new();
    loop {
        match current.entries.next() {
            Some((key, child)) => {
                let key = match key {
                    Key::Int(n) => tag_key(*n),
                    Key::Str(s) if s.starts_with(KEY_TAG) => {
                        return Err(JkrError::KeyTagCollision { key: s.clone() })
                    }
                    Key::Str(s) => s.clone(),
                };
                match child {
                    Value::Table(table) => {
                        parents.push((std::mem::replace(&mut current, ToJsonFrame::new(table)), key));
                    }
                    leaf => {
                        current.out.insert(key, leaf.to_tagged_json()?);
                    }
                }
            }
            None => {
                let ToJsonFrame { out, .. } = current;
                match parents.pop() {
                    Some((mut parent, key)) => {
                        parent.out.insert(key, JsonValue::Object(out));
                        current = parent;
                    }
                    None => return Ok(JsonValue::Object(out)),
                }
            }
        }
    }
}

struct ToJsonFrame<'a> {
    entries: std::slice::Iter<'a, (Key, Value)>,
    out: Map<String, JsonValue>,
}

impl<'a> ToJsonFrame<'a> {
    fn new(table: &'a Table) -> Self {
        Self {
            entries: table.entries().iter(),
            out: Map::with_capacity(table.len()),
        }
    }
}

fn json_number(n: f64) -> Result<Number> {
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER && !negative_zero {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n).ok_or(JkrError::UnrepresentableNumber(n))
}
