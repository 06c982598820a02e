//! Table literal serializer: [`Value`] tree → `return {...}` text.
//!
//! The output is the compact form the game's loader reads:
//!
//! - `nil`, `true`, `false`
//! - numbers in shortest round-trip decimal form (`5`, `0.25`, `-0.0000001`)
//! - strings between double quotes
//! - tables as `{[key]=value,...}` with a trailing comma after every entry, where an
//!   integer key is written bare (`[1]`) and a string key quoted (`["name"]`)
//!
//! No whitespace is emitted anywhere.
//!
//! # Example
//! ```
//! use jkr_core::serializer::serialize;
//! use jkr_core::value::{Table, Value};
//!
//! let mut t = Table::new();
//! t.insert(1u64, "a");
//! t.insert("name", "bob");
//! let text = serialize(&Value::Table(t)).unwrap();
//! assert_eq!(text, r#"return {[1]="a",["name"]="bob",}"#);
//! ```

use crate::error::{JkrError, Result};
use crate::value::{Key, Table, Value};

/// Marker every table literal starts with.
pub const RETURN_PREFIX: &str = "return ";

/// How string keys and values are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringStyle {
    /// Write the string bytes between quotes untouched. Output matches the web
    /// editor's writer byte for byte, but a string holding `"` or `\` will not read
    /// back as written.
    #[default]
    Verbatim,
    /// Escape `\`, `"` and control characters the way the game's own writer does,
    /// so every string reads back exactly.
    Escaped,
}

/// Options for [`serialize_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    pub strings: StringStyle,
}

/// Serialize a value as a complete table literal, `return ` prefix included.
///
/// Fails with [`JkrError::UnrepresentableNumber`] if the tree holds NaN or an infinity.
pub fn serialize(value: &Value) -> Result<String> {
    serialize_with(value, &SerializeOptions::default())
}

/// Like [`serialize`], with explicit options.
pub fn serialize_with(value: &Value, options: &SerializeOptions) -> Result<String> {
    let mut out = String::from(RETURN_PREFIX);
    write_value(value, options, &mut out)?;
    tracing::debug!(bytes = out.len(), "serialized table literal");
    Ok(out)
}

fn write_value(value: &Value, options: &SerializeOptions, out: &mut String) -> Result<()> {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Boolean(true) => out.push_str("true"),
        Value::Boolean(false) => out.push_str("false"),
        Value::Number(n) => write_number(*n, out)?,
        Value::String(s) => write_string(s, options.strings, out),
        Value::Table(table) => write_table(table, options, out)?,
    }
    Ok(())
}

/// Write a table and everything below it. Open tables are kept on a heap stack, so
/// nesting depth does not grow the call stack.
fn write_table(root: &Table, options: &SerializeOptions, out: &mut String) -> Result<()> {
    out.push('{');
    let mut current = root.entries().iter();
    let mut parents = Vec::new();
    loop {
        match current.next() {
            Some((key, child)) => {
                out.push('[');
                match key {
                    Key::Int(n) => out.push_str(&n.to_string()),
                    Key::Str(s) => write_string(s, options.strings, out),
                }
                out.push_str("]=");
                match child {
                    Value::Table(table) => {
                        out.push('{');
                        parents.push(std::mem::replace(&mut current, table.entries().iter()));
                    }
                    scalar => {
                        write_value(scalar, options, out)?;
                        out.push(',');
                    }
                }
            }
            None => {
                out.push('}');
                match parents.pop() {
                    Some(parent) => {
                        out.push(',');
                        current = parent;
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Rust's `Display` for `f64` already gives the shortest text that parses back to the
/// same value, with no `.0` on integral values.
fn write_number(n: f64, out: &mut String) -> Result<()> {
    if !n.is_finite() {
        return Err(JkrError::UnrepresentableNumber(n));
    }
    out.push_str(&n.to_string());
    Ok(())
}

fn write_string(s: &str, style: StringStyle, out: &mut String) {
    out.push('"');
    match style {
        StringStyle::Verbatim => out.push_str(s),
        StringStyle::Escaped => {
            for c in s.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c if (c as u32) < 0x20 || c == '\u{7f}' => {
                        // Always three digits so a following digit is not absorbed.
                        out.push_str(&format!("\\{:03}", c as u32));
                    }
                    c => out.push(c),
                }
            }
        }
    }
    out.push('"');
}
