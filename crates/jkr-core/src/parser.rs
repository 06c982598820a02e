//! Table literal parser: `return {...}` text → [`Value`] tree.
//!
//! A hand-written parser for exactly the data subset of the dialect that save
//! files use. Nothing is evaluated; any construct outside this grammar is rejected
//! with [`JkrError::Format`].
//!
//! ```text
//! literal := "return " ws value ws EOF
//! value   := table | string | number | "true" | "false" | "nil"
//! table   := "{" ws ( entry ws ( "," | ";" ) ws )* entry? ws "}"
//! entry   := "[" ws key ws "]" ws "=" ws value
//! key     := unsigned-integer | string
//! ```
//!
//! # Key design decisions
//!
//! - **Byte cursor**: the input is scanned as bytes. Every token boundary is ASCII, so
//!   slicing never splits a UTF-8 sequence.
//! - **Lenient strings**: escapes follow the loader (`\n`, `\"`, `\ddd`, ...), and raw
//!   newlines inside quotes are accepted because the verbatim writer can emit them.
//! - **Explicit stack**: open tables live on a heap `Vec` instead of the call stack,
//!   so nesting depth is bounded by memory and a deep file never overflows the stack.
//! - **Duplicate keys**: the last entry wins, matching how the loader builds the table.

use crate::error::{JkrError, Result};
use crate::serializer::RETURN_PREFIX;
use crate::value::{Key, Table, Value};

/// Parse a complete table literal.
///
/// The text must start with `return `; its absence means the input is not an
/// inflated save file and is reported as a format error at offset 0.
pub fn deserialize(text: &str) -> Result<Value> {
    if !text.starts_with(RETURN_PREFIX) {
        return Err(JkrError::format(0, "missing `return ` prefix"));
    }
    let mut parser = Parser {
        src: text.as_bytes(),
        pos: RETURN_PREFIX.len(),
    };
    parser.skip_ws();
    let value = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(parser.error("unexpected input after value"));
    }
    tracing::debug!(bytes = text.len(), "parsed table literal");
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

/// A table whose closing brace has not been reached yet.
struct OpenTable {
    /// Offset of the opening `{`, reported if the table is never closed.
    open: usize,
    table: Table,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> JkrError {
        JkrError::format(self.pos, message)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(self.error(format!(
                "expected `{}`, found `{}`",
                byte as char,
                describe(b)
            ))),
            None => Err(self.error(format!(
                "expected `{}`, found end of input",
                byte as char
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        if self.peek() != Some(b'{') {
            return self.parse_scalar();
        }
        let mut current = self.open_table();
        let mut parents: Vec<(OpenTable, Key)> = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    let OpenTable { table, .. } = current;
                    match parents.pop() {
                        Some((mut parent, key)) => {
                            self.finish_entry(&mut parent, key, Value::Table(table))?;
                            current = parent;
                        }
                        None => return Ok(Value::Table(table)),
                    }
                }
                Some(b'[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let key = self.parse_key()?;
                    self.skip_ws();
                    self.expect(b']')?;
                    self.skip_ws();
                    self.expect(b'=')?;
                    self.skip_ws();
                    if self.peek() == Some(b'{') {
                        let child = self.open_table();
                        parents.push((std::mem::replace(&mut current, child), key));
                    } else {
                        let value = self.parse_scalar()?;
                        self.finish_entry(&mut current, key, value)?;
                    }
                }
                Some(b) => {
                    return Err(self.error(format!(
                        "expected `[` or `}}`, found `{}`",
                        describe(b)
                    )))
                }
                None => return Err(JkrError::format(current.open, "unterminated table")),
            }
        }
    }

    /// Any value other than a table.
    fn parse_scalar(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b't') => self.parse_word("true", Value::Boolean(true)),
            Some(b'f') => self.parse_word("false", Value::Boolean(false)),
            Some(b'n') => self.parse_word("nil", Value::Nil),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.parse_number().map(Value::Number),
            Some(b) => Err(self.error(format!("unexpected `{}`", describe(b)))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_word(&mut self, word: &str, value: Value) -> Result<Value> {
        let end = self.pos + word.len();
        let matches = self.src[self.pos..].starts_with(word.as_bytes());
        let boundary = !matches!(
            self.src.get(end),
            Some(b) if b.is_ascii_alphanumeric() || *b == b'_'
        );
        if matches && boundary {
            self.pos = end;
            Ok(value)
        } else {
            Err(self.error("unexpected identifier"))
        }
    }

    /// Consume the `{` under the cursor.
    fn open_table(&mut self) -> OpenTable {
        let open = self.pos;
        self.pos += 1;
        OpenTable {
            open,
            table: Table::new(),
        }
    }

    /// Store a parsed entry, then consume the separator that follows it (if any).
    fn finish_entry(&mut self, target: &mut OpenTable, key: Key, value: Value) -> Result<()> {
        if target.table.contains_key(&key) {
            tracing::warn!(%key, "duplicate key in table literal, keeping the last value");
        }
        target.table.insert(key, value);

        self.skip_ws();
        match self.peek() {
            Some(b',' | b';') => self.pos += 1,
            Some(b'}') => {}
            Some(b) => {
                return Err(self.error(format!(
                    "expected `,` or `}}`, found `{}`",
                    describe(b)
                )))
            }
            None => return Err(JkrError::format(target.open, "unterminated table")),
        }
        Ok(())
    }

    fn parse_key(&mut self) -> Result<Key> {
        match self.peek() {
            Some(b'"') => self.parse_string().map(Key::Str),
            Some(b'0'..=b'9') => {
                let start = self.pos;
                while let Some(b'0'..=b'9') = self.peek() {
                    self.pos += 1;
                }
                // Digits are ASCII, so the slice is valid UTF-8.
                let digits = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
                digits
                    .parse::<u64>()
                    .map(Key::Int)
                    .map_err(|_| JkrError::format(start, "integer key out of range"))
            }
            Some(b) => Err(self.error(format!(
                "expected integer or string key, found `{}`",
                describe(b)
            ))),
            None => Err(self.error("unexpected end of input in key")),
        }
    }

    /// Parse a double-quoted string starting at the opening quote.
    fn parse_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1;
        let mut buf = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(JkrError::format(open, "unterminated string"));
            };
            self.pos += 1;
            match b {
                b'"' => break,
                b'\\' => self.parse_escape(open, &mut buf)?,
                _ => buf.push(b),
            }
        }
        String::from_utf8(buf).map_err(|_| JkrError::format(open, "string is not valid UTF-8"))
    }

    /// Decode one escape sequence; the cursor is just past the backslash.
    fn parse_escape(&mut self, open: usize, buf: &mut Vec<u8>) -> Result<()> {
        let Some(b) = self.peek() else {
            return Err(JkrError::format(open, "unterminated string"));
        };
        self.pos += 1;
        match b {
            b'n' => buf.push(b'\n'),
            b'r' => buf.push(b'\r'),
            b't' => buf.push(b'\t'),
            b'a' => buf.push(0x07),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0c),
            b'v' => buf.push(0x0b),
            b'\\' | b'"' | b'\'' => buf.push(b),
            b'\n' | b'\r' => {
                // Backslash-newline; a CRLF or LFCR pair counts as one newline.
                if matches!(self.peek(), Some(next) if (next == b'\n' || next == b'\r') && next != b)
                {
                    self.pos += 1;
                }
                buf.push(b'\n');
            }
            b'0'..=b'9' => {
                let mut code = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'9') => {
                            code = code * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(code)
                    .map_err(|_| self.error(format!("decimal escape \\{code} is too large")))?;
                buf.push(byte);
            }
            other => {
                return Err(JkrError::format(
                    self.pos - 2,
                    format!("invalid escape `\\{}`", describe(other)),
                ))
            }
        }
        Ok(())
    }

    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E') = self.peek() {
            self.pos += 1;
        }
        let token = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => Err(JkrError::format(start, format!("number `{token}` out of range"))),
            Err(_) => Err(JkrError::format(start, format!("malformed number `{token}`"))),
        }
    }
}

/// Printable form of a byte for error messages.
fn describe(b: u8) -> String {
    if b.is_ascii_graphic() {
        (b as char).to_string()
    } else {
        format!("\\x{b:02x}")
    }
}
