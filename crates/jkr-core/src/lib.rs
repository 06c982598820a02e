//! # jkr-core
//!
//! Pure-Rust encoder and decoder for Balatro's **`.jkr`** save files (`meta.jkr`,
//! `profile.jkr`).
//!
//! A `.jkr` file is raw DEFLATE around a table literal such as
//! `return {["unlocked"]={["j_joker"]=true,},[1]=5,}`. This crate converts those bytes
//! to and from plain JSON, keeping the difference between integer keys (`[1]`) and
//! string keys (`["1"]`) through a reversible key-tagging convention.
//!
//! ## Quick start
//!
//! ```rust
//! use jkr_core::{from_jkr, to_jkr};
//! use serde_json::json;
//!
//! let meta = json!({"unlocked": {"j_joker": true}, "discovered": {}, "alerted": {}});
//! let bytes = to_jkr(&meta).unwrap();
//! assert_eq!(from_jkr(&bytes).unwrap(), meta);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! to_jkr:   JSON → keys::encode_keys → Value → serializer → text → container::compress
//! from_jkr: bytes → container::decompress → text → parser → Value → keys::decode_keys → JSON
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value`/`Key`/`Table` tree
//! - [`serializer`] — `Value` → table literal text
//! - [`parser`] — table literal text → `Value`
//! - [`container`] — text ⇄ raw-deflate bytes
//! - [`keys`] — integer-key tagging and JSON ⇄ `Value` bridging
//! - [`transport`] — base64 envelope for text channels
//! - [`kind`] — meta/profile detection
//! - [`error`] — error types

pub mod container;
pub mod error;
pub mod keys;
pub mod kind;
pub mod parser;
pub mod serializer;
pub mod transport;
pub mod value;

pub use container::{compress, decompress};
pub use error::{JkrError, Result};
pub use keys::{decode_keys, encode_keys, KEY_TAG};
pub use kind::SaveKind;
pub use parser::deserialize;
pub use serializer::{serialize, SerializeOptions, StringStyle};
pub use transport::JkrPayload;
pub use value::{Key, Table, Value};

use serde_json::Value as JsonValue;

/// Options for [`to_jkr_with`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub serialize: SerializeOptions,
    /// DEFLATE level, 0–9.
    pub level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            serialize: SerializeOptions::default(),
            level: container::DEFAULT_LEVEL,
        }
    }
}

/// Encode a plain JSON value as `.jkr` bytes.
///
/// Object keys that spell a non-negative integer (`"0"`, `"12"`) are written as
/// integer keys; all other keys as string keys. Arrays become sequence tables.
pub fn to_jkr(json: &JsonValue) -> Result<Vec<u8>> {
    to_jkr_with(json, &EncodeOptions::default())
}

/// Like [`to_jkr`], with explicit options.
pub fn to_jkr_with(json: &JsonValue, options: &EncodeOptions) -> Result<Vec<u8>> {
    let tagged = encode_keys(json)?;
    let value = Value::from_tagged_json(&tagged);
    let text = serializer::serialize_with(&value, &options.serialize)?;
    container::compress_with_level(&text, options.level)
}

/// Decode `.jkr` bytes into a plain JSON value.
///
/// Integer keys come back as their decimal digits. Fails without partial output on
/// any container, text or key-tagging error.
pub fn from_jkr(bytes: &[u8]) -> Result<JsonValue> {
    let text = decompress(bytes)?;
    let value = deserialize(&text)?;
    decode_keys(value.to_tagged_json()?)
}

/// Encode a JSON string as `.jkr` bytes.
pub fn json_to_jkr(json: &str) -> Result<Vec<u8>> {
    let value: JsonValue = serde_json::from_str(json)?;
    to_jkr(&value)
}

/// Decode `.jkr` bytes into compact JSON text. Use `serde_json::to_string_pretty` on
/// [`from_jkr`]'s result if human-readable JSON is needed.
pub fn jkr_to_json(bytes: &[u8]) -> Result<String> {
    Ok(serde_json::to_string(&from_jkr(bytes)?)?)
}
