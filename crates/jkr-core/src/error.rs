//! Error types for JKR encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur while converting between JSON and `.jkr` bytes.
#[derive(Error, Debug)]
pub enum JkrError {
    /// The table literal text was malformed (missing `return`, unexpected token,
    /// unterminated string or table). `offset` is the byte offset into the text.
    #[error("table literal error at byte {offset}: {message}")]
    Format { offset: usize, message: String },

    /// The byte buffer was not a complete raw-deflate stream.
    #[error("deflate error: {0}")]
    Codec(String),

    /// The inflated bytes were not valid UTF-8.
    #[error("invalid UTF-8 in inflated data: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// A key would be ambiguous under the integer-key tagging convention.
    #[error("key {key:?} collides with the reserved integer-key tag")]
    KeyTagCollision { key: String },

    /// A number that neither the table dialect nor JSON can carry (NaN, ±inf).
    #[error("number {0} cannot be represented")]
    UnrepresentableNumber(f64),

    /// The input string was not valid JSON (string entry points only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A transport payload was not valid base64.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl JkrError {
    pub(crate) fn format(offset: usize, message: impl Into<String>) -> Self {
        JkrError::Format {
            offset,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout jkr-core.
pub type Result<T> = std::result::Result<T, JkrError>;
