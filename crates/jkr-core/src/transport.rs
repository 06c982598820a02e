//! Base64 envelope for carrying `.jkr` bytes over text-only channels such as an HTTP
//! JSON body.
//!
//! ```json
//! {"jkr_content": "<standard base64 of the .jkr bytes>", "encoding": "base64"}
//! ```
//!
//! `encoding` may be omitted on the way in, in which case the content is still read
//! as standard base64. The transform is exact: `payload.to_bytes()` returns the bytes
//! the payload was built from.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// How `jkr_content` is encoded. Base64 is the only supported encoding; anything
/// else is rejected when the payload is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    Base64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JkrPayload {
    pub jkr_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<PayloadEncoding>,
}

impl JkrPayload {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            jkr_content: to_base64(bytes),
            encoding: Some(PayloadEncoding::Base64),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        from_base64(&self.jkr_content)
    }
}

/// Standard (padded) base64 of `bytes`.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64, ignoring surrounding whitespace.
pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}
