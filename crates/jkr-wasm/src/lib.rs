//! WASM bindings for jkr-core.
//!
//! Lets a browser save editor convert `.jkr` files locally instead of posting them to
//! a server. Exposes `to_jkr`, `from_jkr` and `detect_kind` as `#[wasm_bindgen]`
//! functions; byte buffers cross the boundary as `Uint8Array`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p jkr-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/jkr_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Encode a JSON string into `.jkr` bytes.
///
/// Returns a `Uint8Array`, or throws a JS error if the input is not valid JSON or
/// uses a reserved key.
#[wasm_bindgen]
pub fn to_jkr(json: &str) -> std::result::Result<Vec<u8>, JsValue> {
    jkr_core::json_to_jkr(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode `.jkr` bytes into compact JSON text.
///
/// Throws a JS error if the bytes are not a valid save file.
#[wasm_bindgen]
pub fn from_jkr(bytes: &[u8]) -> std::result::Result<String, JsValue> {
    jkr_core::jkr_to_json(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify decoded JSON as `"meta"` or `"profile"`; `undefined` if neither.
#[wasm_bindgen]
pub fn detect_kind(json: &str) -> std::result::Result<Option<String>, JsValue> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(jkr_core::SaveKind::detect(&value).map(|k| k.to_string()))
}
