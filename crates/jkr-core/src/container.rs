//! The `.jkr` container: raw (headerless) DEFLATE around UTF-8 table literal text.
//!
//! There is no magic number, zlib header or length prefix. Compression defaults to
//! the fast level, which is what the game and the web editor both write; any level
//! produces a stream the inflater accepts.

use crate::error::{JkrError, Result};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Compression level used by [`compress`].
pub const DEFAULT_LEVEL: u32 = 1;

/// Compress table literal text into `.jkr` bytes at the fast level.
pub fn compress(text: &str) -> Result<Vec<u8>> {
    compress_with_level(text, DEFAULT_LEVEL)
}

/// Compress with an explicit level, clamped to `0..=9`.
pub fn compress_with_level(text: &str, level: u32) -> Result<Vec<u8>> {
    let level = level.min(9);
    let mut encoder = DeflateEncoder::new(
        Vec::with_capacity((text.len() / 4).max(64)),
        Compression::new(level),
    );
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| JkrError::Codec(e.to_string()))?;
    let bytes = encoder
        .finish()
        .map_err(|e| JkrError::Codec(e.to_string()))?;
    tracing::debug!(
        text_bytes = text.len(),
        compressed_bytes = bytes.len(),
        level,
        "compressed table literal"
    );
    Ok(bytes)
}

/// Inflate `.jkr` bytes back into table literal text.
///
/// The stream must run to its final block: empty, corrupt or truncated input fails
/// with [`JkrError::Codec`] instead of yielding partial text. Bytes after the end of
/// the stream are ignored.
pub fn decompress(bytes: &[u8]) -> Result<String> {
    let inflated = inflate(bytes)?;
    let text = String::from_utf8(inflated)?;
    tracing::debug!(
        compressed_bytes = bytes.len(),
        text_bytes = text.len(),
        "decompressed table literal"
    );
    Ok(text)
}

fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(4).max(1024));
    loop {
        let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&bytes[before_in as usize..], &mut out, FlushDecompress::Finish)
            .map_err(|e| JkrError::Codec(e.to_string()))?;
        if status == Status::StreamEnd {
            break;
        }
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
            continue;
        }
        let progressed = inflater.total_in() != before_in || inflater.total_out() != before_out;
        if !progressed || inflater.total_in() as usize >= bytes.len() {
            return Err(JkrError::Codec(
                "deflate stream ended before its final block".to_string(),
            ));
        }
    }

    let trailing = bytes.len() - inflater.total_in() as usize;
    if trailing > 0 {
        tracing::warn!(trailing, "ignoring bytes after the end of the deflate stream");
    }
    Ok(out)
}
