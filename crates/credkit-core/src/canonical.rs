//! Canonical JSON encoding and content digests.
//!
//! This module implements a JCS-style deterministic encoding:
//! - Object keys sorted by byte comparison, regardless of insertion order
//! - Numbers rendered through `serde_json::Number` (one spelling per value)
//! - Strings with minimal escaping
//! - Explicit `null` preserved, never dropped
//! - No insignificant whitespace
//!
//! The canonical encoding is critical: it ensures that the same document
//! produces identical bytes (and thus identical digests and signatures)
//! regardless of how it was assembled.

use multibase::Base;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Default ceiling for canonical output, a DoS defense for
/// attacker-supplied documents.
pub const MAX_CANONICAL_BYTES: usize = 1 << 20;

/// Encode a document to canonical bytes with the default size limit.
pub fn canonicalize(value: &Value) -> Result<Vec<u8>, CoreError> {
    canonicalize_with_limit(value, MAX_CANONICAL_BYTES)
}

/// Encode a document to canonical bytes, failing with `SizeExceeded` once
/// the output grows past `limit`.
pub fn canonicalize_with_limit(value: &Value, limit: usize) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value, limit)?;
    Ok(buf)
}

/// Compute the content digest of a document:
/// `multibase(base58btc, sha256(canonical-bytes))`.
pub fn digest(value: &Value) -> Result<String, CoreError> {
    let bytes = canonicalize(value)?;
    Ok(digest_bytes(&bytes))
}

/// Digest raw bytes into the multibase fingerprint form.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    multibase::encode(Base::Base58Btc, hash)
}

fn write_value(buf: &mut Vec<u8>, value: &Value, limit: usize) -> Result<(), CoreError> {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => {
            if n.as_f64().is_some_and(|f| !f.is_finite()) {
                return Err(CoreError::UnsupportedValue(
                    "non-finite number".to_string(),
                ));
            }
            buf.extend_from_slice(n.to_string().as_bytes());
        }
        Value::String(s) => write_string(buf, s),
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item, limit)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            // Sort keys by byte comparison; input insertion order is irrelevant.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                // map.keys() came from map, so indexing back cannot miss.
                write_value(buf, &map[key.as_str()], limit)?;
            }
            buf.push(b'}');
        }
    }

    if buf.len() > limit {
        return Err(CoreError::SizeExceeded {
            limit,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Write a JSON string with minimal escaping.
fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\x08' => buf.extend_from_slice(b"\\b"),
            '\x0c' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                buf.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
    buf.push(b'"');
}
