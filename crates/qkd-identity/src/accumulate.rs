//! Key-delivery response parsing and byte accumulation.
//!
//! The KME answers each request with a JSON body of the shape
//! `{"keys": [{"key": "<base64>"}]}`. Parsing is a typed
//! parse-then-validate step: a body that is not JSON at all is a
//! [`QkdError::MalformedResponse`], while valid JSON of any other shape
//! contributes zero items (deliberate leniency matching the wire
//! contract). A malformed base64 item aborts the whole batch, keeping
//! delivery all-or-nothing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{QkdError, Result};

/// Expected response shape. Unknown fields are ignored; a missing
/// `keys` array is an empty delivery.
#[derive(Debug, Default, Deserialize)]
struct KeyDelivery {
    #[serde(default)]
    keys: Vec<KeyItem>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyItem {
    #[serde(default)]
    key: Option<String>,
}

/// Accumulates decoded key bytes across the bounded request loop, in
/// request order then item order within a response.
#[derive(Default)]
pub struct KeyAccumulator {
    bytes: Vec<u8>,
}

impl KeyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one response body and append its decoded key bytes.
    ///
    /// `attempt` is the 1-based request index, used for diagnostics.
    /// Returns the number of items extracted from this response. Items
    /// with a missing or empty `key` field contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns `QkdError::MalformedResponse` if the body is not JSON,
    /// or `QkdError::Decoding` (with attempt and item indices) on a
    /// malformed base64 item.
    pub fn absorb(&mut self, attempt: usize, body: &str) -> Result<usize> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| QkdError::MalformedResponse {
                attempt,
                reason: e.to_string(),
            })?;

        // Any JSON that does not match the delivery shape is treated as
        // an empty delivery, not a hard failure.
        let delivery: KeyDelivery = serde_json::from_value(value).unwrap_or_default();

        let mut extracted = 0;
        for (i, item) in delivery.keys.iter().enumerate() {
            let Some(encoded) = item.key.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };

            let decoded =
                base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded)
                    .map_err(|e| QkdError::Decoding {
                        context: format!("response {attempt} item {}", i + 1),
                        reason: e.to_string(),
                    })?;

            log::info!(
                "[{attempt}] extracted key item {} ({} bytes)",
                i + 1,
                decoded.len()
            );
            self.bytes.extend_from_slice(&decoded);
            extracted += 1;
        }

        Ok(extracted)
    }

    /// Total bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Finish accumulation, yielding the ordered byte stream.
    pub fn into_stream(self) -> AccumulatedKeyStream {
        AccumulatedKeyStream { bytes: self.bytes }
    }
}

/// The final concatenated key stream, persisted verbatim with no
/// framing, headers or length prefixes.
pub struct AccumulatedKeyStream {
    bytes: Vec<u8>,
}

impl AccumulatedKeyStream {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the stream to `path`.
    ///
    /// # Errors
    ///
    /// Returns `QkdError::Persistence` if the file cannot be written.
    pub fn persist(&self, path: &Path) -> Result<PathBuf> {
        std::fs::write(path, &self.bytes).map_err(|source| QkdError::Persistence {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_order_preserving() {
        // Items [a, b] then [c] must concatenate as a+b+c.
        let a = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"alpha");
        let b = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"beta");
        let c = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"gamma");

        let mut acc = KeyAccumulator::new();
        let first = format!(r#"{{"keys":[{{"key":"{a}"}},{{"key":"{b}"}}]}}"#);
        let second = format!(r#"{{"keys":[{{"key":"{c}"}}]}}"#);

        assert_eq!(acc.absorb(1, &first).unwrap(), 2);
        assert_eq!(acc.absorb(2, &second).unwrap(), 1);

        assert_eq!(acc.into_stream().as_bytes(), b"alphabetagamma");
    }

    #[test]
    fn test_absorb_known_byte_values() {
        // "AAAA" -> 3 zero bytes, "AQID" -> 0x01 0x02 0x03.
        let mut acc = KeyAccumulator::new();
        acc.absorb(1, r#"{"keys":[{"key":"AAAA"}]}"#).unwrap();
        acc.absorb(2, r#"{"keys":[{"key":"AQID"}]}"#).unwrap();

        let stream = acc.into_stream();
        assert_eq!(stream.as_bytes(), &[0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(stream.len(), 6);
    }

    #[test]
    fn test_empty_object_contributes_nothing() {
        let mut acc = KeyAccumulator::new();
        assert_eq!(acc.absorb(1, "{}").unwrap(), 0);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_unexpected_shape_contributes_nothing() {
        let mut acc = KeyAccumulator::new();
        assert_eq!(acc.absorb(1, r#"{"keys": "not-an-array"}"#).unwrap(), 0);
        assert_eq!(acc.absorb(2, r#"[1, 2, 3]"#).unwrap(), 0);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_missing_or_empty_key_skipped() {
        let mut acc = KeyAccumulator::new();
        let body = r#"{"keys":[{"key":""},{"other":1},{"key":"AAAA"}]}"#;
        assert_eq!(acc.absorb(1, body).unwrap(), 1);
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn test_non_json_is_malformed_response() {
        let mut acc = KeyAccumulator::new();
        let result = acc.absorb(3, "<html>oops</html>");
        assert!(matches!(
            result,
            Err(QkdError::MalformedResponse { attempt: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_item_aborts_with_indices() {
        let mut acc = KeyAccumulator::new();
        let body = r#"{"keys":[{"key":"AAAA"},{"key":"!!bad!!"}]}"#;
        match acc.absorb(2, body) {
            Err(QkdError::Decoding { context, .. }) => {
                assert_eq!(context, "response 2 item 2");
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected Decoding error"),
        }
    }

    #[test]
    fn test_persist_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.bin");

        let mut acc = KeyAccumulator::new();
        acc.absorb(1, r#"{"keys":[{"key":"AQID"}]}"#).unwrap();
        acc.into_stream().persist(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x01, 0x02, 0x03]);
    }
}
