//! Entropy aggregation from externally supplied QKD key fragments.
//!
//! The QKD source delivers key material as base64-encoded fragments.
//! Aggregation decodes each fragment and concatenates the bytes in the
//! order the fragments were supplied; the result feeds signing-seed
//! derivation. No randomness is introduced here.

use zeroize::{Zeroize, Zeroizing};

use crate::error::{QkdError, Result, MIN_ENTROPY_BYTES};

/// Ordered byte buffer formed by decoding and concatenating QKD key
/// fragments. Holds sensitive material; zeroized on drop.
pub struct EntropyBuffer {
    bytes: Vec<u8>,
}

impl EntropyBuffer {
    /// Number of aggregated bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the aggregated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for EntropyBuffer {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Decode each base64 fragment and concatenate in supplied order.
///
/// Identical input sequences always yield byte-identical buffers.
///
/// # Errors
///
/// Returns `QkdError::Decoding` (with the 1-based fragment index) on
/// malformed base64, or `QkdError::InsufficientEntropy` if the
/// concatenation is shorter than [`MIN_ENTROPY_BYTES`].
pub fn aggregate(fragments: &[String]) -> Result<EntropyBuffer> {
    // Accumulate in a zeroizing holder so partially decoded entropy is
    // overwritten on every exit path, including early error returns.
    let mut bytes = Zeroizing::new(Vec::new());

    for (i, fragment) in fragments.iter().enumerate() {
        let mut decoded =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, fragment).map_err(
                |e| QkdError::Decoding {
                    context: format!("key fragment {}", i + 1),
                    reason: e.to_string(),
                },
            )?;
        bytes.append(&mut decoded);
    }

    if bytes.len() < MIN_ENTROPY_BYTES {
        return Err(QkdError::InsufficientEntropy {
            actual: bytes.len(),
        });
    }

    Ok(EntropyBuffer {
        bytes: std::mem::take(&mut *bytes),
    })
}
