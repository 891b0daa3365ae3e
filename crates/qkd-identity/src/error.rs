//! Error types for qkd-identity.
//!
//! All errors are strongly typed and propagated without panicking.
//! Every variant carries enough context (fragment index, attempt index,
//! file path) to diagnose a failure without re-running. Private key
//! material and raw entropy never appear in error messages.

use std::path::PathBuf;

/// Minimum number of entropy bytes required to derive a signing seed.
pub const MIN_ENTROPY_BYTES: usize = 32;

/// Error types covering both pipelines.
#[derive(Debug, thiserror::Error)]
pub enum QkdError {
    #[error("invalid base64 in {context}: {reason}")]
    Decoding { context: String, reason: String },

    #[error("insufficient entropy: need at least {MIN_ENTROPY_BYTES} bytes, got {actual}")]
    InsufficientEntropy { actual: usize },

    #[error("at least one subject attribute (such as --CN) must be provided")]
    EmptySubject,

    #[error("entropy buffer too short for a signing seed: need {MIN_ENTROPY_BYTES} bytes, got {actual}")]
    InvalidSeed { actual: usize },

    #[error("certificate signing failed: {0}")]
    Signing(String),

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    CredentialRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("private key decryption failed: {0}")]
    KeyDecryption(String),

    #[error("session setup failed: {0}")]
    Session(String),

    #[error("request {attempt} failed: {reason}")]
    Fetch { attempt: usize, reason: String },

    #[error("response {attempt} is not valid JSON: {reason}")]
    MalformedResponse { attempt: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, QkdError>;
