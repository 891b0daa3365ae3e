//! qkd-identity — deterministic asymmetric identity from QKD entropy.
//!
//! Two pipelines:
//! - entropy aggregation → Ed25519 key derivation → self-signed X.509
//!   certificate issuance, persisted as a PEM pair;
//! - mutually authenticated key fetching from a remote key management
//!   entity (KME), accumulating delivered key bytes into one binary
//!   stream.
//!
//! Both are strictly sequential; all unpredictability in the derivation
//! pipeline originates from the caller-supplied entropy.

pub mod accumulate;
pub mod certificate;
pub mod derivation;
pub mod entropy;
pub mod error;
pub mod fetch;
pub mod subject;

// Re-export primary types
pub use accumulate::{AccumulatedKeyStream, KeyAccumulator};
pub use certificate::{issue, IssuedCertificate};
pub use derivation::{KeyPair, SigningSeed};
pub use entropy::{aggregate, EntropyBuffer};
pub use error::{QkdError, Result, MIN_ENTROPY_BYTES};
pub use fetch::{ClientCredential, KeyFetchSession, SessionConfig};
pub use subject::{SubjectAttribute, SubjectFields, SubjectName};
