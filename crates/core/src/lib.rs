//! Decryption and log-normalization engine for `loggenie`.
//!
//! The engine is synchronous and free of I/O: callers hand it raw documents
//! (parsed JSON or NDJSON text) and a key string, and get back canonical
//! records with decrypted fields attached. Pipeline stages:
//!
//! 1. [`crypto::CipherFamily`] — algorithm identifier and key/IV/tag geometry.
//! 2. [`crypto::KeyMaterial`] — hex / base64 / passphrase key resolution.
//! 3. [`crypto::decrypt`] — per-blob CBC or GCM decryption.
//! 4. [`crypto::interpret`] — best-effort JSON interpretation of plaintext.
//! 5. [`ingest`] — normalization of heterogeneous inputs into [`CanonicalRecord`]s.
//! 6. [`batch`] — per-record decryption with failure isolation.

pub mod batch;
pub mod crypto;
pub mod error;
pub mod ingest;
pub mod record;

pub use error::DecryptError;
pub use record::CanonicalRecord;
