//! Per-record decryption over a collection of canonical records.
//!
//! Failures never cross the batch boundary: each record carries its own
//! outcome, and one corrupted blob leaves the remaining records untouched.

use serde_json::Value;
use tracing::{debug, warn};

use crate::crypto::{self, CipherFamily, KeyMaterial};
use crate::error::DecryptError;
use crate::record::{CanonicalRecord, DECRYPTED_MARKER, ERROR_KEY};

/// Aggregate counts derived from a processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records where the encrypted field was present.
    pub attempted: usize,
    /// Records decrypted and interpreted cleanly.
    pub succeeded: usize,
    /// Records annotated with a decryption error.
    pub failed: usize,
    /// Records where the encrypted field was absent.
    pub missing_field: usize,
}

/// Decrypt `source[field]` across a batch of records, in place.
///
/// For each record:
///
/// - field absent: the record is left unmodified (warning, not failure);
/// - success: the interpreted value is stored under `decrypted_<field>`, the
///   original blob under `encrypted_<field>`, and the record is marked with
///   [`DECRYPTED_MARKER`];
/// - failure: the error message is stored under [`ERROR_KEY`] and processing
///   continues with the next record.
///
/// Record order is preserved. Counts are derived afterwards by scanning the
/// records, see [`summarize`].
pub fn decrypt_batch(
    records: &mut [CanonicalRecord],
    field: &str,
    key: &KeyMaterial,
    family: CipherFamily,
) {
    for record in records.iter_mut() {
        let Some(encrypted) = record.source.get(field) else {
            warn!(id = %record.id, field, "field not found in record");
            continue;
        };

        let outcome = match encrypted {
            Value::String(blob) => decrypt_one(blob, key, family),
            _ => Err(DecryptError::MalformedCiphertext(
                "field value is not a string".into(),
            )),
        };

        match outcome {
            Ok((blob, value)) => {
                record
                    .source
                    .insert(format!("encrypted_{field}"), Value::String(blob));
                record.source.insert(format!("decrypted_{field}"), value);
                record
                    .source
                    .insert(DECRYPTED_MARKER.to_owned(), Value::Bool(true));
            }
            Err(e) => {
                debug!(id = %record.id, error = %e, "record failed to decrypt");
                record
                    .source
                    .insert(ERROR_KEY.to_owned(), Value::String(e.to_string()));
            }
        }
    }
}

fn decrypt_one(
    blob: &str,
    key: &KeyMaterial,
    family: CipherFamily,
) -> Result<(String, Value), DecryptError> {
    let plaintext = crypto::decrypt(blob, key, family)?;
    let payload = crypto::interpret(&plaintext)?;
    Ok((blob.to_owned(), payload.into_value()))
}

/// Derive aggregate counts by scanning processed records.
pub fn summarize(records: &[CanonicalRecord]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for record in records {
        if record.is_decrypted() {
            summary.attempted += 1;
            summary.succeeded += 1;
        } else if record.decryption_error().is_some() {
            summary.attempted += 1;
            summary.failed += 1;
        } else {
            summary.missing_field += 1;
        }
    }
    summary
}
