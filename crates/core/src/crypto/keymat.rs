//! Key-material resolution: turn a user-supplied key string into raw key
//! bytes of the length the chosen cipher family requires.
//!
//! Resolution is an ordered list of strategies, first match wins:
//!
//! 1. hex, if it decodes to exactly the required length;
//! 2. base64, if it decodes to exactly the required length;
//! 3. passphrase — unsalted single-iteration SHA-256 digest, truncated to
//!    16 bytes for the 128-bit families.
//!
//! The passphrase branch is preserved for compatibility with existing
//! producers; it is weak key derivation and is surfaced as such via
//! [`KeyProvenance::Passphrase`] so callers can warn.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use super::CipherFamily;
use crate::error::DecryptError;

/// How a key string was interpreted during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyProvenance {
    /// The string was a hex encoding of the raw key bytes.
    Hex,
    /// The string was a base64 encoding of the raw key bytes.
    Base64,
    /// The string was hashed with SHA-256 to derive the key.
    Passphrase,
}

/// Resolved key bytes for one cipher family.
///
/// The buffer is zeroed when dropped, and `Debug` never prints the bytes.
pub struct KeyMaterial {
    bytes: Vec<u8>,
    provenance: KeyProvenance,
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        write!(f, "KeyMaterial([REDACTED], {:?})", self.provenance)
    }
}

impl KeyMaterial {
    /// Resolve a user-supplied key string against a cipher family.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptError::InvalidKeyMaterial`] only on an internal
    /// invariant violation (the digest branch producing the wrong length);
    /// every well-formed string resolves through one of the three branches.
    pub fn resolve(raw_key: &str, family: CipherFamily) -> Result<Self, DecryptError> {
        let want = family.key_len();

        if let Ok(bytes) = hex::decode(raw_key) {
            if bytes.len() == want {
                return Ok(Self {
                    bytes,
                    provenance: KeyProvenance::Hex,
                });
            }
        }

        if let Ok(bytes) = STANDARD.decode(raw_key) {
            if bytes.len() == want {
                return Ok(Self {
                    bytes,
                    provenance: KeyProvenance::Base64,
                });
            }
        }

        let digest = Sha256::digest(raw_key.as_bytes());
        if digest.len() < want {
            return Err(DecryptError::InvalidKeyMaterial(format!(
                "derived digest is {} bytes, need {want}",
                digest.len()
            )));
        }
        Ok(Self {
            bytes: digest[..want].to_vec(),
            provenance: KeyProvenance::Passphrase,
        })
    }

    /// The raw key bytes, exactly `family.key_len()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Which resolution branch produced these bytes.
    pub fn provenance(&self) -> KeyProvenance {
        self.provenance
    }
}
