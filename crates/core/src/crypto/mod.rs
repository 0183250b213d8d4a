//! Symmetric-cipher dispatch: algorithm identifiers, key resolution, and
//! blob decryption.

mod cipher;
mod keymat;
mod payload;

pub use cipher::{decrypt, encrypt};
pub use keymat::{KeyMaterial, KeyProvenance};
pub use payload::{interpret, Payload};

use std::fmt;
use std::str::FromStr;

use crate::error::DecryptError;

/// The supported algorithm identifiers, in the order they are advertised.
pub const SUPPORTED_ALGORITHMS: [&str; 4] = [
    "AES-256-CBC",
    "AES-128-CBC",
    "AES-256-GCM",
    "AES-128-GCM",
];

/// A supported cipher family.
///
/// Key, IV, and tag lengths are fully determined by the family; there is no
/// independent configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherFamily {
    Aes128Cbc,
    Aes256Cbc,
    Aes128Gcm,
    Aes256Gcm,
}

impl CipherFamily {
    /// Required key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            CipherFamily::Aes128Cbc | CipherFamily::Aes128Gcm => 16,
            CipherFamily::Aes256Cbc | CipherFamily::Aes256Gcm => 32,
        }
    }

    /// IV/nonce length in bytes: 16 for CBC, 12 for GCM.
    pub fn iv_len(self) -> usize {
        if self.is_cbc() {
            16
        } else {
            12
        }
    }

    /// Authentication tag length in bytes: 0 for CBC, 16 for GCM.
    pub fn tag_len(self) -> usize {
        if self.is_cbc() {
            0
        } else {
            16
        }
    }

    /// Whether this family uses CBC mode (as opposed to GCM).
    pub fn is_cbc(self) -> bool {
        matches!(self, CipherFamily::Aes128Cbc | CipherFamily::Aes256Cbc)
    }

    /// The canonical string identifier, as consumed from configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            CipherFamily::Aes128Cbc => "AES-128-CBC",
            CipherFamily::Aes256Cbc => "AES-256-CBC",
            CipherFamily::Aes128Gcm => "AES-128-GCM",
            CipherFamily::Aes256Gcm => "AES-256-GCM",
        }
    }
}

impl fmt::Display for CipherFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherFamily {
    type Err = DecryptError;

    /// Parse a configuration identifier. Case-sensitive exact match; no
    /// aliasing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES-128-CBC" => Ok(CipherFamily::Aes128Cbc),
            "AES-256-CBC" => Ok(CipherFamily::Aes256Cbc),
            "AES-128-GCM" => Ok(CipherFamily::Aes128Gcm),
            "AES-256-GCM" => Ok(CipherFamily::Aes256Gcm),
            other => Err(DecryptError::UnsupportedAlgorithm(
                other.to_owned(),
                SUPPORTED_ALGORITHMS.join(", "),
            )),
        }
    }
}
