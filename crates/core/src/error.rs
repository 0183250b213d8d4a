//! Error taxonomy shared by every stage of the decryption engine.

use thiserror::Error;

/// Errors produced while resolving key material or decrypting a blob.
///
/// Configuration-time variants ([`DecryptError::InvalidKeyMaterial`],
/// [`DecryptError::UnsupportedAlgorithm`]) apply to every record and should
/// abort a run before batch processing starts. The remaining variants are
/// per-blob classifications that the batch layer recovers from locally.
#[derive(Debug, Error)]
pub enum DecryptError {
    /// The supplied key string could not be turned into key material of the
    /// length the cipher family requires.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The algorithm identifier is not one of the supported families.
    #[error("unsupported algorithm: {0}. Supported: {1}")]
    UnsupportedAlgorithm(String, String),

    /// The ciphertext blob is not valid base64, or is too short to contain
    /// the IV/tag segments its family requires.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// CBC unpadding failed — typically a wrong key or corrupted ciphertext.
    #[error("invalid PKCS#7 padding (wrong key or corrupted ciphertext)")]
    PaddingError,

    /// GCM tag verification failed — tampering, wrong key, or wrong framing.
    #[error("authentication failed (wrong key, tampered data, or bad IV/tag framing)")]
    AuthenticationFailure,

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted data is not valid UTF-8")]
    InvalidEncoding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let e = DecryptError::MalformedCiphertext("bad base64".into());
        assert!(e.to_string().contains("bad base64"));
    }

    #[test]
    fn unsupported_algorithm_lists_supported_set() {
        let e = DecryptError::UnsupportedAlgorithm(
            "DES".into(),
            "AES-256-CBC, AES-128-CBC".into(),
        );
        let msg = e.to_string();
        assert!(msg.contains("DES"));
        assert!(msg.contains("AES-256-CBC"));
    }
}
