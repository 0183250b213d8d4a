//! Blob decryption and (for fixture generation) encryption.
//!
//! Wire layout of a blob, always base64-encoded at rest:
//!
//! - CBC: `IV(16) || ciphertext`, PKCS#7-padded.
//! - GCM: `IV(12) || TAG(16) || ciphertext`.
//!
//! A legacy producer format `base64(IV):base64(ciphertext)` is also accepted
//! for CBC, detected by the presence of exactly one `:` separator before any
//! whole-blob decode is attempted.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes_gcm::{
    aead::{generic_array::GenericArray, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    Aes128Gcm, Aes256Gcm,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{CipherFamily, KeyMaterial};
use crate::error::DecryptError;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

const CBC_BLOCK: usize = 16;

/// Decrypt a single base64-encoded blob into plaintext bytes.
///
/// Pure and deterministic: any failure is a terminal classification of this
/// one blob, never a transient condition.
///
/// # Errors
///
/// - [`DecryptError::MalformedCiphertext`] — bad base64 or wrong segment lengths.
/// - [`DecryptError::PaddingError`] — CBC unpad failure.
/// - [`DecryptError::AuthenticationFailure`] — GCM tag mismatch.
pub fn decrypt(
    blob: &str,
    key: &KeyMaterial,
    family: CipherFamily,
) -> Result<Vec<u8>, DecryptError> {
    let key_bytes = checked_key(key, family)?;
    let raw = decode_blob(blob, family)?;

    if family.is_cbc() {
        let (iv, ciphertext) = split_cbc(&raw)?;
        match family {
            CipherFamily::Aes128Cbc => Aes128CbcDec::new_from_slices(key_bytes, iv)
                .map_err(internal_length_error)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| DecryptError::PaddingError),
            CipherFamily::Aes256Cbc => Aes256CbcDec::new_from_slices(key_bytes, iv)
                .map_err(internal_length_error)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| DecryptError::PaddingError),
            _ => unreachable!("is_cbc checked above"),
        }
    } else {
        let (nonce, tag, ciphertext) = split_gcm(&raw)?;
        let mut buf = ciphertext.to_vec();
        let verify = match family {
            CipherFamily::Aes128Gcm => Aes128Gcm::new_from_slice(key_bytes)
                .map_err(internal_length_error)?
                .decrypt_in_place_detached(
                    GenericArray::from_slice(nonce),
                    b"",
                    &mut buf,
                    GenericArray::from_slice(tag),
                ),
            CipherFamily::Aes256Gcm => Aes256Gcm::new_from_slice(key_bytes)
                .map_err(internal_length_error)?
                .decrypt_in_place_detached(
                    GenericArray::from_slice(nonce),
                    b"",
                    &mut buf,
                    GenericArray::from_slice(tag),
                ),
            _ => unreachable!("is_cbc checked above"),
        };
        verify.map_err(|_| DecryptError::AuthenticationFailure)?;
        Ok(buf)
    }
}

/// Encrypt plaintext into a base64 blob in the standard wire layout, using a
/// random IV/nonce. The counterpart to [`decrypt`]; used for producing
/// fixtures and round-trip tests.
///
/// # Errors
///
/// Returns [`DecryptError::InvalidKeyMaterial`] if the key length does not
/// match the family.
pub fn encrypt(
    plaintext: &[u8],
    key: &KeyMaterial,
    family: CipherFamily,
) -> Result<String, DecryptError> {
    let key_bytes = checked_key(key, family)?;

    let mut iv = vec![0u8; family.iv_len()];
    OsRng.fill_bytes(&mut iv);

    let raw = if family.is_cbc() {
        let ciphertext = match family {
            CipherFamily::Aes128Cbc => Aes128CbcEnc::new_from_slices(key_bytes, &iv)
                .map_err(internal_length_error)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherFamily::Aes256Cbc => Aes256CbcEnc::new_from_slices(key_bytes, &iv)
                .map_err(internal_length_error)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            _ => unreachable!(),
        };
        let mut raw = iv;
        raw.extend_from_slice(&ciphertext);
        raw
    } else {
        let mut buf = plaintext.to_vec();
        let tag = match family {
            CipherFamily::Aes128Gcm => Aes128Gcm::new_from_slice(key_bytes)
                .map_err(internal_length_error)?
                .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buf),
            CipherFamily::Aes256Gcm => Aes256Gcm::new_from_slice(key_bytes)
                .map_err(internal_length_error)?
                .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buf),
            _ => unreachable!(),
        }
        .map_err(|_| {
            DecryptError::InvalidKeyMaterial("AEAD encryption failed".into())
        })?;
        let mut raw = iv;
        raw.extend_from_slice(&tag);
        raw.extend_from_slice(&buf);
        raw
    };

    Ok(STANDARD.encode(raw))
}

/// Decode a blob to raw bytes, handling the legacy `base64(IV):base64(ct)`
/// two-part layout for CBC families.
fn decode_blob(blob: &str, family: CipherFamily) -> Result<Vec<u8>, DecryptError> {
    if family.is_cbc() {
        let mut parts = blob.split(':');
        if let (Some(iv_part), Some(ct_part), None) = (parts.next(), parts.next(), parts.next()) {
            // Exactly one separator: legacy two-part layout.
            let mut raw = STANDARD.decode(iv_part).map_err(|e| {
                DecryptError::MalformedCiphertext(format!("legacy IV segment: {e}"))
            })?;
            raw.extend(STANDARD.decode(ct_part).map_err(|e| {
                DecryptError::MalformedCiphertext(format!("legacy ciphertext segment: {e}"))
            })?);
            return Ok(raw);
        }
    }
    STANDARD
        .decode(blob)
        .map_err(|e| DecryptError::MalformedCiphertext(format!("invalid base64: {e}")))
}

fn split_cbc(raw: &[u8]) -> Result<(&[u8], &[u8]), DecryptError> {
    if raw.len() < CBC_BLOCK {
        return Err(DecryptError::MalformedCiphertext(format!(
            "blob is {} bytes, too short for a {CBC_BLOCK}-byte IV",
            raw.len()
        )));
    }
    let (iv, ciphertext) = raw.split_at(CBC_BLOCK);
    if ciphertext.is_empty() || ciphertext.len() % CBC_BLOCK != 0 {
        return Err(DecryptError::MalformedCiphertext(format!(
            "CBC ciphertext is {} bytes, not a positive multiple of the block size",
            ciphertext.len()
        )));
    }
    Ok((iv, ciphertext))
}

fn split_gcm(raw: &[u8]) -> Result<(&[u8], &[u8], &[u8]), DecryptError> {
    const NONCE: usize = 12;
    const TAG: usize = 16;
    if raw.len() < NONCE + TAG {
        return Err(DecryptError::MalformedCiphertext(format!(
            "blob is {} bytes, too short for a {NONCE}-byte IV and {TAG}-byte tag",
            raw.len()
        )));
    }
    let (nonce, rest) = raw.split_at(NONCE);
    let (tag, ciphertext) = rest.split_at(TAG);
    Ok((nonce, tag, ciphertext))
}

fn checked_key<'a>(
    key: &'a KeyMaterial,
    family: CipherFamily,
) -> Result<&'a [u8], DecryptError> {
    let bytes = key.as_bytes();
    if bytes.len() != family.key_len() {
        return Err(DecryptError::InvalidKeyMaterial(format!(
            "key is {} bytes, {} requires {}",
            bytes.len(),
            family,
            family.key_len()
        )));
    }
    Ok(bytes)
}

// Key and IV lengths are validated before the cipher is constructed, so a
// length error out of the cipher crates is an internal invariant violation.
fn internal_length_error<E: std::fmt::Debug>(e: E) -> DecryptError {
    DecryptError::InvalidKeyMaterial(format!("cipher rejected key/IV length: {e:?}"))
}
