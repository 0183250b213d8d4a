//! End-to-end pipeline scenarios against fixed, precomputed ciphertext
//! vectors: normalize → resolve key → decrypt batch → scan outcomes.

use serde_json::json;

use loggenie_core::batch::{decrypt_batch, summarize};
use loggenie_core::crypto::{self, CipherFamily, KeyMaterial, KeyProvenance, Payload};
use loggenie_core::error::DecryptError;
use loggenie_core::ingest::{normalize_text, normalize_value};

// "hello" under AES-256-CBC, key = 32 zero bytes, IV = 16 zero bytes.
const CBC256_ZERO_HELLO: &str = "AAAAAAAAAAAAAAAAAAAAAMI13iTSOeA8yON3xgT8pns=";
// The same ciphertext in the legacy base64(IV):base64(ct) layout.
const CBC256_ZERO_HELLO_LEGACY: &str = "AAAAAAAAAAAAAAAAAAAAAA==:wjXeJNI54DzI43fGBPymew==";
// {"user":"alice","action":"login"} under AES-256-GCM, zero key, zero nonce.
const GCM256_JSON: &str =
    "AAAAAAAAAAAAAAAA/Q0wTrLkBI/bObXgapVOSLWFNU4oEklUJS+putmWvzRQAWC+XslEVuuAmeESb1usoA==";
// Same JSON payload under AES-128-CBC, key = 16 x 0x0A, IV = 00..0f.
const CBC128_JSON: &str =
    "AAECAwQFBgcICQoLDA0OD+AW3UHX/dO4RTNRDh/t/93uJwUkT60qvhzthvoP1hra3CoRSJt/dhb12GDNlSiZBw==";
// "hello world" under AES-256-CBC with the key sha256("correct horse"), IV = 16 x 0x42.
const CBC256_PASSPHRASE: &str = "QkJCQkJCQkJCQkJCQkJCQgCuEsi9BupP53X2URNapd0=";
// "42" under AES-128-GCM, key = 16 x 0x0B, nonce = 12 x 0x07.
const GCM128_NUM: &str = "BwcHBwcHBwcHBwcHhx8AN7XKEg6gZBcFvpmK7gm9";
// Invalid UTF-8 (0xFF 0xFE) under AES-256-CBC, zero key and IV.
const CBC256_BAD_UTF8: &str = "AAAAAAAAAAAAAAAAAAAAABHc7lrh0nv4m/nSl2btomc=";

fn zero_key() -> KeyMaterial {
    KeyMaterial::resolve(&"00".repeat(32), CipherFamily::Aes256Cbc).unwrap()
}

#[test]
fn fixed_cbc_vector_decrypts_with_the_zero_key() {
    let plain = crypto::decrypt(CBC256_ZERO_HELLO, &zero_key(), CipherFamily::Aes256Cbc).unwrap();
    assert_eq!(plain, b"hello");
}

#[test]
fn fixed_cbc_vector_fails_padding_with_the_ones_key() {
    let wrong = KeyMaterial::resolve(&"01".repeat(32), CipherFamily::Aes256Cbc).unwrap();
    assert!(matches!(
        crypto::decrypt(CBC256_ZERO_HELLO, &wrong, CipherFamily::Aes256Cbc),
        Err(DecryptError::PaddingError)
    ));
}

#[test]
fn legacy_two_part_vector_matches_the_packed_layout() {
    let plain =
        crypto::decrypt(CBC256_ZERO_HELLO_LEGACY, &zero_key(), CipherFamily::Aes256Cbc).unwrap();
    assert_eq!(plain, b"hello");
}

#[test]
fn fixed_gcm_vector_decrypts_and_interprets_as_json() {
    let key = KeyMaterial::resolve(&"00".repeat(32), CipherFamily::Aes256Gcm).unwrap();
    let plain = crypto::decrypt(GCM256_JSON, &key, CipherFamily::Aes256Gcm).unwrap();
    let payload = crypto::interpret(&plain).unwrap();
    assert_eq!(
        payload,
        Payload::Structured(json!({"user": "alice", "action": "login"}))
    );
}

#[test]
fn fixed_gcm_vector_rejects_the_wrong_key() {
    let wrong = KeyMaterial::resolve(&"01".repeat(32), CipherFamily::Aes256Gcm).unwrap();
    assert!(matches!(
        crypto::decrypt(GCM256_JSON, &wrong, CipherFamily::Aes256Gcm),
        Err(DecryptError::AuthenticationFailure)
    ));
}

#[test]
fn aes_128_cbc_vector_with_hex_key() {
    let key = KeyMaterial::resolve(&"0a".repeat(16), CipherFamily::Aes128Cbc).unwrap();
    assert_eq!(key.provenance(), KeyProvenance::Hex);
    let plain = crypto::decrypt(CBC128_JSON, &key, CipherFamily::Aes128Cbc).unwrap();
    assert_eq!(plain, br#"{"user":"alice","action":"login"}"#);
}

#[test]
fn aes_128_gcm_vector_with_hex_key_interprets_bare_number() {
    let key = KeyMaterial::resolve(&"0b".repeat(16), CipherFamily::Aes128Gcm).unwrap();
    let plain = crypto::decrypt(GCM128_NUM, &key, CipherFamily::Aes128Gcm).unwrap();
    assert_eq!(crypto::interpret(&plain).unwrap(), Payload::Structured(json!(42)));
}

#[test]
fn passphrase_key_decrypts_a_passphrase_produced_vector() {
    let key = KeyMaterial::resolve("correct horse", CipherFamily::Aes256Cbc).unwrap();
    assert_eq!(key.provenance(), KeyProvenance::Passphrase);
    let plain = crypto::decrypt(CBC256_PASSPHRASE, &key, CipherFamily::Aes256Cbc).unwrap();
    assert_eq!(plain, b"hello world");
}

#[test]
fn non_utf8_plaintext_is_an_encoding_failure() {
    let plain = crypto::decrypt(CBC256_BAD_UTF8, &zero_key(), CipherFamily::Aes256Cbc).unwrap();
    assert!(matches!(
        crypto::interpret(&plain),
        Err(DecryptError::InvalidEncoding)
    ));
}

#[test]
fn envelope_to_batch_end_to_end() {
    let envelope = json!({
        "took": 2,
        "hits": {
            "hits": [
                {"_id": "a", "_index": "app-logs", "_source": {"message": CBC256_ZERO_HELLO}},
                {"_id": "b", "_index": "app-logs", "_source": {"message": "corrupted!!"}},
                {"_id": "c", "_index": "app-logs", "_source": {"note": "no encrypted field"}}
            ]
        }
    });

    let mut records = normalize_value(envelope);
    assert_eq!(records.len(), 3);

    decrypt_batch(&mut records, "message", &zero_key(), CipherFamily::Aes256Cbc);

    assert!(records[0].is_decrypted());
    assert_eq!(records[0].source["decrypted_message"], json!("hello"));
    assert!(records[1].decryption_error().is_some());
    assert!(!records[2].is_decrypted());
    assert!(records[2].decryption_error().is_none());

    let summary = summarize(&records);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.missing_field, 1);
}

#[test]
fn ndjson_file_to_batch_end_to_end() {
    let input = format!(
        "{}\nnot json\n{}",
        json!({"message": CBC256_ZERO_HELLO}),
        json!({"message": CBC256_ZERO_HELLO_LEGACY})
    );

    let mut records = normalize_text(&input);
    assert_eq!(records.len(), 3);

    decrypt_batch(&mut records, "message", &zero_key(), CipherFamily::Aes256Cbc);

    assert_eq!(records[0].source["decrypted_message"], json!("hello"));
    // The plain-text line has no decryptable field value; "not json" is not
    // base64, so it annotates as a failure rather than aborting.
    assert!(records[1].decryption_error().is_some());
    assert_eq!(records[2].source["decrypted_message"], json!("hello"));
}
