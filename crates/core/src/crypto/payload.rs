//! Best-effort interpretation of decrypted plaintext.

use serde_json::Value;

use crate::error::DecryptError;

/// Outcome of interpreting decrypted bytes.
///
/// Downstream consumers must handle both cases explicitly; this is a
/// heuristic duality, not a schema check.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The plaintext parsed as JSON (any syntactically valid value, including
    /// a bare number or string).
    Structured(Value),
    /// The plaintext was valid UTF-8 but not valid JSON.
    Text(String),
}

impl Payload {
    /// Convert into a JSON value for attachment to a record source.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Structured(v) => v,
            Payload::Text(s) => Value::String(s),
        }
    }
}

/// Decode plaintext as UTF-8, then attempt a JSON parse.
///
/// # Errors
///
/// Returns [`DecryptError::InvalidEncoding`] if the bytes are not valid UTF-8.
pub fn interpret(plaintext: &[u8]) -> Result<Payload, DecryptError> {
    let text = std::str::from_utf8(plaintext).map_err(|_| DecryptError::InvalidEncoding)?;
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(Payload::Structured(value)),
        Err(_) => Ok(Payload::Text(text.to_owned())),
    }
}
