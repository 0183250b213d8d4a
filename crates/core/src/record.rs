//! The canonical record shape all ingestion paths converge to.
//!
//! Records are serialised in the Elasticsearch hit layout (`_id`, `_index`,
//! `_source`) so that output written by this tool can be fed straight back
//! in as input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Index name assigned to records that did not come from a search backend.
pub const FILE_INDEX: &str = "file-logs";

/// Source key set by the batch decryptor when a record decrypted cleanly.
pub const DECRYPTED_MARKER: &str = "_decrypted";

/// Source key holding the human-readable error for a failed record.
pub const ERROR_KEY: &str = "_decryption_error";

/// One normalized log record.
///
/// Created once per input document at ingestion time; the batch decryptor
/// mutates `source` in place to attach decrypted and derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Document id — the backend id, or the positional index for file input.
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Originating index, or [`FILE_INDEX`] for file input.
    #[serde(rename = "_index", default)]
    pub index: String,

    /// The document body, keyed by field name.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl CanonicalRecord {
    /// Wrap a plain document under a positional id.
    ///
    /// A non-object document becomes `{"message": <stringified>}` rather
    /// than being rejected.
    pub fn from_document(position: usize, document: Value) -> Self {
        Self {
            id: position.to_string(),
            index: FILE_INDEX.to_owned(),
            source: source_from(document),
        }
    }

    /// Wrap a raw text line that failed JSON parsing.
    pub fn from_plain_line(position: usize, line: &str) -> Self {
        let mut source = Map::new();
        source.insert("message".to_owned(), Value::String(line.to_owned()));
        Self {
            id: position.to_string(),
            index: FILE_INDEX.to_owned(),
            source,
        }
    }

    /// Whether the batch decryptor marked this record as decrypted.
    pub fn is_decrypted(&self) -> bool {
        self.source.get(DECRYPTED_MARKER) == Some(&Value::Bool(true))
    }

    /// The decryption error attached to this record, if it failed.
    pub fn decryption_error(&self) -> Option<&str> {
        self.source.get(ERROR_KEY).and_then(Value::as_str)
    }
}

/// Turn an arbitrary document into a source map: objects pass through,
/// anything else is wrapped as a `message` string.
pub(crate) fn source_from(document: Value) -> Map<String, Value> {
    match document {
        Value::Object(map) => map,
        Value::String(s) => {
            let mut map = Map::new();
            map.insert("message".to_owned(), Value::String(s));
            map
        }
        other => {
            let mut map = Map::new();
            map.insert("message".to_owned(), Value::String(other.to_string()));
            map
        }
    }
}
