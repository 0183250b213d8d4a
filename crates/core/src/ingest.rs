//! Normalization of heterogeneous log inputs into [`CanonicalRecord`]s.
//!
//! Accepted shapes, detected by structural probing rather than
//! exceptions-as-control-flow:
//!
//! - a search-response envelope (`{"hits": {"hits": [...]}}` or
//!   `{"hits": [...]}`) — unwrapped to the inner hit list;
//! - an array of hit-shaped documents (elements carry `_source`) — passed
//!   through unchanged;
//! - an array of plain documents — each wrapped under its positional id;
//! - a single document — wrapped as one record with id `"0"`;
//! - NDJSON text — one record per non-blank line, used as the fallback when
//!   whole-input JSON parsing fails.
//!
//! Malformed individual elements degrade to plain-message records; only a
//! totally unreadable top-level input yields an empty sequence.

use serde_json::Value;

use crate::record::{source_from, CanonicalRecord, FILE_INDEX};

/// Normalize raw text: whole-document JSON parse first, NDJSON fallback.
pub fn normalize_text(input: &str) -> Vec<CanonicalRecord> {
    let content = input.trim();
    if content.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(content) {
        Ok(value) => normalize_value(value),
        Err(_) => normalize_lines(content),
    }
}

/// Normalize an already-parsed JSON value.
pub fn normalize_value(value: Value) -> Vec<CanonicalRecord> {
    match value {
        Value::Object(map) => {
            // An object with a recognisable hit list inside is a search
            // envelope; anything else is a single document.
            match map.get("hits").cloned().and_then(unwrap_envelope) {
                Some(list) => hits_to_records(list),
                None => vec![CanonicalRecord::from_document(0, Value::Object(map))],
            }
        }
        Value::Array(items) => {
            let hit_shaped = items
                .first()
                .and_then(Value::as_object)
                .is_some_and(|o| o.contains_key("_source"));
            if hit_shaped {
                hits_to_records(items)
            } else {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| CanonicalRecord::from_document(i, item))
                    .collect()
            }
        }
        single => vec![CanonicalRecord::from_document(0, single)],
    }
}

/// Pull the inner hit list out of a search-response `hits` value.
fn unwrap_envelope(hits: Value) -> Option<Vec<Value>> {
    match hits {
        Value::Object(mut inner) => match inner.remove("hits") {
            Some(Value::Array(list)) => Some(list),
            _ => None,
        },
        Value::Array(list) => Some(list),
        _ => None,
    }
}

fn hits_to_records(hits: Vec<Value>) -> Vec<CanonicalRecord> {
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| hit_to_record(i, hit))
        .collect()
}

/// Convert one hit-shaped document, falling back to a positional wrap for
/// anything that is not a mapping with `_source`.
fn hit_to_record(position: usize, hit: Value) -> CanonicalRecord {
    match hit {
        Value::Object(mut map) if map.contains_key("_source") => {
            let id = match map.remove("_id") {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => position.to_string(),
            };
            let index = match map.remove("_index") {
                Some(Value::String(s)) => s,
                _ => FILE_INDEX.to_owned(),
            };
            let source = source_from(map.remove("_source").unwrap_or(Value::Null));
            CanonicalRecord { id, index, source }
        }
        other => CanonicalRecord::from_document(position, other),
    }
}

/// NDJSON fallback: each non-blank line is parsed independently; a line that
/// fails to parse becomes a plain-message record rather than an error.
fn normalize_lines(content: &str) -> Vec<CanonicalRecord> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| match serde_json::from_str::<Value>(line) {
            Ok(item) => CanonicalRecord::from_document(i, item),
            Err(_) => CanonicalRecord::from_plain_line(i, line.trim()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_a_nested_search_envelope() {
        let input = json!({
            "took": 5,
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_id": "a", "_index": "app-logs", "_source": {"message": "m1"}},
                    {"_id": "b", "_index": "app-logs", "_source": {"message": "m2"}}
                ]
            }
        });
        let records = normalize_value(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].index, "app-logs");
        assert_eq!(records[1].source["message"], "m2");
    }

    #[test]
    fn hit_shaped_array_passes_through_unchanged() {
        let input = json!([
            {"_id": "x", "_index": "idx", "_source": {"k": 1}},
            {"_id": "y", "_index": "idx", "_source": {"k": 2}}
        ]);
        let records = normalize_value(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "x");
        assert_eq!(records[0].index, "idx");
        assert_eq!(records[0].source["k"], 1);
        assert_eq!(records[1].id, "y");
    }

    #[test]
    fn plain_array_gets_positional_ids() {
        let input = json!([{"message": "one"}, {"message": "two"}]);
        let records = normalize_value(input);
        assert_eq!(records[0].id, "0");
        assert_eq!(records[1].id, "1");
        assert_eq!(records[0].index, FILE_INDEX);
        assert_eq!(records[1].source["message"], "two");
    }

    #[test]
    fn non_mapping_array_elements_wrap_as_messages() {
        let records = normalize_value(json!(["raw line", 17]));
        assert_eq!(records[0].source["message"], "raw line");
        assert_eq!(records[1].source["message"], "17");
    }

    #[test]
    fn single_document_becomes_record_zero() {
        let records = normalize_value(json!({"message": "only one"}));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "0");
        assert_eq!(records[0].source["message"], "only one");
    }

    #[test]
    fn whole_json_parse_wins_over_ndjson() {
        let records = normalize_text(r#"[{"a": 1}, {"a": 2}]"#);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn ndjson_with_one_bad_line_still_yields_a_record_per_line() {
        let input = "{\"message\": \"ok\"}\nnot json at all\n{\"message\": \"also ok\"}";
        let records = normalize_text(input);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source["message"], "ok");
        assert_eq!(records[1].source["message"], "not json at all");
        assert_eq!(records[2].source["message"], "also ok");
    }

    #[test]
    fn ndjson_ids_are_line_positions() {
        // Blank lines are skipped but keep their position in the id sequence.
        let input = "{\"a\": 1}\n\n{\"a\": 2}";
        let records = normalize_text(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "0");
        assert_eq!(records[1].id, "2");
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(normalize_text("").is_empty());
        assert!(normalize_text("   \n  ").is_empty());
        assert!(normalize_value(json!([])).is_empty());
    }

    #[test]
    fn ndjson_scalar_lines_wrap_as_messages() {
        let records = normalize_text("42\n\"quoted\"");
        assert_eq!(records[0].source["message"], "42");
        assert_eq!(records[1].source["message"], "quoted");
    }
}
