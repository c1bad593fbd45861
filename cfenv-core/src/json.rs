//! Null-safe reads over `serde_json::Value`.
//!
//! Environment metadata is frequently partial, so none of these helpers
//! fail: a missing key or a value of the wrong type reads as `None` or
//! an empty collection.

use serde_json::{Map, Value};

/// Parse raw JSON text. Returns `None` when `raw` is not valid JSON.
pub fn parse(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Strings held in `json[field]`.
///
/// Empty unless the field is an array whose elements are all strings.
pub fn string_array(json: &Value, field: &str) -> Vec<String> {
    json.get(field)
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default()
}

/// `json[field]` when it is a string.
pub fn string_field(json: &Value, field: &str) -> Option<String> {
    json.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// `json[field]` when it is an integer that fits in `i64`.
pub fn int_field(json: &Value, field: &str) -> Option<i64> {
    json.get(field).and_then(Value::as_i64)
}

/// `json[field]` when it is an object.
pub fn object_field<'a>(json: &'a Value, field: &str) -> Option<&'a Map<String, Value>> {
    json.get(field).and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_rejects_invalid_text() {
        assert!(parse("{ not json").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn parse_accepts_scalars() {
        assert_eq!(parse("42"), Some(json!(42)));
        assert_eq!(parse("null"), Some(Value::Null));
    }

    #[test]
    fn string_array_reads_strings_in_order() {
        let v = json!({"tags": ["a", "b", "c"]});
        assert_eq!(string_array(&v, "tags"), vec!["a", "b", "c"]);
    }

    #[test]
    fn string_array_missing_or_wrong_type_is_empty() {
        let v = json!({"tags": "a", "n": null});
        assert!(string_array(&v, "tags").is_empty());
        assert!(string_array(&v, "n").is_empty());
        assert!(string_array(&v, "absent").is_empty());
        assert!(string_array(&json!([1, 2]), "tags").is_empty());
    }

    #[test]
    fn string_array_with_mixed_elements_is_empty() {
        let v = json!({"tags": ["a", 1, null, "b"]});
        assert!(string_array(&v, "tags").is_empty());
    }

    #[test]
    fn string_array_of_empty_array_is_empty() {
        assert!(string_array(&json!({"tags": []}), "tags").is_empty());
    }

    #[test]
    fn int_field_rejects_floats_and_strings() {
        let v = json!({"a": 1, "b": 1.5, "c": "1"});
        assert_eq!(int_field(&v, "a"), Some(1));
        assert_eq!(int_field(&v, "b"), None);
        assert_eq!(int_field(&v, "c"), None);
    }

    #[test]
    fn object_field_only_matches_objects() {
        let v = json!({"o": {"k": 1}, "a": []});
        assert_eq!(object_field(&v, "o").map(|m| m.len()), Some(1));
        assert!(object_field(&v, "a").is_none());
        assert!(string_field(&v, "o").is_none());
    }
}
