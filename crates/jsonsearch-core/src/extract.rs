//! Flattening of parsed JSON documents into their string leaves.

use serde_json::Value;

/// Collects every string leaf of `value`, depth-first, in document order.
///
/// Object values are visited in key insertion order and array elements in
/// index order. Numbers, booleans and nulls contribute nothing.
pub fn extract_strings(value: &Value) -> Vec<&str> {
    let mut out = Vec::new();
    collect(value, &mut out);
    out
}

fn collect<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
        Value::String(s) => out.push(s),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_other_than_strings_are_dropped() {
        let v = json!({"a": 1, "b": true, "c": null, "d": 2.5, "e": "kept"});
        assert_eq!(extract_strings(&v), vec!["kept"]);
    }

    #[test]
    fn nested_values_follow_key_order() {
        let v: Value = serde_json::from_str(
            r#"{"z": "first", "a": {"y": ["second", {"b": "third"}]}, "m": "fourth"}"#,
        )
        .unwrap();
        assert_eq!(extract_strings(&v), vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn bare_string_document() {
        assert_eq!(extract_strings(&json!("just text")), vec!["just text"]);
    }
}
