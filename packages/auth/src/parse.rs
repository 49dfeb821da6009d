//! Storage reader: the only place raw stored text becomes a value.

use serde_json::Value;

/// Parse a raw stored payload. Absent, empty, malformed and `null` payloads
/// all read as `None`.
pub fn safe_parse(raw: Option<&str>) -> Option<Value> {
    let raw = raw.filter(|raw| !raw.is_empty())?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!("ignoring malformed stored payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_payloads_read_as_none() {
        for raw in ["", "{", "not json", "{'a': 1}", "[1, 2", "undefined", "\u{0}"] {
            assert_eq!(safe_parse(Some(raw)), None, "{raw:?}");
        }
        assert_eq!(safe_parse(None), None);
        assert_eq!(safe_parse(Some("null")), None);
    }

    #[test]
    fn test_well_formed_payloads() {
        assert_eq!(safe_parse(Some(r#"{"a":1}"#)), Some(json!({"a": 1})));
        assert_eq!(safe_parse(Some("7")), Some(json!(7)));
    }
}
