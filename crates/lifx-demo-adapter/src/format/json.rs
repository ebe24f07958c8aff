/*
[INPUT]:  Strings or JSON values that may hold stringified (even twice) JSON
[OUTPUT]: Materialized JSON structures
[POS]:    Format layer - lenient JSON unwrapping for log payloads
[UPDATE]: When unwrapping rules or the depth limit change
*/

use serde_json::{Map, Value};
use thiserror::Error;

/// Nesting beyond this depth is left as is
pub const MAX_PARSE_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("JSON nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Parse `s` as JSON, unwrapping one extra level of stringification.
///
/// If the first parse yields a string, that string is parsed again; if the
/// second parse fails the first result is returned. If the first parse
/// fails the input comes back as a JSON string.
pub fn smart_json_parse(s: &str) -> Value {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(inner),
        },
        Ok(parsed) => parsed,
        Err(_) => Value::String(s.to_string()),
    }
}

/// Recursively replace JSON-in-a-string with the structure it encodes.
///
/// Strings are unwrapped until they stop changing, which makes the function
/// idempotent. Content nested deeper than [`MAX_PARSE_DEPTH`] is returned
/// untouched.
pub fn deep_json_parse(value: &Value) -> Value {
    match walk(value, 0, false) {
        Ok(parsed) => parsed,
        // lenient walks never fail
        Err(_) => value.clone(),
    }
}

/// Like [`deep_json_parse`] but reports inputs nested beyond the limit
pub fn try_deep_json_parse(value: &Value) -> Result<Value, FormatError> {
    walk(value, 0, true)
}

fn walk(value: &Value, depth: usize, strict: bool) -> Result<Value, FormatError> {
    if depth > MAX_PARSE_DEPTH {
        return if strict {
            Err(FormatError::DepthExceeded {
                limit: MAX_PARSE_DEPTH,
            })
        } else {
            Ok(value.clone())
        };
    }

    match value {
        Value::String(s) => {
            let parsed = smart_json_parse(s);
            match &parsed {
                Value::String(p) if p == s => Ok(parsed),
                _ => walk(&parsed, depth + 1, strict),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| walk(item, depth + 1, strict))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(object) => {
            let mut result = Map::with_capacity(object.len());
            for (key, item) in object {
                result.insert(key.clone(), walk(item, depth + 1, strict)?);
            }
            Ok(Value::Object(result))
        }
        _ => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_smart_parse_plain_json() {
        assert_eq!(smart_json_parse(r#"{"key": "value"}"#), json!({"key": "value"}));
    }

    #[test]
    fn test_smart_parse_double_stringified() {
        let once = serde_json::to_string(&json!({"key": "value"})).unwrap();
        let twice = serde_json::to_string(&once).unwrap();
        assert_eq!(smart_json_parse(&twice), json!({"key": "value"}));
    }

    #[test]
    fn test_smart_parse_string_literal_that_is_not_json() {
        assert_eq!(smart_json_parse(r#""hello""#), json!("hello"));
    }

    #[rstest]
    #[case("not json")]
    #[case("{broken")]
    #[case("")]
    fn test_smart_parse_returns_input_on_failure(#[case] input: &str) {
        assert_eq!(smart_json_parse(input), Value::String(input.to_string()));
    }

    #[test]
    fn test_deep_parse_nested_fields() {
        let value = json!({
            "data": "{\"nested\": \"value\"}",
            "array": ["{\"item\": 1}", "plain string"],
            "number": 42
        });

        assert_eq!(
            deep_json_parse(&value),
            json!({
                "data": {"nested": "value"},
                "array": [{"item": 1}, "plain string"],
                "number": 42
            })
        );
    }

    #[test]
    fn test_deep_parse_unwraps_inner_stringified_layers() {
        let inner = serde_json::to_string(&json!({"message": "ok"})).unwrap();
        let middle = serde_json::to_string(&json!({"text": inner})).unwrap();
        let outer = json!({ "output": middle });

        assert_eq!(
            deep_json_parse(&outer),
            json!({"output": {"text": {"message": "ok"}}})
        );
    }

    #[rstest]
    #[case(json!({"a": "{\"b\": \"[1, \\\"2\\\"]\"}"}))]
    #[case(json!(["\"\\\"true\\\"\"", "x", null, 3.5]))]
    #[case(json!("\"{\\\"k\\\": \\\"{\\\\\\\"deep\\\\\\\": 1}\\\"}\""))]
    fn test_deep_parse_is_idempotent(#[case] value: Value) {
        let once = deep_json_parse(&value);
        let twice = deep_json_parse(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!("leaf");
        for _ in 0..(MAX_PARSE_DEPTH + 5) {
            value = json!([value]);
        }

        assert_eq!(
            try_deep_json_parse(&value),
            Err(FormatError::DepthExceeded {
                limit: MAX_PARSE_DEPTH
            })
        );
        assert_eq!(deep_json_parse(&value), value);
    }
}
