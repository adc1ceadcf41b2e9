//! Conversion from serde_json values into Value.

use crate::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    // Fallback for very large numbers
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers() {
        let value = Value::from(json!({"integer": 42, "float": 2.75, "negative": -100}));
        match value {
            Value::Map(map) => {
                assert_eq!(map.get("integer"), Some(&Value::Integer(42)));
                assert_eq!(map.get("negative"), Some(&Value::Integer(-100)));
                if let Some(Value::Float(f)) = map.get("float") {
                    assert!((f - 2.75).abs() < 0.001);
                } else {
                    panic!("expected float");
                }
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn json_array_and_object() {
        let value = Value::from(json!([1, "two", true, null]));
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Integer(1),
                Value::from("two"),
                Value::Bool(true),
                Value::Null
            ])
        );
    }
}
