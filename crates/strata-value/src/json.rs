//! Adapter between [`TreeValue`] and `serde_json::Value`.
//!
//! JSON has no temporal, pattern, callable, or absence kinds. Going out,
//! temporal values become RFC 3339 strings, patterns their source text, and
//! callables and `Undefined` become `null` (undefined mapping entries are
//! dropped). Non-finite numbers also become `null`.

use serde_json::{Map, Number, Value};

use crate::value::{Mapping, TreeValue};

impl From<Value> for TreeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::from(items.into_iter().map(Self::from).collect::<Vec<_>>()),
            Value::Object(map) => Self::from(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

impl From<&TreeValue> for Value {
    fn from(value: &TreeValue) -> Self {
        value.to_json()
    }
}

impl TreeValue {
    /// Render this tree as JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined | Self::Null | Self::Callable(_) => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Temporal(t) => Value::String(t.to_rfc3339()),
            Self::Pattern(p) => Value::String(p.as_str().to_string()),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Mapping(map) => Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Integral values inside the `i64` range are written without a fraction.
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Pattern;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn json_object_becomes_mapping() {
        let v = TreeValue::from(json!({"a": 1, "b": [true, null, "x"]}));
        assert!(v.is_mapping());
        assert_eq!(v.get("a"), Some(&TreeValue::from(1)));
        let b = v.get("b").and_then(TreeValue::as_sequence).unwrap();
        assert_eq!(b.len(), 3);
        assert!(matches!(b[1], TreeValue::Null));
    }

    #[test]
    fn integers_render_without_fraction() {
        assert_eq!(TreeValue::from(3).to_json(), json!(3));
        assert_eq!(TreeValue::from(2.5).to_json(), json!(2.5));
        assert_eq!(TreeValue::from(-0.0).to_json(), json!(0));
    }

    #[test]
    fn non_finite_numbers_render_as_null() {
        assert_eq!(TreeValue::from(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(TreeValue::from(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn leaves_without_json_kind() {
        let t = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(TreeValue::from(t).to_json(), json!("1970-01-01T00:00:00+00:00"));
        assert_eq!(
            TreeValue::from(Pattern::new("^a$").unwrap()).to_json(),
            json!("^a$")
        );
        assert_eq!(TreeValue::Undefined.to_json(), Value::Null);
    }

    #[test]
    fn undefined_entries_are_dropped() {
        let v = TreeValue::mapping([("a", TreeValue::Undefined), ("b", TreeValue::from(1))]);
        assert_eq!(v.to_json(), json!({"b": 1}));
    }

    #[test]
    fn json_roundtrip_keeps_structure() {
        let doc = json!({"svc": {"ports": [80, 443], "tls": false, "name": "api"}});
        assert_eq!(TreeValue::from(doc.clone()).to_json(), doc);
    }
}
