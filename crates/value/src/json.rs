//! Conversions between [`Value`] and [`serde_json::Value`].
//!
//! JSON has a single number type, so the bridge is lossy in one direction:
//! integers come back as `I64`/`U64`, floats as `Double`, and byte blobs are
//! rendered as standard base64 strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::Value;

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => arr.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::I8(i) => serde_json::json!(i),
            Value::I16(i) => serde_json::json!(i),
            Value::I32(i) => serde_json::json!(i),
            Value::I64(i) => serde_json::json!(i),
            Value::U8(u) => serde_json::json!(u),
            Value::U16(u) => serde_json::json!(u),
            Value::U32(u) => serde_json::json!(u),
            Value::U64(u) => serde_json::json!(u),
            // Non-finite floats have no JSON form and become null.
            Value::Float(f) => serde_json::json!(f),
            Value::Double(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Bytes(b) => serde_json::Value::String(STANDARD.encode(b)),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
