//! Leaf conversion matrix: every scalar owns exactly one tag.

use dict_coder_value::{Leaf, Value, ValueKind};
use proptest::prelude::*;

fn samples() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Bool(false),
        Value::I8(1),
        Value::I16(1),
        Value::I32(1),
        Value::I64(1),
        Value::U8(1),
        Value::U16(1),
        Value::U32(1),
        Value::U64(1),
        Value::Float(1.0),
        Value::Double(1.0),
        Value::Str("1".into()),
        Value::Bytes(vec![1]),
        Value::Array(vec![]),
        Value::Map(Default::default()),
    ]
}

fn accepted_by<T: Leaf>() -> Vec<ValueKind> {
    samples()
        .iter()
        .filter(|value| T::from_value(value).is_some())
        .map(Value::kind)
        .collect()
}

#[test]
fn each_leaf_accepts_only_its_own_tag() {
    assert_eq!(accepted_by::<bool>(), [ValueKind::Bool]);
    assert_eq!(accepted_by::<i8>(), [ValueKind::I8]);
    assert_eq!(accepted_by::<i16>(), [ValueKind::I16]);
    assert_eq!(accepted_by::<i32>(), [ValueKind::I32]);
    assert_eq!(accepted_by::<i64>(), [ValueKind::I64]);
    assert_eq!(accepted_by::<u8>(), [ValueKind::U8]);
    assert_eq!(accepted_by::<u16>(), [ValueKind::U16]);
    assert_eq!(accepted_by::<u32>(), [ValueKind::U32]);
    assert_eq!(accepted_by::<u64>(), [ValueKind::U64]);
    assert_eq!(accepted_by::<f32>(), [ValueKind::Float]);
    assert_eq!(accepted_by::<f64>(), [ValueKind::Double]);
    assert_eq!(accepted_by::<String>(), [ValueKind::Str]);
    assert_eq!(accepted_by::<Vec<u8>>(), [ValueKind::Bytes]);
}

#[test]
fn kind_names_are_stable() {
    let names: Vec<_> = samples().iter().map(|v| v.kind().as_str()).collect();
    assert_eq!(
        names,
        [
            "null", "bool", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64",
            "string", "bytes", "array", "map",
        ]
    );
}

proptest! {
    #[test]
    fn json_bridge_keeps_integers(i in any::<i64>(), u in (i64::MAX as u64 + 1)..=u64::MAX) {
        let json = serde_json::json!([i, u]);
        let value = Value::from(json.clone());
        prop_assert_eq!(&value, &Value::Array(vec![Value::I64(i), Value::U64(u)]));
        prop_assert_eq!(serde_json::Value::from(value), json);
    }

    #[test]
    fn leaf_conversion_is_lossless(s in ".*", n in any::<u32>()) {
        prop_assert_eq!(String::from_value(&s.clone().into_value()), Some(s));
        prop_assert_eq!(u32::from_value(&Value::from(n)), Some(n));
    }
}
