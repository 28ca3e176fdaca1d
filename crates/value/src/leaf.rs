//! Exact-width scalar conversions.
//!
//! One generic trait replaces a family of per-width accessors: every scalar
//! type converts into its own [`Value`] tag and reads back only from that tag.

use crate::{Value, ValueKind};

/// A scalar that is stored as a single, dedicated [`Value`] tag.
pub trait Leaf: Sized {
    /// The tag this type is stored under.
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// Extracts the scalar if `value` carries exactly [`Leaf::KIND`].
    ///
    /// No widening or coercion: an `I32(1)` does not read as `i64`.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_copy_leaf {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Leaf for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_copy_leaf! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => Float,
    f64 => Double,
}

impl Leaf for String {
    const KIND: ValueKind = ValueKind::Str;

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl Leaf for Vec<u8> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}
