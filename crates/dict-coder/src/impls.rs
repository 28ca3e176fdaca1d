//! `Encode`/`Decode` for std, `chrono` and `indexmap` types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::{DateTime, Utc};
use dict_coder_value::Value;
use indexmap::IndexMap;

use crate::decoder::{Decode, Decoder};
use crate::encoder::{Encode, Encoder};
use crate::error::{DecodingError, EncodingError};

macro_rules! impl_leaf_coding {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
                    encoder.single()?.encode_leaf(*self)
                }
            }

            impl Decode for $ty {
                fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
                    decoder.single().decode_leaf()
                }
            }
        )*
    };
}

impl_leaf_coding!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Encode for isize {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        let wide = i64::try_from(*self).map_err(|_| EncodingError::InvalidValue {
            path: encoder.path().clone(),
            message: format!("{self} does not fit in i64"),
        })?;
        encoder.single()?.encode_leaf(wide)
    }
}

impl Decode for isize {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        let wide: i64 = decoder.single().decode_leaf()?;
        isize::try_from(wide).map_err(|_| decoder.type_mismatch("isize"))
    }
}

impl Encode for usize {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        let wide = u64::try_from(*self).map_err(|_| EncodingError::InvalidValue {
            path: encoder.path().clone(),
            message: format!("{self} does not fit in u64"),
        })?;
        encoder.single()?.encode_leaf(wide)
    }
}

impl Decode for usize {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        let wide: u64 = decoder.single().decode_leaf()?;
        usize::try_from(wide).map_err(|_| decoder.type_mismatch("usize"))
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encoder.single()?.encode_leaf(self.to_owned())
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        self.as_str().encode(encoder)
    }
}

impl Decode for String {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decoder.single().decode_leaf()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        T::decode(decoder).map(Box::new)
    }
}

// An absent optional is an explicit Null node here; keyed containers use
// `encode_if_present` to omit the key instead.
impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single()?.encode_nil(),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        if decoder.single().decode_nil() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        let mut indexed = encoder.indexed()?;
        for item in self {
            indexed.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        let mut indexed = decoder.indexed()?;
        let mut items = Vec::<T>::with_capacity(indexed.count());
        while !indexed.is_at_end() {
            items.push(indexed.decode()?);
        }
        Ok(items)
    }
}

fn encode_entries<'v, V, I>(entries: I, encoder: &mut Encoder<'_>) -> Result<(), EncodingError>
where
    V: Encode + 'v,
    I: IntoIterator<Item = (&'v String, &'v V)>,
{
    let mut keyed = encoder.keyed()?;
    for (key, value) in entries {
        keyed.encode(key, value)?;
    }
    Ok(())
}

fn decode_entries<V, C>(decoder: &Decoder<'_>) -> Result<C, DecodingError>
where
    V: Decode,
    C: FromIterator<(String, V)>,
{
    let keyed = decoder.keyed()?;
    keyed
        .keys()
        .map(|key| keyed.decode::<V>(key).map(|value| (key.to_owned(), value)))
        .collect()
}

impl<V: Encode, S> Encode for HashMap<String, V, S> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encode_entries(self, encoder)
    }
}

impl<V: Decode, S: BuildHasher + Default> Decode for HashMap<String, V, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decode_entries(decoder)
    }
}

impl<V: Encode> Encode for BTreeMap<String, V> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encode_entries(self, encoder)
    }
}

impl<V: Decode> Decode for BTreeMap<String, V> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decode_entries(decoder)
    }
}

impl<V: Encode, S> Encode for IndexMap<String, V, S> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encode_entries(self, encoder)
    }
}

impl<V: Decode, S: BuildHasher + Default> Decode for IndexMap<String, V, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decode_entries(decoder)
    }
}

/// A prebuilt subtree is copied in as-is.
impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encoder.single()?.encode_value(self.clone())
    }
}

impl Decode for Value {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        Ok(decoder.value().clone())
    }
}

impl Encode for DateTime<Utc> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encoder.encode_timestamp(self)
    }
}

impl Decode for DateTime<Utc> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decoder.decode_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DictionaryDecoder, DictionaryEncoder};

    #[test]
    fn pointer_sized_integers_use_64_bit_leaves() {
        let encoder = DictionaryEncoder::new();
        assert_eq!(encoder.encode(&7usize).unwrap(), Value::U64(7));
        assert_eq!(encoder.encode(&-7isize).unwrap(), Value::I64(-7));

        let decoder = DictionaryDecoder::new();
        assert_eq!(decoder.decode::<usize>(&Value::U64(7)).unwrap(), 7);
        assert!(decoder.decode::<usize>(&Value::U32(7)).is_err());
    }

    #[test]
    fn none_is_an_explicit_null() {
        let encoder = DictionaryEncoder::new();
        assert_eq!(encoder.encode(&None::<i8>).unwrap(), Value::Null);
        assert_eq!(encoder.encode(&Some(-1i8)).unwrap(), Value::I8(-1));
        assert_eq!(
            encoder.encode(&[Some(1u8), None]).unwrap(),
            Value::Array(vec![Value::U8(1), Value::Null])
        );
    }

    #[test]
    fn maps_keep_their_iteration_order() {
        let mut map = IndexMap::<String, u32>::new();
        map.insert("z".into(), 1);
        map.insert("a".into(), 2);

        let tree = DictionaryEncoder::new().encode(&map).unwrap();
        let keys: Vec<_> = tree.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a"]);

        let back: BTreeMap<String, u32> = DictionaryDecoder::new().decode(&tree).unwrap();
        assert_eq!(back.get("a"), Some(&2));
        let back: HashMap<String, u32> = DictionaryDecoder::new().decode(&tree).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn sequence_decode_stops_at_the_first_bad_element() {
        let tree = Value::Array(vec![Value::I16(1), Value::Str("two".into())]);
        let err = DictionaryDecoder::new().decode::<Vec<i16>>(&tree).unwrap_err();
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("/1"));
    }

    #[test]
    fn value_passes_through_untouched() {
        let tree: Value = [("k", Value::Bytes(vec![0]))].into_iter().collect();
        assert_eq!(DictionaryEncoder::new().encode(&tree).unwrap(), tree);
        assert_eq!(DictionaryDecoder::new().decode::<Value>(&tree).unwrap(), tree);
    }
}
