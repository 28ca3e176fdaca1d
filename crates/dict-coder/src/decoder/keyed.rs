use std::any::type_name;

use dict_coder_value::{Leaf, Map, Value};

use super::{type_mismatch, Decode, Decoder, IndexedDecoder};
use crate::error::DecodingError;
use crate::options::CodingOptions;
use crate::path::{CodingPath, BASE_KEY};

/// Read-only view of a map node.
#[derive(Debug, Clone)]
pub struct KeyedDecoder<'a> {
    path: CodingPath,
    map: &'a Map,
    options: &'a CodingOptions,
}

impl<'a> KeyedDecoder<'a> {
    pub(super) fn new(path: CodingPath, map: &'a Map, options: &'a CodingOptions) -> Self {
        Self { path, map, options }
    }

    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `true` when `key` is present, even if it holds `Null`.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// `true` when `key` holds `Null`. A missing key is an error.
    pub fn decode_nil(&self, key: &str) -> Result<bool, DecodingError> {
        Ok(self.entry(key, "null")?.is_null())
    }

    pub fn decode_leaf<T: Leaf>(&self, key: &str) -> Result<T, DecodingError> {
        let value = self.entry(key, T::KIND.as_str())?;
        T::from_value(value)
            .ok_or_else(|| type_mismatch(T::KIND.as_str(), value, &self.path.child(key)))
    }

    pub fn decode<T: Decode>(&self, key: &str) -> Result<T, DecodingError> {
        T::decode(&self.child(key, type_name::<T>())?)
    }

    /// Absent keys and `Null` entries both read as `None`.
    pub fn decode_if_present<T: Decode>(&self, key: &str) -> Result<Option<T>, DecodingError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.decode(key).map(Some),
        }
    }

    /// Child context for the node at `key`.
    pub fn decoder(&self, key: &str) -> Result<Decoder<'a>, DecodingError> {
        self.child(key, "value")
    }

    pub fn nested_keyed(&self, key: &str) -> Result<KeyedDecoder<'a>, DecodingError> {
        self.child(key, "map")?.keyed()
    }

    pub fn nested_indexed(&self, key: &str) -> Result<IndexedDecoder<'a>, DecodingError> {
        self.child(key, "array")?.indexed()
    }

    /// Context for the base representation stored under [`BASE_KEY`].
    pub fn base_decoder(&self) -> Result<Decoder<'a>, DecodingError> {
        self.decoder(BASE_KEY)
    }

    /// Context for a base representation stored under an explicit key.
    pub fn base_decoder_for_key(&self, key: &str) -> Result<Decoder<'a>, DecodingError> {
        self.decoder(key)
    }

    fn child(&self, key: &str, expected: &'static str) -> Result<Decoder<'a>, DecodingError> {
        let value = self.entry(key, expected)?;
        Ok(Decoder::new(self.path.child(key), value, self.options))
    }

    fn entry(&self, key: &str, expected: &'static str) -> Result<&'a Value, DecodingError> {
        self.map.get(key).ok_or_else(|| DecodingError::ValueNotFound {
            expected,
            path: self.path.child(key),
        })
    }
}
