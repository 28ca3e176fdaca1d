use std::any::type_name;

use dict_coder_value::{Leaf, Value};

use super::{type_mismatch, Decode, Decoder, KeyedDecoder};
use crate::error::DecodingError;
use crate::options::CodingOptions;
use crate::path::CodingPath;

/// Sequential view of an array node.
///
/// Every successful read moves [`Self::current_index`] forward by one; a
/// failed read leaves it where it was.
#[derive(Debug, Clone)]
pub struct IndexedDecoder<'a> {
    path: CodingPath,
    items: &'a [Value],
    options: &'a CodingOptions,
    current_index: usize,
}

impl<'a> IndexedDecoder<'a> {
    pub(super) fn new(path: CodingPath, items: &'a [Value], options: &'a CodingOptions) -> Self {
        Self {
            path,
            items,
            options,
            current_index: 0,
        }
    }

    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Consumes the next element only if it is `Null`.
    pub fn decode_nil(&mut self) -> Result<bool, DecodingError> {
        let is_null = self.entry("null")?.is_null();
        if is_null {
            self.current_index += 1;
        }
        Ok(is_null)
    }

    pub fn decode_leaf<T: Leaf>(&mut self) -> Result<T, DecodingError> {
        let value = self.entry(T::KIND.as_str())?;
        let leaf = T::from_value(value).ok_or_else(|| {
            type_mismatch(
                T::KIND.as_str(),
                value,
                &self.path.child(self.current_index),
            )
        })?;
        self.current_index += 1;
        Ok(leaf)
    }

    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodingError> {
        let decoded = T::decode(&self.child(type_name::<T>())?)?;
        self.current_index += 1;
        Ok(decoded)
    }

    /// Child context for the next element.
    pub fn decoder(&mut self) -> Result<Decoder<'a>, DecodingError> {
        let decoder = self.child("value")?;
        self.current_index += 1;
        Ok(decoder)
    }

    pub fn nested_keyed(&mut self) -> Result<KeyedDecoder<'a>, DecodingError> {
        let keyed = self.child("map")?.keyed()?;
        self.current_index += 1;
        Ok(keyed)
    }

    pub fn nested_indexed(&mut self) -> Result<IndexedDecoder<'a>, DecodingError> {
        let indexed = self.child("array")?.indexed()?;
        self.current_index += 1;
        Ok(indexed)
    }

    /// Context for a base representation stored as the next element.
    pub fn base_decoder(&mut self) -> Result<Decoder<'a>, DecodingError> {
        self.decoder()
    }

    fn child(&self, expected: &'static str) -> Result<Decoder<'a>, DecodingError> {
        let value = self.entry(expected)?;
        Ok(Decoder::new(
            self.path.child(self.current_index),
            value,
            self.options,
        ))
    }

    fn entry(&self, expected: &'static str) -> Result<&'a Value, DecodingError> {
        self.items
            .get(self.current_index)
            .ok_or_else(|| DecodingError::ValueNotFound {
                expected,
                path: self.path.child(self.current_index),
            })
    }
}
