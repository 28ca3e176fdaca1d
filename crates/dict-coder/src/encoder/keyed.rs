use dict_coder_value::{Leaf, Map, Value};

use super::{Encode, Encoder, IndexedEncoder};
use crate::error::EncodingError;
use crate::options::CodingOptions;
use crate::path::{CodingPath, BASE_KEY};

/// Map-shaped container. Writing a key twice keeps the last value.
#[derive(Debug)]
pub struct KeyedEncoder<'e> {
    path: &'e CodingPath,
    options: &'e CodingOptions,
    map: &'e mut Map,
}

impl<'e> KeyedEncoder<'e> {
    pub(super) fn new(path: &'e CodingPath, options: &'e CodingOptions, map: &'e mut Map) -> Self {
        Self { path, options, map }
    }

    pub fn path(&self) -> &CodingPath {
        self.path
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn encode_nil(&mut self, key: &str) {
        self.map.insert(key.to_owned(), Value::Null);
    }

    pub fn encode_leaf<T: Leaf>(&mut self, key: &str, value: T) {
        self.map.insert(key.to_owned(), value.into_value());
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), EncodingError> {
        self.encode_with(key, |encoder| value.encode(encoder))
    }

    /// Like [`Self::encode`], but leaves the key out entirely for `None`.
    pub fn encode_if_present<T: Encode>(
        &mut self,
        key: &str,
        value: &Option<T>,
    ) -> Result<(), EncodingError> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// Runs `f` against a child encoder at `key` and stores what it builds.
    pub fn encode_with<F>(&mut self, key: &str, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<(), EncodingError>,
    {
        let mut child = Encoder::new(self.path.child(key), self.options);
        f(&mut child)?;
        self.map.insert(key.to_owned(), child.into_value());
        Ok(())
    }

    pub fn nested_keyed<F>(&mut self, key: &str, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut KeyedEncoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(key, |encoder| f(&mut encoder.keyed()?))
    }

    pub fn nested_indexed<F>(&mut self, key: &str, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut IndexedEncoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(key, |encoder| f(&mut encoder.indexed()?))
    }

    /// Encodes a base representation under [`BASE_KEY`].
    ///
    /// A field of the same name is overwritten; prefer
    /// [`Self::base_encoder_for_key`] when that can happen.
    pub fn base_encoder<F>(&mut self, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(BASE_KEY, f)
    }

    /// Encodes a base representation under an explicit key.
    pub fn base_encoder_for_key<F>(&mut self, key: &str, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(key, f)
    }
}
