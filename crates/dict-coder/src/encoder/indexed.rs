use dict_coder_value::{Leaf, Value};

use super::{Encode, Encoder, KeyedEncoder};
use crate::error::EncodingError;
use crate::options::CodingOptions;
use crate::path::CodingPath;

/// Append-only array container.
#[derive(Debug)]
pub struct IndexedEncoder<'e> {
    path: &'e CodingPath,
    options: &'e CodingOptions,
    items: &'e mut Vec<Value>,
}

impl<'e> IndexedEncoder<'e> {
    pub(super) fn new(
        path: &'e CodingPath,
        options: &'e CodingOptions,
        items: &'e mut Vec<Value>,
    ) -> Self {
        Self {
            path,
            options,
            items,
        }
    }

    pub fn path(&self) -> &CodingPath {
        self.path
    }

    /// Index the next append will land on.
    pub fn current_index(&self) -> usize {
        self.items.len()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn encode_nil(&mut self) {
        self.items.push(Value::Null);
    }

    pub fn encode_leaf<T: Leaf>(&mut self, value: T) {
        self.items.push(value.into_value());
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.encode_with(|encoder| value.encode(encoder))
    }

    /// Runs `f` against a child encoder at [`Self::current_index`] and
    /// appends what it builds.
    pub fn encode_with<F>(&mut self, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<(), EncodingError>,
    {
        let mut child = Encoder::new(self.path.child(self.current_index()), self.options);
        f(&mut child)?;
        self.items.push(child.into_value());
        Ok(())
    }

    pub fn nested_keyed<F>(&mut self, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut KeyedEncoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(|encoder| f(&mut encoder.keyed()?))
    }

    pub fn nested_indexed<F>(&mut self, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut IndexedEncoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(|encoder| f(&mut encoder.indexed()?))
    }

    /// Appends a base representation as the next element.
    pub fn base_encoder<F>(&mut self, f: F) -> Result<(), EncodingError>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<(), EncodingError>,
    {
        self.encode_with(f)
    }
}
