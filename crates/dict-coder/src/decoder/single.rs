use dict_coder_value::{Leaf, Value};

use super::{type_mismatch, Decode, Decoder};
use crate::error::DecodingError;
use crate::options::CodingOptions;
use crate::path::CodingPath;

/// View of a node as one value, whatever its shape.
#[derive(Debug, Clone)]
pub struct SingleDecoder<'a> {
    path: CodingPath,
    value: &'a Value,
    options: &'a CodingOptions,
}

impl<'a> SingleDecoder<'a> {
    pub(super) fn new(path: CodingPath, value: &'a Value, options: &'a CodingOptions) -> Self {
        Self {
            path,
            value,
            options,
        }
    }

    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    pub fn decode_leaf<T: Leaf>(&self) -> Result<T, DecodingError> {
        T::from_value(self.value)
            .ok_or_else(|| type_mismatch(T::KIND.as_str(), self.value, &self.path))
    }

    /// Decodes `T` from this node at this node's own path.
    pub fn decode<T: Decode>(&self) -> Result<T, DecodingError> {
        T::decode(&Decoder::new(self.path.clone(), self.value, self.options))
    }
}
