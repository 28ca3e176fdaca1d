use dict_coder_value::{Leaf, Value};

use super::{Encode, Encoder};
use crate::error::EncodingError;
use crate::options::CodingOptions;
use crate::path::CodingPath;

/// Container holding exactly one value.
#[derive(Debug)]
pub struct SingleEncoder<'e> {
    path: &'e CodingPath,
    options: &'e CodingOptions,
    slot: &'e mut Option<Value>,
}

impl<'e> SingleEncoder<'e> {
    pub(super) fn new(
        path: &'e CodingPath,
        options: &'e CodingOptions,
        slot: &'e mut Option<Value>,
    ) -> Self {
        Self {
            path,
            options,
            slot,
        }
    }

    pub fn path(&self) -> &CodingPath {
        self.path
    }

    pub fn is_written(&self) -> bool {
        self.slot.is_some()
    }

    pub fn encode_nil(&mut self) -> Result<(), EncodingError> {
        self.encode_value(Value::Null)
    }

    pub fn encode_leaf<T: Leaf>(&mut self, value: T) -> Result<(), EncodingError> {
        self.encode_value(value.into_value())
    }

    /// Stores an already-built subtree as this node.
    pub fn encode_value(&mut self, value: Value) -> Result<(), EncodingError> {
        self.ensure_empty()?;
        *self.slot = Some(value);
        Ok(())
    }

    /// Encodes `value` at this node's own path.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.ensure_empty()?;
        let mut child = Encoder::new(self.path.clone(), self.options);
        value.encode(&mut child)?;
        *self.slot = Some(child.into_value());
        Ok(())
    }

    fn ensure_empty(&self) -> Result<(), EncodingError> {
        if self.slot.is_some() {
            return Err(EncodingError::ValueAlreadyWritten {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
