//! [`Value`] tree → typed value.
//!
//! Decoding mirrors encoding top-down: a [`Decoder`] wraps one node of the
//! input, exposes the container view that matches the node's shape, and the
//! target type pulls its fields out of it. The tree is only ever borrowed.

mod indexed;
mod keyed;
mod single;

use chrono::{DateTime, Utc};
use dict_coder_value::Value;

use crate::error::DecodingError;
use crate::options::CodingOptions;
use crate::path::CodingPath;
use crate::strategy::{BytesStrategy, TimestampStrategy};

pub use indexed::IndexedDecoder;
pub use keyed::KeyedDecoder;
pub use single::SingleDecoder;

/// A type that can read itself out of a [`Decoder`].
pub trait Decode: Sized {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError>;
}

/// Entry point for decoding a [`Value`] tree into a typed value.
#[derive(Debug, Clone, Default)]
pub struct DictionaryDecoder {
    options: CodingOptions,
}

impl DictionaryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodingOptions {
        &self.options
    }

    pub fn set_bytes_strategy(&mut self, strategy: BytesStrategy) {
        self.options.bytes = strategy;
    }

    pub fn set_timestamp_strategy(&mut self, strategy: TimestampStrategy) {
        self.options.timestamp = strategy;
    }

    pub fn decode<T: Decode>(&self, value: &Value) -> Result<T, DecodingError> {
        log::trace!(
            "decoding {} with {:?}",
            std::any::type_name::<T>(),
            self.options
        );
        T::decode(&Decoder::new(CodingPath::root(), value, &self.options))
    }
}

/// Decoding context for one node of the input tree.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    path: CodingPath,
    value: &'a Value,
    options: &'a CodingOptions,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(path: CodingPath, value: &'a Value, options: &'a CodingOptions) -> Self {
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

    pub fn options(&self) -> &'a CodingOptions {
        self.options
    }

    /// Map view of this node; any other shape is a type mismatch.
    pub fn keyed(&self) -> Result<KeyedDecoder<'a>, DecodingError> {
        match self.value {
            Value::Map(map) => Ok(KeyedDecoder::new(self.path.clone(), map, self.options)),
            _ => Err(self.type_mismatch("map")),
        }
    }

    /// Array view of this node; any other shape is a type mismatch.
    pub fn indexed(&self) -> Result<IndexedDecoder<'a>, DecodingError> {
        match self.value {
            Value::Array(items) => Ok(IndexedDecoder::new(self.path.clone(), items, self.options)),
            _ => Err(self.type_mismatch("array")),
        }
    }

    /// Single value view; available for every shape.
    pub fn single(&self) -> SingleDecoder<'a> {
        SingleDecoder::new(self.path.clone(), self.value, self.options)
    }

    /// Reads a byte blob through the active [`BytesStrategy`].
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DecodingError> {
        self.options.bytes.decode(self)
    }

    /// Reads a timestamp through the active [`TimestampStrategy`].
    pub fn decode_timestamp(&self) -> Result<DateTime<Utc>, DecodingError> {
        self.options.timestamp.decode(self)
    }

    /// Builds a [`DecodingError::TypeMismatch`] for this node.
    pub fn type_mismatch(&self, expected: &'static str) -> DecodingError {
        type_mismatch(expected, self.value, &self.path)
    }
}

pub(crate) fn type_mismatch(expected: &'static str, found: &Value, path: &CodingPath) -> DecodingError {
    DecodingError::TypeMismatch {
        expected,
        found: found.kind(),
        path: path.clone(),
    }
}
