//! Typed value → [`Value`] tree.
//!
//! Every node of the output is built by one [`Encoder`]. The value being
//! encoded asks its encoder for exactly one container shape and writes its
//! fields into it; nested fields get a child encoder one path segment deeper.

mod indexed;
mod keyed;
mod single;

use chrono::{DateTime, Utc};
use dict_coder_value::{Map, Value};

use crate::error::{ContainerKind, EncodingError};
use crate::options::CodingOptions;
use crate::path::CodingPath;
use crate::strategy::{BytesStrategy, TimestampStrategy};

pub use indexed::IndexedEncoder;
pub use keyed::KeyedEncoder;
pub use single::SingleEncoder;

/// A type that can write itself into an [`Encoder`].
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError>;
}

/// Entry point for encoding a value graph into a [`Value`] tree.
#[derive(Debug, Clone, Default)]
pub struct DictionaryEncoder {
    options: CodingOptions,
}

impl DictionaryEncoder {
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

    /// Encodes `value` from the root.
    ///
    /// Any failure is returned as-is and no partial tree is produced.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Result<Value, EncodingError> {
        log::trace!(
            "encoding {} with {:?}",
            std::any::type_name::<T>(),
            self.options
        );
        let mut encoder = Encoder::new(CodingPath::root(), &self.options);
        value.encode(&mut encoder)?;
        Ok(encoder.into_value())
    }
}

#[derive(Debug)]
enum Slot {
    Keyed(Map),
    Indexed(Vec<Value>),
    Single(Option<Value>),
}

impl Slot {
    fn kind(&self) -> ContainerKind {
        match self {
            Slot::Keyed(_) => ContainerKind::Keyed,
            Slot::Indexed(_) => ContainerKind::Indexed,
            Slot::Single(_) => ContainerKind::Single,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Slot::Keyed(map) => Value::Map(map.clone()),
            Slot::Indexed(items) => Value::Array(items.clone()),
            Slot::Single(value) => value.clone().unwrap_or_default(),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Slot::Keyed(map) => Value::Map(map),
            Slot::Indexed(items) => Value::Array(items),
            Slot::Single(value) => value.unwrap_or_default(),
        }
    }
}

/// Encoding context for one node of the output tree.
///
/// The first container request fixes the node's shape. Asking again for the
/// same shape hands back the same container; asking for another shape fails
/// with [`EncodingError::ContainerConflict`].
#[derive(Debug)]
pub struct Encoder<'a> {
    path: CodingPath,
    options: &'a CodingOptions,
    slot: Option<Slot>,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(path: CodingPath, options: &'a CodingOptions) -> Self {
        Self {
            path,
            options,
            slot: None,
        }
    }

    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    pub fn options(&self) -> &'a CodingOptions {
        self.options
    }

    /// Shape of the container vended so far, if any.
    pub fn container_kind(&self) -> Option<ContainerKind> {
        self.slot.as_ref().map(Slot::kind)
    }

    pub fn keyed(&mut self) -> Result<KeyedEncoder<'_>, EncodingError> {
        match self.slot.get_or_insert_with(|| Slot::Keyed(Map::new())) {
            Slot::Keyed(map) => Ok(KeyedEncoder::new(&self.path, self.options, map)),
            other => Err(conflict(other.kind(), ContainerKind::Keyed, &self.path)),
        }
    }

    pub fn indexed(&mut self) -> Result<IndexedEncoder<'_>, EncodingError> {
        match self.slot.get_or_insert_with(|| Slot::Indexed(Vec::new())) {
            Slot::Indexed(items) => Ok(IndexedEncoder::new(&self.path, self.options, items)),
            other => Err(conflict(other.kind(), ContainerKind::Indexed, &self.path)),
        }
    }

    pub fn single(&mut self) -> Result<SingleEncoder<'_>, EncodingError> {
        match self.slot.get_or_insert_with(|| Slot::Single(None)) {
            Slot::Single(value) => Ok(SingleEncoder::new(&self.path, self.options, value)),
            other => Err(conflict(other.kind(), ContainerKind::Single, &self.path)),
        }
    }

    /// Writes a byte blob through the active [`BytesStrategy`].
    pub fn encode_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodingError> {
        let options = self.options;
        options.bytes.encode(bytes, self)
    }

    /// Writes a timestamp through the active [`TimestampStrategy`].
    pub fn encode_timestamp(&mut self, timestamp: &DateTime<Utc>) -> Result<(), EncodingError> {
        let options = self.options;
        options.timestamp.encode(timestamp, self)
    }

    /// Snapshot of the node built so far. `Null` until something is written.
    pub fn value(&self) -> Value {
        self.slot.as_ref().map(Slot::to_value).unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        self.slot.map(Slot::into_value).unwrap_or_default()
    }
}

fn conflict(existing: ContainerKind, requested: ContainerKind, path: &CodingPath) -> EncodingError {
    EncodingError::ContainerConflict {
        existing,
        requested,
        path: path.clone(),
    }
}
