//! dict-coder - typed value graphs to and from dictionary trees.
//!
//! [`DictionaryEncoder`] turns anything implementing [`Encode`] into a
//! [`Value`] tree of maps, arrays and native-width scalar leaves;
//! [`DictionaryDecoder`] reads the tree back into anything implementing
//! [`Decode`]. Types describe themselves through three container views:
//! keyed (maps), indexed (arrays) and single value (leaves).
//!
//! ```
//! use dict_coder::{
//!     Decode, Decoder, DecodingError, DictionaryDecoder, DictionaryEncoder, Encode, Encoder,
//!     EncodingError, Value,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     label: Option<String>,
//! }
//!
//! impl Encode for Point {
//!     fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
//!         let mut keyed = encoder.keyed()?;
//!         keyed.encode("x", &self.x)?;
//!         keyed.encode_if_present("label", &self.label)
//!     }
//! }
//!
//! impl Decode for Point {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
//!         let keyed = decoder.keyed()?;
//!         Ok(Point {
//!             x: keyed.decode("x")?,
//!             label: keyed.decode_if_present("label")?,
//!         })
//!     }
//! }
//!
//! let point = Point { x: 3, label: None };
//! let tree = DictionaryEncoder::new().encode(&point).unwrap();
//! assert_eq!(tree, [("x", Value::I32(3))].into_iter().collect::<Value>());
//! assert_eq!(DictionaryDecoder::new().decode::<Point>(&tree).unwrap(), point);
//! ```

mod bytes;
pub mod decoder;
pub mod encoder;
mod error;
mod impls;
mod options;
mod path;
pub mod strategy;

pub use bytes::Bytes;
pub use decoder::{
    Decode, Decoder, DictionaryDecoder, IndexedDecoder, KeyedDecoder, SingleDecoder,
};
pub use encoder::{
    DictionaryEncoder, Encode, Encoder, IndexedEncoder, KeyedEncoder, SingleEncoder,
};
pub use error::{BoxError, ContainerKind, DecodingError, EncodingError, PatternError};
pub use options::CodingOptions;
pub use path::{CodingKey, CodingPath, BASE_KEY};
pub use strategy::{
    BytesCodec, BytesStrategy, FnCodec, TimestampCodec, TimestampFormatter, TimestampStrategy,
    REFERENCE_DATE_UNIX_SECONDS,
};

pub use dict_coder_value::{Leaf, Map, Value, ValueKind};
