use std::ops::Deref;

use crate::decoder::{Decode, Decoder};
use crate::encoder::{Encode, Encoder};
use crate::error::{DecodingError, EncodingError};

/// A byte blob that is coded through the active
/// [`BytesStrategy`](crate::BytesStrategy).
///
/// A bare `Vec<u8>` is an ordinary sequence of `u8` and always encodes as an
/// array; wrap it in `Bytes` to opt into the blob strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl Encode for Bytes {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        encoder.encode_bytes(&self.0)
    }
}

impl Decode for Bytes {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        decoder.decode_bytes().map(Bytes)
    }
}
