use crate::strategy::{BytesStrategy, TimestampStrategy};

/// Per-pass configuration shared by every context of one encode or decode.
///
/// The defaults keep byte blobs as [`Value::Bytes`](dict_coder_value::Value::Bytes)
/// leaves and timestamps as reference-date offsets.
#[derive(Debug, Clone, Default)]
pub struct CodingOptions {
    pub bytes: BytesStrategy,
    pub timestamp: TimestampStrategy,
}

impl CodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, strategy: BytesStrategy) -> Self {
        self.bytes = strategy;
        self
    }

    pub fn with_timestamp(mut self, strategy: TimestampStrategy) -> Self {
        self.timestamp = strategy;
        self
    }
}
