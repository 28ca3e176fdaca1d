//! Leaf strategies for byte blobs and timestamps.
//!
//! A strategy is picked once per pass through [`CodingOptions`](crate::CodingOptions)
//! and applies, unchanged, to every [`Bytes`](crate::Bytes) and
//! `DateTime<Utc>` in the graph. Each strategy is bidirectional: the same
//! value selects both the encoding and the matching decoding.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeDelta, TimeZone,
    Utc,
};

use crate::decoder::{Decode, Decoder};
use crate::encoder::{Encode, Encoder};
use crate::error::{DecodingError, EncodingError, PatternError};

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the origin used
/// by [`TimestampStrategy::DeferToGenericFields`].
pub const REFERENCE_DATE_UNIX_SECONDS: i64 = 978_307_200;

/// Caller-supplied conversion for byte blobs.
pub trait BytesCodec: Send + Sync {
    fn encode(&self, bytes: &[u8], encoder: &mut Encoder<'_>) -> Result<(), EncodingError>;
    fn decode(&self, decoder: &Decoder<'_>) -> Result<Vec<u8>, DecodingError>;
}

/// Caller-supplied conversion for timestamps.
pub trait TimestampCodec: Send + Sync {
    fn encode(
        &self,
        timestamp: &DateTime<Utc>,
        encoder: &mut Encoder<'_>,
    ) -> Result<(), EncodingError>;
    fn decode(&self, decoder: &Decoder<'_>) -> Result<DateTime<Utc>, DecodingError>;
}

/// A codec built from a pair of closures.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> BytesCodec for FnCodec<E, D>
where
    E: Fn(&[u8], &mut Encoder<'_>) -> Result<(), EncodingError> + Send + Sync,
    D: Fn(&Decoder<'_>) -> Result<Vec<u8>, DecodingError> + Send + Sync,
{
    fn encode(&self, bytes: &[u8], encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        (self.encode)(bytes, encoder)
    }

    fn decode(&self, decoder: &Decoder<'_>) -> Result<Vec<u8>, DecodingError> {
        (self.decode)(decoder)
    }
}

impl<E, D> TimestampCodec for FnCodec<E, D>
where
    E: Fn(&DateTime<Utc>, &mut Encoder<'_>) -> Result<(), EncodingError> + Send + Sync,
    D: Fn(&Decoder<'_>) -> Result<DateTime<Utc>, DecodingError> + Send + Sync,
{
    fn encode(
        &self,
        timestamp: &DateTime<Utc>,
        encoder: &mut Encoder<'_>,
    ) -> Result<(), EncodingError> {
        (self.encode)(timestamp, encoder)
    }

    fn decode(&self, decoder: &Decoder<'_>) -> Result<DateTime<Utc>, DecodingError> {
        (self.decode)(decoder)
    }
}

/// How byte blobs are represented in the tree.
#[derive(Clone, Default)]
pub enum BytesStrategy {
    /// A [`Value::Bytes`](dict_coder_value::Value::Bytes) leaf.
    #[default]
    Direct,
    /// An array of `u8` leaves, exactly as a `Vec<u8>` would encode.
    DeferToGenericFields,
    /// A string leaf holding standard, padded base64.
    Base64,
    Custom(Arc<dyn BytesCodec>),
}

impl BytesStrategy {
    pub fn custom<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&[u8], &mut Encoder<'_>) -> Result<(), EncodingError> + Send + Sync + 'static,
        D: Fn(&Decoder<'_>) -> Result<Vec<u8>, DecodingError> + Send + Sync + 'static,
    {
        BytesStrategy::Custom(Arc::new(FnCodec { encode, decode }))
    }

    pub(crate) fn encode(
        &self,
        bytes: &[u8],
        encoder: &mut Encoder<'_>,
    ) -> Result<(), EncodingError> {
        match self {
            BytesStrategy::Direct => encoder.single()?.encode_leaf(bytes.to_vec()),
            BytesStrategy::DeferToGenericFields => bytes.encode(encoder),
            BytesStrategy::Base64 => encoder.single()?.encode_leaf(STANDARD.encode(bytes)),
            BytesStrategy::Custom(codec) => {
                log::trace!("custom bytes strategy at \"{}\"", encoder.path());
                codec.encode(bytes, encoder)
            }
        }
    }

    pub(crate) fn decode(&self, decoder: &Decoder<'_>) -> Result<Vec<u8>, DecodingError> {
        match self {
            BytesStrategy::Direct => decoder.single().decode_leaf(),
            BytesStrategy::DeferToGenericFields => Vec::<u8>::decode(decoder),
            BytesStrategy::Base64 => {
                let text = decoder
                    .value()
                    .as_str()
                    .ok_or_else(|| decoder.type_mismatch("base64 string"))?;
                STANDARD
                    .decode(text)
                    .map_err(|_| decoder.type_mismatch("base64 string"))
            }
            BytesStrategy::Custom(codec) => {
                log::trace!("custom bytes strategy at \"{}\"", decoder.path());
                codec.decode(decoder)
            }
        }
    }
}

impl fmt::Debug for BytesStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytesStrategy::Direct => f.write_str("Direct"),
            BytesStrategy::DeferToGenericFields => f.write_str("DeferToGenericFields"),
            BytesStrategy::Base64 => f.write_str("Base64"),
            BytesStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How timestamps are represented in the tree.
#[derive(Clone, Default)]
pub enum TimestampStrategy {
    /// A `f64` leaf of seconds since [`REFERENCE_DATE_UNIX_SECONDS`].
    #[default]
    DeferToGenericFields,
    /// A `f64` leaf of seconds since the Unix epoch.
    SecondsSinceEpoch,
    /// A `f64` leaf of milliseconds since the Unix epoch. Whole
    /// milliseconds are exact; the sub-millisecond part rides in the fraction.
    MillisecondsSinceEpoch,
    /// A string leaf such as `1970-04-11T00:00:00Z`.
    ///
    /// Encoding drops fractional seconds. Decoding accepts `Z` or a numeric
    /// offset and rejects fractional seconds.
    Iso8601,
    Formatted(TimestampFormatter),
    Custom(Arc<dyn TimestampCodec>),
}

impl TimestampStrategy {
    pub fn custom<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&DateTime<Utc>, &mut Encoder<'_>) -> Result<(), EncodingError>
            + Send
            + Sync
            + 'static,
        D: Fn(&Decoder<'_>) -> Result<DateTime<Utc>, DecodingError> + Send + Sync + 'static,
    {
        TimestampStrategy::Custom(Arc::new(FnCodec { encode, decode }))
    }

    pub(crate) fn encode(
        &self,
        timestamp: &DateTime<Utc>,
        encoder: &mut Encoder<'_>,
    ) -> Result<(), EncodingError> {
        let seconds = unix_seconds(timestamp);
        match self {
            TimestampStrategy::DeferToGenericFields => {
                (seconds - REFERENCE_DATE_UNIX_SECONDS as f64).encode(encoder)
            }
            TimestampStrategy::SecondsSinceEpoch => encoder.single()?.encode_leaf(seconds),
            TimestampStrategy::MillisecondsSinceEpoch => {
                encoder.single()?.encode_leaf(unix_millis(timestamp))
            }
            TimestampStrategy::Iso8601 => encoder
                .single()?
                .encode_leaf(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TimestampStrategy::Formatted(formatter) => {
                let text = formatter
                    .format(timestamp)
                    .map_err(|_| EncodingError::InvalidValue {
                        path: encoder.path().clone(),
                        message: format!("cannot format with \"{}\"", formatter.pattern()),
                    })?;
                encoder.single()?.encode_leaf(text)
            }
            TimestampStrategy::Custom(codec) => {
                log::trace!("custom timestamp strategy at \"{}\"", encoder.path());
                codec.encode(timestamp, encoder)
            }
        }
    }

    pub(crate) fn decode(&self, decoder: &Decoder<'_>) -> Result<DateTime<Utc>, DecodingError> {
        match self {
            TimestampStrategy::DeferToGenericFields => {
                let offset = f64::decode(decoder)?;
                from_unix_seconds(offset + REFERENCE_DATE_UNIX_SECONDS as f64)
                    .ok_or_else(|| decoder.type_mismatch("timestamp"))
            }
            TimestampStrategy::SecondsSinceEpoch => {
                let seconds: f64 = decoder.single().decode_leaf()?;
                from_unix_seconds(seconds).ok_or_else(|| decoder.type_mismatch("timestamp"))
            }
            TimestampStrategy::MillisecondsSinceEpoch => {
                let millis: f64 = decoder.single().decode_leaf()?;
                from_unix_millis(millis)
                    .ok_or_else(|| decoder.type_mismatch("timestamp"))
            }
            TimestampStrategy::Iso8601 => decoder
                .value()
                .as_str()
                .filter(|text| is_internet_date_time(text))
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .map(|parsed| parsed.with_timezone(&Utc))
                .ok_or_else(|| decoder.type_mismatch("ISO 8601 string")),
            TimestampStrategy::Formatted(formatter) => decoder
                .value()
                .as_str()
                .and_then(|text| formatter.parse(text))
                .ok_or_else(|| decoder.type_mismatch("formatted timestamp string")),
            TimestampStrategy::Custom(codec) => {
                log::trace!("custom timestamp strategy at \"{}\"", decoder.path());
                codec.decode(decoder)
            }
        }
    }
}

impl fmt::Debug for TimestampStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampStrategy::DeferToGenericFields => f.write_str("DeferToGenericFields"),
            TimestampStrategy::SecondsSinceEpoch => f.write_str("SecondsSinceEpoch"),
            TimestampStrategy::MillisecondsSinceEpoch => f.write_str("MillisecondsSinceEpoch"),
            TimestampStrategy::Iso8601 => f.write_str("Iso8601"),
            TimestampStrategy::Formatted(formatter) => {
                f.debug_tuple("Formatted").field(formatter).finish()
            }
            TimestampStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Renders and parses timestamps with a strftime pattern at a fixed offset.
///
/// Patterns without an offset specifier are interpreted at [`Self::offset`]
/// (UTC unless changed with [`Self::with_offset`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormatter {
    pattern: String,
    offset: FixedOffset,
}

impl TimestampFormatter {
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(PatternError(pattern));
        }
        Ok(Self {
            pattern,
            offset: Utc.fix(),
        })
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> Result<String, fmt::Error> {
        let mut out = String::new();
        write!(
            out,
            "{}",
            timestamp.with_timezone(&self.offset).format(&self.pattern)
        )?;
        Ok(out)
    }

    pub fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_str(text, &self.pattern) {
            return Some(parsed.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(text, &self.pattern)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.pattern)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}

fn unix_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) / 1e9
}

fn unix_millis(timestamp: &DateTime<Utc>) -> f64 {
    let sub_millis = timestamp.timestamp_subsec_nanos() % 1_000_000;
    timestamp.timestamp_millis() as f64 + f64::from(sub_millis) / 1e6
}

/// The fraction is rounded to whole microseconds.
fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    let (secs, micros) = split_whole(seconds, 1e6)?;
    DateTime::from_timestamp(secs, micros * 1_000)
}

fn from_unix_millis(millis: f64) -> Option<DateTime<Utc>> {
    let (whole, nanos) = split_whole(millis, 1e6)?;
    DateTime::from_timestamp_millis(whole)?
        .checked_add_signed(TimeDelta::nanoseconds(i64::from(nanos)))
}

/// Splits `value` into its floor and the remainder scaled by `scale` and
/// rounded, carrying into the whole part when rounding reaches `scale`.
fn split_whole(value: f64, scale: f64) -> Option<(i64, u32)> {
    if !value.is_finite() {
        return None;
    }
    let whole = value.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let mut whole = whole as i64;
    let mut fraction = ((value - whole as f64) * scale).round();
    if fraction >= scale {
        whole = whole.checked_add(1)?;
        fraction = 0.0;
    }
    Some((whole, fraction as u32))
}

/// `YYYY-MM-DDTHH:MM:SS` followed directly by `Z` or a numeric offset.
fn is_internet_date_time(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.get(10) == Some(&b'T') && matches!(bytes.get(19), Some(b'Z' | b'+' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_seconds_roundtrip_keeps_millisecond_precision() {
        let t = DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap();
        assert_eq!(unix_seconds(&t), 1_700_000_000.25);
        assert_eq!(from_unix_seconds(unix_seconds(&t)), Some(t));
        let before_epoch = DateTime::from_timestamp(-2, 500_000_000).unwrap();
        assert_eq!(from_unix_seconds(-1.5), Some(before_epoch));
    }

    #[test]
    fn non_dyadic_milliseconds_roundtrip() {
        let t = DateTime::from_timestamp(1_700_000_000, 123_000_000).unwrap();
        assert_eq!(unix_millis(&t), 1_700_000_000_123.0);
        assert_eq!(from_unix_millis(unix_millis(&t)), Some(t));
        assert_eq!(from_unix_seconds(unix_seconds(&t)), Some(t));
        let offset = unix_seconds(&t) - REFERENCE_DATE_UNIX_SECONDS as f64;
        assert_eq!(
            from_unix_seconds(offset + REFERENCE_DATE_UNIX_SECONDS as f64),
            Some(t)
        );
    }

    #[test]
    fn sub_millisecond_remainders_are_kept() {
        let t = DateTime::from_timestamp(-1, 999_999_000).unwrap();
        assert_eq!(from_unix_millis(unix_millis(&t)), Some(t));
        assert_eq!(
            from_unix_millis(0.9999999),
            DateTime::from_timestamp_millis(1)
        );
    }

    #[test]
    fn internet_date_time_shape() {
        assert!(is_internet_date_time("1970-04-11T00:00:00Z"));
        assert!(is_internet_date_time("1970-04-11T02:00:00+02:00"));
        assert!(!is_internet_date_time("1970-04-11T00:00:00.5Z"));
        assert!(!is_internet_date_time("1970-04-11 00:00:00Z"));
    }

    #[test]
    fn non_finite_seconds_are_rejected() {
        assert_eq!(from_unix_seconds(f64::NAN), None);
        assert_eq!(from_unix_seconds(f64::INFINITY), None);
        assert_eq!(from_unix_seconds(1e300), None);
        assert_eq!(from_unix_millis(f64::NAN), None);
    }

    #[test]
    fn formatter_rejects_bad_patterns() {
        assert!(TimestampFormatter::new("%Y-%m-%d").is_ok());
        assert!(TimestampFormatter::new("%Y-%!").is_err());
    }

    #[test]
    fn formatter_applies_its_offset() {
        let t = DateTime::from_timestamp(0, 0).unwrap();
        let formatter = TimestampFormatter::new("%Y-%m-%d %H:%M")
            .unwrap()
            .with_offset(FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(formatter.format(&t).unwrap(), "1970-01-01 02:00");
        assert_eq!(formatter.parse("1970-01-01 02:00"), Some(t));
        assert_eq!(formatter.parse("garbage"), None);
    }

    #[test]
    fn date_only_patterns_parse_to_midnight() {
        let formatter = TimestampFormatter::new("%Y/%m/%d").unwrap();
        assert_eq!(
            formatter.parse("1970/01/02"),
            DateTime::from_timestamp(86_400, 0)
        );
    }
}
