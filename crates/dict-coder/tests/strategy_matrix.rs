//! Byte blob and timestamp strategy matrix.

use chrono::{DateTime, TimeZone, Utc};
use dict_coder::{
    Bytes, BytesStrategy, CodingOptions, Decode, Decoder, DecodingError, DictionaryDecoder,
    DictionaryEncoder, Encode, Encoder, EncodingError, TimestampFormatter, TimestampStrategy,
    Value,
};

fn coders(options: CodingOptions) -> (DictionaryEncoder, DictionaryDecoder) {
    (
        DictionaryEncoder::with_options(options.clone()),
        DictionaryDecoder::with_options(options),
    )
}

// 1970-04-11T00:00:00Z
fn instant() -> DateTime<Utc> {
    Utc.timestamp_opt(8_640_000, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Bytes
// ---------------------------------------------------------------------------

fn utf8_strategy() -> BytesStrategy {
    BytesStrategy::custom(
        |bytes, encoder| {
            let text = String::from_utf8(bytes.to_vec()).map_err(EncodingError::custom)?;
            encoder.single()?.encode_leaf(text)
        },
        |decoder| {
            let text: String = decoder.single().decode_leaf()?;
            Ok(text.into_bytes())
        },
    )
}

#[test]
fn bytes_strategy_matrix() {
    let blob = Bytes(b"text".to_vec());
    let cases = vec![
        (BytesStrategy::Direct, Value::Bytes(b"text".to_vec())),
        (
            BytesStrategy::DeferToGenericFields,
            b"text".iter().map(|&b| Value::U8(b)).collect(),
        ),
        (BytesStrategy::Base64, Value::Str("dGV4dA==".into())),
        (utf8_strategy(), Value::Str("text".into())),
    ];

    for (strategy, expected) in cases {
        let label = format!("{strategy:?}");
        let (encoder, decoder) = coders(CodingOptions::new().with_bytes(strategy));
        let tree = encoder.encode(&blob).unwrap();
        assert_eq!(tree, expected, "{label}");
        let back: Bytes = decoder.decode(&tree).unwrap();
        assert_eq!(back, blob, "{label}");
    }
}

#[test]
fn bytes_shape_mismatch_is_type_mismatch() {
    let decoder = DictionaryDecoder::new();
    assert!(matches!(
        decoder.decode::<Bytes>(&Value::Str("dGV4dA==".into())),
        Err(DecodingError::TypeMismatch { .. })
    ));

    let (_, decoder) = coders(CodingOptions::new().with_bytes(BytesStrategy::Base64));
    assert!(matches!(
        decoder.decode::<Bytes>(&Value::Str("not base64!".into())),
        Err(DecodingError::TypeMismatch { .. })
    ));
    assert!(matches!(
        decoder.decode::<Bytes>(&Value::Bytes(vec![1])),
        Err(DecodingError::TypeMismatch { .. })
    ));
}

#[test]
fn custom_bytes_failure_propagates() {
    let (encoder, _) = coders(CodingOptions::new().with_bytes(utf8_strategy()));
    let err = encoder.encode(&Bytes(vec![0xff, 0xfe])).unwrap_err();
    assert!(matches!(err, EncodingError::Custom(_)));
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

fn days_strategy() -> TimestampStrategy {
    TimestampStrategy::custom(
        |timestamp, encoder| {
            encoder
                .keyed()?
                .encode_leaf("days", timestamp.timestamp() / 86_400);
            Ok(())
        },
        |decoder| {
            let days: i64 = decoder.keyed()?.decode_leaf("days")?;
            Utc.timestamp_opt(days * 86_400, 0)
                .single()
                .ok_or_else(|| decoder.type_mismatch("day count"))
        },
    )
}

#[test]
fn timestamp_strategy_matrix() {
    let formatter = TimestampFormatter::new("%Y.%m.%d %H:%M:%S").unwrap();
    let cases = vec![
        (
            TimestampStrategy::DeferToGenericFields,
            Value::Double(-969_667_200.0),
        ),
        (TimestampStrategy::SecondsSinceEpoch, Value::Double(8_640_000.0)),
        (
            TimestampStrategy::MillisecondsSinceEpoch,
            Value::Double(8_640_000_000.0),
        ),
        (
            TimestampStrategy::Iso8601,
            Value::Str("1970-04-11T00:00:00Z".into()),
        ),
        (
            TimestampStrategy::Formatted(formatter),
            Value::Str("1970.04.11 00:00:00".into()),
        ),
        (
            days_strategy(),
            [("days", Value::I64(100))].into_iter().collect(),
        ),
    ];

    for (strategy, expected) in cases {
        let label = format!("{strategy:?}");
        let (encoder, decoder) = coders(CodingOptions::new().with_timestamp(strategy));
        let tree = encoder.encode(&instant()).unwrap();
        assert_eq!(tree, expected, "{label}");
        let back: DateTime<Utc> = decoder.decode(&tree).unwrap();
        assert_eq!(back, instant(), "{label}");
    }
}

#[test]
fn numeric_strategies_keep_milliseconds() {
    let t = Utc.timestamp_opt(8_640_000, 250_000_000).unwrap();
    for strategy in [
        TimestampStrategy::DeferToGenericFields,
        TimestampStrategy::SecondsSinceEpoch,
        TimestampStrategy::MillisecondsSinceEpoch,
    ] {
        let (encoder, decoder) = coders(CodingOptions::new().with_timestamp(strategy));
        let tree = encoder.encode(&t).unwrap();
        assert_eq!(decoder.decode::<DateTime<Utc>>(&tree).unwrap(), t);
    }
}

#[test]
fn numeric_strategies_keep_non_dyadic_milliseconds() {
    // 2023-11-14T22:13:20.123Z
    let t = Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap();
    let cases = [
        (
            TimestampStrategy::DeferToGenericFields,
            1_700_000_000.123 - 978_307_200.0,
        ),
        (TimestampStrategy::SecondsSinceEpoch, 1_700_000_000.123),
        (TimestampStrategy::MillisecondsSinceEpoch, 1_700_000_000_123.0),
    ];
    for (strategy, expected) in cases {
        let label = format!("{strategy:?}");
        let (encoder, decoder) = coders(CodingOptions::new().with_timestamp(strategy));
        let tree = encoder.encode(&t).unwrap();
        let Value::Double(encoded) = &tree else {
            panic!("{label}: expected a double leaf, got {tree:?}");
        };
        assert!((*encoded - expected).abs() < 1e-6, "{label}: {encoded}");
        assert_eq!(decoder.decode::<DateTime<Utc>>(&tree).unwrap(), t, "{label}");
    }
}

#[test]
fn iso8601_drops_fractional_seconds() {
    let t = Utc.timestamp_opt(8_640_000, 250_000_000).unwrap();
    let (encoder, decoder) = coders(CodingOptions::new().with_timestamp(TimestampStrategy::Iso8601));
    let tree = encoder.encode(&t).unwrap();
    assert_eq!(tree, Value::Str("1970-04-11T00:00:00Z".into()));
    assert_eq!(decoder.decode::<DateTime<Utc>>(&tree).unwrap(), instant());

    let offset = Value::Str("1970-04-11T02:00:00+02:00".into());
    assert_eq!(decoder.decode::<DateTime<Utc>>(&offset).unwrap(), instant());

    let fractional = Value::Str("1970-04-11T00:00:00.250Z".into());
    assert!(matches!(
        decoder.decode::<DateTime<Utc>>(&fractional),
        Err(DecodingError::TypeMismatch { .. })
    ));
}

#[test]
fn timestamp_parse_failures_are_type_mismatch() {
    let formatter = TimestampFormatter::new("%Y-%m-%d").unwrap();
    let strategies = [
        TimestampStrategy::Iso8601,
        TimestampStrategy::Formatted(formatter),
        TimestampStrategy::SecondsSinceEpoch,
    ];
    for strategy in strategies {
        let (_, decoder) = coders(CodingOptions::new().with_timestamp(strategy));
        let err = decoder
            .decode::<DateTime<Utc>>(&Value::Str("yesterday".into()))
            .unwrap_err();
        assert!(matches!(err, DecodingError::TypeMismatch { .. }), "{err}");
    }

    let (_, decoder) = coders(CodingOptions::default());
    assert!(matches!(
        decoder.decode::<DateTime<Utc>>(&Value::I64(0)),
        Err(DecodingError::TypeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Inheritance by nested contexts
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Attachment {
    data: Bytes,
    created: DateTime<Utc>,
}

impl Encode for Attachment {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodingError> {
        let mut keyed = encoder.keyed()?;
        keyed.encode("data", &self.data)?;
        keyed.encode("created", &self.created)
    }
}

impl Decode for Attachment {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, DecodingError> {
        let keyed = decoder.keyed()?;
        Ok(Attachment {
            data: keyed.decode("data")?,
            created: keyed.decode("created")?,
        })
    }
}

#[test]
fn strategies_apply_at_every_depth() {
    let options = CodingOptions::new()
        .with_bytes(BytesStrategy::Base64)
        .with_timestamp(TimestampStrategy::SecondsSinceEpoch);
    let (encoder, decoder) = coders(options);
    let attachments = vec![vec![Attachment {
        data: Bytes(b"text".to_vec()),
        created: instant(),
    }]];

    let tree = encoder.encode(&attachments).unwrap();
    let leaf = tree.get_index(0).and_then(|inner| inner.get_index(0)).unwrap();
    assert_eq!(leaf.get("data"), Some(&Value::Str("dGV4dA==".into())));
    assert_eq!(leaf.get("created"), Some(&Value::Double(8_640_000.0)));

    let back: Vec<Vec<Attachment>> = decoder.decode(&tree).unwrap();
    assert_eq!(back, attachments);
}

#[test]
fn setters_change_only_their_strategy() {
    let mut encoder = DictionaryEncoder::new();
    encoder.set_timestamp_strategy(TimestampStrategy::MillisecondsSinceEpoch);
    assert!(matches!(encoder.options().bytes, BytesStrategy::Direct));
    assert_eq!(
        encoder.encode(&instant()).unwrap(),
        Value::Double(8_640_000_000.0)
    );
}
