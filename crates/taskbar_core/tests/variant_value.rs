use std::cmp::Ordering;
use taskbar_core::{
    FileTime, ScalarKind, VariantError, VariantKind, VariantQuery, VariantValue,
};
use uuid::Uuid;

const SAMPLE_ID: &str = "11111111-2222-4333-8444-555555555555";

#[test]
fn scalar_constructors_report_matching_kind() {
    let cases = [
        (VariantValue::from_bool(true), ScalarKind::Bool),
        (VariantValue::from_int16(-3), ScalarKind::Int16),
        (VariantValue::from_int32(42), ScalarKind::Int32),
        (VariantValue::from_int64(-9_000_000_000), ScalarKind::Int64),
        (VariantValue::from_uint16(7), ScalarKind::UInt16),
        (VariantValue::from_uint32(70_000), ScalarKind::UInt32),
        (VariantValue::from_uint64(u64::MAX), ScalarKind::UInt64),
        (VariantValue::from_double(1.5), ScalarKind::Double),
        (VariantValue::from_identifier(Uuid::nil()), ScalarKind::Identifier),
        (
            VariantValue::from_timestamp(FileTime::from_ticks(1)),
            ScalarKind::Timestamp,
        ),
        (VariantValue::from_string("x").unwrap(), ScalarKind::String),
        (VariantValue::from_buffer(&[1, 2, 3]), ScalarKind::Buffer),
    ];

    for (value, kind) in cases {
        assert_eq!(value.kind(), VariantKind::Scalar(kind));
        assert_eq!(value.element_count(), 1);
        assert!(!value.is(VariantQuery::Vector));
    }
}

#[test]
fn scalar_values_roundtrip_through_matching_conversion() {
    assert!(VariantValue::from_bool(true).to_bool().unwrap());
    assert_eq!(VariantValue::from_int16(i16::MIN).to_int16().unwrap(), i16::MIN);
    assert_eq!(VariantValue::from_int32(-42).to_int32().unwrap(), -42);
    assert_eq!(VariantValue::from_int64(i64::MAX).to_int64().unwrap(), i64::MAX);
    assert_eq!(VariantValue::from_uint16(u16::MAX).to_uint16().unwrap(), u16::MAX);
    assert_eq!(VariantValue::from_uint32(123).to_uint32().unwrap(), 123);
    assert_eq!(VariantValue::from_uint64(u64::MAX).to_uint64().unwrap(), u64::MAX);
    assert_eq!(VariantValue::from_double(-2.25).to_double().unwrap(), -2.25);

    let id = Uuid::parse_str(SAMPLE_ID).unwrap();
    assert_eq!(VariantValue::from_identifier(id).to_identifier().unwrap(), id);

    let stamp = FileTime::from_unix_millis(1_700_000_000_000).unwrap();
    assert_eq!(VariantValue::from_timestamp(stamp).to_timestamp().unwrap(), stamp);

    assert_eq!(
        VariantValue::from_string("newTask4").unwrap().to_text().unwrap(),
        "newTask4"
    );
    assert_eq!(
        VariantValue::from_buffer(&[9, 8, 7]).to_buffer().unwrap(),
        vec![9, 8, 7]
    );
}

#[test]
fn vector_extraction_reproduces_sequence_then_fails() {
    let values = [10, -20, 30];
    let mut vector = VariantValue::from_int32_vector(&values, values.len()).unwrap();

    assert!(vector.is(VariantQuery::Vector));
    assert_eq!(vector.kind(), VariantKind::Vector(ScalarKind::Int32));
    assert_eq!(vector.element_count(), 3);

    let extracted = (0..3)
        .map(|_| vector.next_int32().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(extracted, values);

    let err = vector.next_int32().unwrap_err();
    assert_eq!(err, VariantError::IndexOutOfRange { index: 3, count: 3 });
    assert_eq!(vector.cursor(), 3);
}

#[test]
fn string_vector_extraction_and_join() {
    let mut vector = VariantValue::from_string_vector(&["alpha", "beta"], 2).unwrap();
    assert_eq!(vector.next_string().unwrap(), "alpha");
    assert_eq!(vector.next_string().unwrap(), "beta");
    assert!(vector.next_string().is_err());
    assert_eq!(vector.to_text().unwrap(), "alpha; beta");
}

#[test]
fn scalar_extracts_exactly_once() {
    let mut value = VariantValue::from_double(3.5);
    assert_eq!(value.next_double().unwrap(), 3.5);
    assert!(matches!(
        value.next_double(),
        Err(VariantError::IndexOutOfRange { index: 1, count: 1 })
    ));
}

#[test]
fn set_extract_cursor_past_end_fails_on_next_read() {
    let mut vector = VariantValue::from_uint16_vector(&[1, 2, 3], 3).unwrap();
    vector.set_extract_cursor(5);
    assert_eq!(vector.cursor(), 5);

    let err = vector.next_uint16().unwrap_err();
    assert_eq!(err, VariantError::IndexOutOfRange { index: 5, count: 3 });

    vector.set_extract_cursor(1);
    assert_eq!(vector.next_uint16().unwrap(), 2);
}

#[test]
fn wrong_typed_extractor_is_type_mismatch() {
    let mut vector = VariantValue::from_bool_vector(&[true, false], 2).unwrap();
    let err = vector.next_int32().unwrap_err();
    assert_eq!(
        err,
        VariantError::TypeMismatch {
            expected: VariantKind::Vector(ScalarKind::Int32),
            actual: VariantKind::Vector(ScalarKind::Bool),
        }
    );
    assert_eq!(vector.cursor(), 0, "failed extraction must not move the cursor");
    assert!(vector.next_bool().unwrap());
}

#[test]
fn vector_count_mismatch_is_invalid_argument() {
    let err = VariantValue::from_double_vector(&[1.0, 2.0], 3).unwrap_err();
    assert_eq!(
        err,
        VariantError::InvalidArgument {
            declared: 3,
            supplied: 2
        }
    );
}

#[test]
fn from_element_copies_one_element() {
    let stamps = [FileTime::from_ticks(5), FileTime::from_ticks(9)];
    let vector = VariantValue::from_timestamp_vector(&stamps, 2).unwrap();

    let second = VariantValue::from_element(&vector, 1).unwrap();
    assert_eq!(second.kind(), VariantKind::Scalar(ScalarKind::Timestamp));
    assert_eq!(second.to_timestamp().unwrap(), FileTime::from_ticks(9));

    let err = VariantValue::from_element(&vector, 2).unwrap_err();
    assert_eq!(err, VariantError::IndexOutOfRange { index: 2, count: 2 });
}

#[test]
fn next_element_walks_any_kind() {
    let mut vector = VariantValue::from_int64_vector(&[4, 5], 2).unwrap();
    let first = vector.next_element().unwrap();
    assert_eq!(first, VariantValue::from_int64(4));
    assert_eq!(vector.cursor(), 1);
}

#[test]
fn vector_from_scalar_wraps_single_element() {
    let single = VariantValue::from_string("only").unwrap();
    let vector = VariantValue::vector_from_scalar(&single).unwrap();
    assert!(vector.is(VariantQuery::Vector));
    assert_eq!(vector.to_string_vector().unwrap(), vec!["only".to_string()]);

    let err = VariantValue::vector_from_scalar(&vector).unwrap_err();
    assert!(matches!(err, VariantError::TypeMismatch { .. }));
}

#[test]
fn string_as_vector_splits_on_semicolons() {
    let value = VariantValue::from_string_as_vector(" a; b ;;c ").unwrap();
    assert_eq!(value.kind(), VariantKind::Vector(ScalarKind::String));
    assert_eq!(value.to_string_vector().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn is_query_only_matches_strings_and_vectors() {
    let text = VariantValue::from_string("t").unwrap();
    assert!(text.is(VariantQuery::String));
    assert!(!text.is(VariantQuery::Vector));

    let strings = VariantValue::from_string_vector(&["t"], 1).unwrap();
    assert!(!strings.is(VariantQuery::String));
    assert!(strings.is(VariantQuery::Vector));

    assert!(!VariantValue::from_int32(1).is(VariantQuery::String));
}

#[test]
fn marshal_errors_for_unrepresentable_payloads() {
    assert!(matches!(
        VariantValue::from_identifier_str("not-an-id"),
        Err(VariantError::Marshal {
            kind: ScalarKind::Identifier,
            ..
        })
    ));
    assert!(matches!(
        VariantValue::from_string("a\0b"),
        Err(VariantError::Marshal {
            kind: ScalarKind::String,
            ..
        })
    ));
    assert!(matches!(
        VariantValue::from_wide(&[0xD800]),
        Err(VariantError::Marshal { .. })
    ));
    assert!(VariantValue::from_string_vector(&["ok", "bad\0"], 2).is_err());
}

#[test]
fn wide_text_decodes_utf16() {
    let units = "jump ✓".encode_utf16().collect::<Vec<_>>();
    let value = VariantValue::from_wide(&units).unwrap();
    assert_eq!(value.to_text().unwrap(), "jump ✓");
}

#[test]
fn identifier_string_and_buffer_forms() {
    let id = Uuid::parse_str(SAMPLE_ID).unwrap();

    let braced = VariantValue::from_identifier_str("{11111111-2222-4333-8444-555555555555}")
        .unwrap();
    assert_eq!(braced.to_identifier().unwrap(), id);

    let as_text = VariantValue::from_identifier_as_string(id);
    assert!(as_text.is(VariantQuery::String));
    assert_eq!(
        as_text.to_text().unwrap(),
        "{11111111-2222-4333-8444-555555555555}"
    );
    assert_eq!(as_text.to_identifier().unwrap(), id);

    let as_buffer = VariantValue::from_identifier_as_buffer(id);
    let bytes = as_buffer.to_buffer().unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(bytes[..4], [0x11, 0x11, 0x11, 0x11]);
    assert_eq!(bytes[4..6], [0x22, 0x22]);
    assert_eq!(bytes[6..8], [0x33, 0x43]);
    assert_eq!(as_buffer.to_identifier().unwrap(), id);
}

#[test]
fn compare_orders_same_kind_values() {
    let low = VariantValue::from_int32(1);
    let high = VariantValue::from_int32(2);
    assert_eq!(low.compare(&high).unwrap(), Ordering::Less);
    assert_eq!(high.compare(&low).unwrap(), Ordering::Greater);
    assert_eq!(low.compare(&VariantValue::from_int32(1)).unwrap(), Ordering::Equal);
    assert!(low < high);
    assert!(high > low);
    assert!(low == VariantValue::from_int32(1));

    let apple = VariantValue::from_string("apple").unwrap();
    let banana = VariantValue::from_string("banana").unwrap();
    assert!(apple < banana);

    assert!(VariantValue::from_bool(false) < VariantValue::from_bool(true));
    assert!(
        VariantValue::from_timestamp(FileTime::from_ticks(1))
            < VariantValue::from_timestamp(FileTime::from_ticks(2))
    );
}

#[test]
fn compare_mixes_numeric_kinds_by_value() {
    let small = VariantValue::from_int16(-1);
    let big = VariantValue::from_uint64(u64::MAX);
    assert_eq!(small.compare(&big).unwrap(), Ordering::Less);
    assert!(VariantValue::from_int32(3) == VariantValue::from_double(3.0));
    assert!(VariantValue::from_double(2.5) > VariantValue::from_uint16(2));
}

#[test]
fn compare_large_integers_against_doubles_exactly() {
    let two_pow_63 = VariantValue::from_double(9_223_372_036_854_775_808.0);
    let max = VariantValue::from_int64(i64::MAX);
    let below_max = VariantValue::from_int64(i64::MAX - 1);
    assert_eq!(max.compare(&two_pow_63).unwrap(), Ordering::Less);
    assert_eq!(below_max.compare(&two_pow_63).unwrap(), Ordering::Less);
    assert_eq!(two_pow_63.compare(&max).unwrap(), Ordering::Greater);
    assert!(max != two_pow_63);
    assert!(max > below_max);

    let two_pow_64 = VariantValue::from_double(18_446_744_073_709_551_616.0);
    let u64_max = VariantValue::from_uint64(u64::MAX);
    assert_eq!(u64_max.compare(&two_pow_64).unwrap(), Ordering::Less);
    assert_eq!(
        VariantValue::from_uint64(1 << 63).compare(&two_pow_63).unwrap(),
        Ordering::Equal
    );

    let two_pow_53 = VariantValue::from_double(9_007_199_254_740_992.0);
    let above = VariantValue::from_int64((1 << 53) + 1);
    assert_eq!(above.compare(&two_pow_53).unwrap(), Ordering::Greater);
}

#[test]
fn compare_vectors_lexicographically() {
    let short = VariantValue::from_int32_vector(&[1, 2], 2).unwrap();
    let long = VariantValue::from_int32_vector(&[1, 2, 0], 3).unwrap();
    let bigger = VariantValue::from_int32_vector(&[1, 3], 2).unwrap();
    assert_eq!(short.compare(&long).unwrap(), Ordering::Less);
    assert_eq!(bigger.compare(&long).unwrap(), Ordering::Greater);
}

#[test]
fn compare_incompatible_kinds_is_type_mismatch() {
    let text = VariantValue::from_string("1").unwrap();
    let number = VariantValue::from_int32(1);
    let err = text.compare(&number).unwrap_err();
    assert_eq!(
        err,
        VariantError::TypeMismatch {
            expected: VariantKind::Scalar(ScalarKind::String),
            actual: VariantKind::Scalar(ScalarKind::Int32),
        }
    );
    assert!(text != number);
    assert_eq!(text.partial_cmp(&number), None);

    let flag = VariantValue::from_bool(true);
    assert!(flag.compare(&number).is_err());

    let ints = VariantValue::from_int32_vector(&[1], 1).unwrap();
    let longs = VariantValue::from_int64_vector(&[1], 1).unwrap();
    assert!(ints.compare(&longs).is_err());
    assert!(ints.compare(&number).is_err());
}

#[test]
fn equality_ignores_cursor() {
    let mut read = VariantValue::from_uint32_vector(&[1, 2], 2).unwrap();
    let fresh = read.clone();
    read.next_uint32().unwrap();
    assert!(read == fresh);
}
