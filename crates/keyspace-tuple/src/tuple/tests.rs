use super::*;

#[test]
fn test_empty_tuple() {
    let t = Tuple::new();
    assert!(t.is_empty());
    assert_eq!(t.len(), 0);

    let packed = t.pack();
    assert!(packed.is_empty());

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(t, unpacked);
}

#[test]
fn test_null_element() {
    let t = Tuple::new().push(());
    let packed = t.pack();
    assert_eq!(packed, vec![NULL_CODE]);

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::Null));
}

#[test]
fn test_string_element() {
    let packed = Tuple::new().push("hello").pack();
    assert_eq!(packed, b"\x02hello\x00".to_vec());

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::String("hello".to_string())));
}

#[test]
fn test_bytes_and_strings_have_distinct_tags() {
    let as_bytes = Tuple::new().push(b"abc".as_slice()).pack();
    let as_string = Tuple::new().push("abc").pack();

    assert_eq!(as_bytes[0], BYTES_CODE);
    assert_eq!(as_string[0], STRING_CODE);
    assert!(as_bytes < as_string);
}

#[test]
fn test_embedded_null_is_escaped() {
    let t = Tuple::new().push("a\x00b");
    let packed = t.pack();
    assert_eq!(packed, vec![STRING_CODE, b'a', 0x00, NULL_ESCAPE, b'b', 0x00]);

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::String("a\x00b".to_string())));
}

#[test]
fn test_bytes_with_trailing_null() {
    let t = Tuple::new().push(vec![0x00u8]).push(vec![0x00u8, 0x00]);
    let packed = t.pack();
    assert_eq!(packed, vec![0x01, 0x00, 0xFF, 0x00, 0x01, 0x00, 0xFF, 0x00, 0xFF, 0x00]);
    assert_eq!(Tuple::unpack(&packed).unwrap(), t);
}

#[test]
fn test_integer_zero() {
    let packed = Tuple::new().push(0i64).pack();
    assert_eq!(packed, vec![INT_ZERO_CODE]);
    assert_eq!(Tuple::unpack(&packed).unwrap().get(0), Some(&Element::Int(0)));
}

#[test]
fn test_integer_exact_encodings() {
    let cases: [(i64, &[u8]); 8] = [
        (1, &[0x15, 0x01]),
        (255, &[0x15, 0xFF]),
        (256, &[0x16, 0x01, 0x00]),
        (-1, &[0x13, 0xFE]),
        (-255, &[0x13, 0x00]),
        (-256, &[0x12, 0xFE, 0xFF]),
        (i64::MAX, &[0x1C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        (i64::MIN, &[0x0C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
    ];

    for (n, expected) in cases {
        let packed = Tuple::new().push(n).pack();
        assert_eq!(packed, expected, "encoding failed for n={n}");
        assert_eq!(Tuple::unpack(&packed).unwrap().get(0), Some(&Element::Int(n)), "decoding failed for n={n}");
    }
}

#[test]
fn test_integer_roundtrip_across_sizes() {
    for n in [127i64, 128, 65535, 65536, 1 << 24, 1 << 32, 1 << 40, 1 << 48, 1 << 56] {
        for value in [n, -n, n - 1, -(n - 1)] {
            let packed = Tuple::new().push(value).pack();
            assert_eq!(Tuple::unpack(&packed).unwrap().get(0), Some(&Element::Int(value)), "failed for {value}");
        }
    }
}

#[test]
fn test_integer_ordering() {
    let values = [i64::MIN, -65536, -256, -255, -1, 0, 1, 255, 256, 65536, i64::MAX];
    let packed: Vec<Vec<u8>> = values.iter().map(|&n| Tuple::new().push(n).pack()).collect();

    for pair in packed.windows(2) {
        assert!(pair[0] < pair[1], "{:?} should sort before {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_u64_beyond_i64_is_out_of_range() {
    let err = Element::try_from(i64::MAX as u64 + 1).unwrap_err();
    assert!(matches!(err, TupleError::IntegerOutOfRange { .. }));

    assert_eq!(Element::try_from(i64::MAX as u64).unwrap(), Element::Int(i64::MAX));
}

#[test]
fn test_i128_boundaries() {
    assert_eq!(Element::try_from(i64::MIN as i128).unwrap(), Element::Int(i64::MIN));
    assert!(matches!(Element::try_from(i64::MIN as i128 - 1), Err(TupleError::IntegerOutOfRange { .. })));
    assert!(matches!(Element::try_from(i64::MAX as i128 + 1), Err(TupleError::IntegerOutOfRange { .. })));
}

#[test]
fn test_try_push() {
    let t = Tuple::new().try_push(42u64).unwrap();
    assert_eq!(t.get(0), Some(&Element::Int(42)));

    assert!(Tuple::new().try_push(u64::MAX).is_err());
}

#[test]
fn test_decode_positive_overflow() {
    let data = [0x1C, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::IntegerOutOfRange { .. })));
}

#[test]
fn test_decode_negative_overflow() {
    // Magnitude 2^63 + 1 has no i64 representation.
    let data = [0x0C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::IntegerOutOfRange { .. })));

    let data = [0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::IntegerOutOfRange { .. })));
}

#[test]
fn test_unknown_type_code() {
    let err = Tuple::unpack(&[0x14, 0x33]).unwrap_err();
    match err {
        TupleError::UnknownTypeCode { code, offset } => {
            assert_eq!(code, 0x33);
            assert_eq!(offset, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_truncated_string() {
    assert!(matches!(Tuple::unpack(b"\x02abc"), Err(TupleError::Truncated { offset: 0 })));
    // An escaped null is not a terminator.
    assert!(matches!(Tuple::unpack(&[0x01, b'a', 0x00, 0xFF]), Err(TupleError::Truncated { .. })));
}

#[test]
fn test_truncated_integer() {
    assert!(matches!(Tuple::unpack(&[0x16, 0x01]), Err(TupleError::Truncated { offset: 0 })));
}

#[test]
fn test_invalid_utf8() {
    assert!(matches!(Tuple::unpack(&[0x02, 0xC3, 0x28, 0x00]), Err(TupleError::InvalidUtf8 { .. })));
}

#[test]
fn test_mixed_tuple_roundtrip() {
    let t = Tuple::new().push(()).push("users").push(vec![0u8, 1, 2]).push(-42i64).push(42u32);
    assert_eq!(Tuple::unpack(&t.pack()).unwrap(), t);
}

#[test]
fn test_self_terminating_concatenation() {
    let a = Tuple::new().push("a\x00").push(-7i64);
    let b = Tuple::new().push(vec![0u8, 0xFF]).push(()).push(1000i64);

    let mut packed = a.pack();
    b.pack_into(&mut packed);

    let decoded = Tuple::unpack(&packed).unwrap();
    assert_eq!(decoded, a.clone().concat(&b));
    assert_eq!(decoded.len(), a.len() + b.len());
}

#[test]
fn test_type_ordering() {
    let null = Tuple::new().push(()).pack();
    let bytes = Tuple::new().push(vec![0xFFu8]).pack();
    let string = Tuple::new().push("").pack();
    let int = Tuple::new().push(i64::MIN).pack();

    assert!(null < bytes);
    assert!(bytes < string);
    assert!(string < int);
}

#[test]
fn test_tuple_prefix_ordering() {
    let short = Tuple::new().push("a");
    let long = Tuple::new().push("a").push(0i64);
    let next = Tuple::new().push("b");

    assert!(short < long);
    assert!(long < next);
}

#[test]
fn test_range() {
    let prefix = Tuple::new().push("users");
    let (start, end) = prefix.range();

    assert_eq!(start, b"\x02users\x00\x00".to_vec());
    assert_eq!(end, b"\x02users\x00\xFF".to_vec());

    let inside = prefix.clone().push(()).pack();
    let also_inside = prefix.clone().push("zzz").push(1i64).pack();
    assert!(start <= inside && inside < end);
    assert!(start <= also_inside && also_inside < end);

    let outside = Tuple::new().push("users2").pack();
    assert!(!(start <= outside && outside < end));
    assert!(prefix.pack() < start);
}

#[test]
fn test_strinc() {
    assert_eq!(strinc(b"abc"), Some(b"abd".to_vec()));
    assert_eq!(strinc(&[0x01, 0xFF, 0xFF]), Some(vec![0x02]));
    assert_eq!(strinc(&[0xFF, 0xFF]), None);
    assert_eq!(strinc(&[]), None);
}

#[test]
fn test_element_accessors() {
    assert_eq!(Element::Int(5).as_int(), Some(5));
    assert_eq!(Element::from("x").as_str(), Some("x"));
    assert_eq!(Element::from(b"x").as_bytes(), Some(b"x".as_slice()));
    assert_eq!(Element::Null.as_int(), None);
}
