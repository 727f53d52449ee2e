use bogo::prelude::*;

fn nested_lists(depth: usize) -> Value {
    let mut v = Value::from(1i64);
    for _ in 0..depth {
        v = Value::List(vec![v]);
    }
    v
}

#[test]
fn encoder_depth_limit() {
    let v = nested_lists(3);
    assert!(matches!(
        Encoder::new().max_depth(2).encode(&v),
        Err(EncodeError::DepthExceeded(2))
    ));
    assert!(Encoder::new().max_depth(3).encode(&v).is_ok());
    assert!(Encoder::new().max_depth(0).encode(&nested_lists(300)).is_ok());
}

#[test]
fn decoder_depth_limit() {
    let enc = encode(&nested_lists(3)).unwrap();
    assert!(matches!(
        Decoder::new().max_depth(2).decode(&enc),
        Err(DecodeError::DepthExceeded(2))
    ));
    assert!(Decoder::new().max_depth(3).decode(&enc).is_ok());
}

#[test]
fn decoder_size_limit() {
    let enc = encode(&Value::Blob(Bytes::from(vec![0u8; 1024]))).unwrap();
    assert!(matches!(
        Decoder::new().max_object_size(100).decode(&enc),
        Err(DecodeError::SizeExceeded { limit: 100, .. })
    ));
    assert!(Decoder::new().max_object_size(0).decode(&enc).is_ok());
    assert!(Decoder::new().decode(&enc).is_ok());
}

#[test]
fn version_handling() {
    // lenient decoders attempt forward compatibility
    assert_eq!(decode(&[0x01, 0x00]).unwrap(), Value::Null);
    assert!(matches!(
        Decoder::new().strict(true).decode(&[0x01, 0x00]),
        Err(DecodeError::UnsupportedVersion(0x01))
    ));
    assert!(Decoder::new().strict(true).decode(&[0x00, 0x00]).is_ok());
}

#[test]
fn unknown_kinds() {
    let data = [0x00, 0x7f, 0xaa, 0xbb];
    assert!(matches!(decode(&data), Err(DecodeError::UnknownKind(0x7f))));

    let mut dec = Decoder::new().allow_unknown_kinds(true);
    let v = dec.decode(&data).unwrap();
    assert_eq!(v, Value::Unknown(0x7f, Bytes::from_static(&[0xaa, 0xbb])));

    // the carrier re-emits its raw bytes
    let reenc = encode(&v).unwrap();
    assert_eq!(reenc, data);
}

#[test]
fn invalid_utf8_strings() {
    // String kind, two payload bytes that are not UTF-8
    let data = [0x00, 0x03, 0x01, 0x02, 0xff, 0xfe];
    assert!(matches!(
        decode(&data),
        Err(DecodeError::InvalidUtf8("string"))
    ));

    let mut dec = Decoder::new().validate_utf8(false);
    let v = dec.decode(&data).unwrap();
    assert_eq!(v.as_str(), Some("\u{FFFD}\u{FFFD}"));
}

#[test]
fn invalid_utf8_keys() {
    // one entry whose single-byte key is not UTF-8
    let frame = [0x01, 0x03, 0x01, 0xff, 0x00];
    let mut data = vec![0x00, 0x0c, 0x01, frame.len() as u8];
    data.extend_from_slice(&frame);

    assert!(matches!(
        decode(&data),
        Err(DecodeError::InvalidUtf8("object key"))
    ));
    assert!(matches!(
        Decoder::new().validate_utf8(false).strict(true).decode(&data),
        Err(DecodeError::InvalidUtf8("object key"))
    ));

    // lenient decoders carry the raw key through
    let mut dec = Decoder::new().validate_utf8(false);
    let out = dec.decode(&data).unwrap();
    let map = out.to_vecmap().unwrap();
    assert_eq!(map.get([0xffu8].as_slice()), Some(&Value::Null));
}

#[test]
fn key_too_long_is_an_encode_error() {
    let key = Bytes::from(vec![b'k'; 256]);
    let obj = Value::Object(VecMap::from(vec![(key, Value::Null)]));
    assert!(matches!(
        encode(&obj),
        Err(EncodeError::KeyTooLong(256))
    ));
}

#[test]
fn strict_encoder_rejects_non_utf8_keys() {
    let obj = Value::Object(VecMap::from(vec![(
        Bytes::from_static(&[0xff]),
        Value::Null,
    )]));
    assert!(encode(&obj).is_ok());
    assert!(matches!(
        Encoder::new().strict(true).encode(&obj),
        Err(EncodeError::InvalidUtf8("object key"))
    ));
}

#[test]
fn replacement_character_rejection() {
    let v = Value::from("lossy \u{FFFD} artifact");
    assert!(matches!(
        encode(&v),
        Err(EncodeError::ReplacementCharacter)
    ));
    assert!(Encoder::new().validate_strings(false).encode(&v).is_ok());
}

#[test]
fn compact_lists_can_be_disabled() {
    let v = Value::from(vec![1i64, 2, 3]);
    assert_eq!(encode(&v).unwrap()[1], 0x0b);

    let enc = Encoder::new().compact_lists(false).encode(&v).unwrap();
    assert_eq!(enc[1], 0x0a);
    assert_eq!(decode(&enc).unwrap(), v);
}

#[test]
fn stream_adapters() {
    let v = Value::from(vec![Value::from("a"), Value::Int(-5)]);

    let mut sink = Vec::new();
    let written = Encoder::new().write_to(&mut sink, &v).unwrap();
    assert_eq!(written, sink.len());

    let mut source = sink.as_slice();
    let out = Decoder::new().read_from(&mut source).unwrap();
    assert_eq!(out, v);
}

#[test]
fn tag_names_are_carried_for_the_record_mapper() {
    assert_eq!(Encoder::new().tag(), "bogo");
    assert_eq!(Decoder::new().tag_name("json").tag(), "json");
}

#[test]
fn decoder_state_resets_between_calls() {
    let enc = encode(&nested_lists(3)).unwrap();
    let mut dec = Decoder::new().max_depth(3);
    assert!(dec.decode(&enc).is_ok());
    // a second call starts from a clean depth and byte budget
    assert!(dec.decode(&enc).is_ok());
}
