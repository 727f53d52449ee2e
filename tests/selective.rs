use bogo::prelude::*;

fn pair(key: &'static str, value: Value) -> (Bytes, Value) {
    (Bytes::from_static(key.as_bytes()), value)
}

fn wide_object() -> Value {
    Value::Object(VecMap::from(vec![
        pair("payload", Value::Blob(Bytes::from(vec![0xab; 10 * 1024]))),
        pair("status", Value::from("active")),
        pair("target", Value::from("important_value_we_want")),
    ]))
}

#[test]
fn selective_returns_requested_fields_only() {
    let enc = encode(&wide_object()).unwrap();

    let mut dec = Decoder::new().selective_fields(["target"]);
    let out = dec.decode(&enc).unwrap();
    let map = out.to_vecmap().unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(
        map.get(b"target".as_slice()).and_then(Value::as_str),
        Some("important_value_we_want")
    );
}

#[test]
fn selective_subset_matches_full_decode() {
    let enc = encode(&wide_object()).unwrap();

    let full = decode(&enc).unwrap();
    let full = full.to_vecmap().unwrap();

    let mut dec = Decoder::new().selective_fields(["target", "status"]);
    let out = dec.decode(&enc).unwrap();
    let map = out.to_vecmap().unwrap();

    assert_eq!(map.len(), 2);
    for key in [b"target".as_slice(), b"status".as_slice()] {
        assert_eq!(map.get(key), full.get(key));
    }
    assert!(map.get(b"payload".as_slice()).is_none());
}

#[test]
fn selective_with_absent_key_returns_empty_object() {
    let enc = encode(&wide_object()).unwrap();

    let mut dec = Decoder::new().selective_fields(["missing"]);
    let out = dec.decode(&enc).unwrap();
    assert_eq!(out.to_vecmap().map(VecMap::len), Some(0));
}

#[test]
fn selective_applies_at_every_object_level() {
    let inner = Value::Object(VecMap::from(vec![
        pair("target", Value::from(1i64)),
        pair("noise", Value::from(2i64)),
    ]));
    let outer = Value::Object(VecMap::from(vec![
        pair("sub", inner),
        pair("target", Value::from(3i64)),
    ]));
    let enc = encode(&outer).unwrap();

    // keys are literal and the same set filters each level
    let mut dec = Decoder::new().selective_fields(["sub", "target"]);
    let out = dec.decode(&enc).unwrap();
    let map = out.to_vecmap().unwrap();

    assert_eq!(map.get(b"target".as_slice()).and_then(Value::to_i64), Some(3));
    let sub = map.get(b"sub".as_slice()).and_then(Value::to_vecmap).unwrap();
    assert_eq!(sub.len(), 1);
    assert_eq!(sub.get(b"target".as_slice()).and_then(Value::to_i64), Some(1));
}

#[test]
fn skipped_entries_are_never_examined() {
    // corrupt the skipped blob's kind byte; a full decode trips over it,
    // a selective decode must not even notice
    let enc = encode(&wide_object()).unwrap();
    let mut corrupted = enc.clone();
    let key_at = enc
        .windows(7)
        .position(|w| w == b"payload".as_slice())
        .expect("payload key present");
    corrupted[key_at + 7] = 0x7f;

    assert!(matches!(
        decode(&corrupted),
        Err(DecodeError::UnknownKind(0x7f))
    ));

    let mut dec = Decoder::new().selective_fields(["target"]);
    let out = dec.decode(&corrupted).unwrap();
    assert_eq!(
        out.to_vecmap()
            .unwrap()
            .get(b"target".as_slice())
            .and_then(Value::as_str),
        Some("important_value_we_want")
    );
}

#[test]
fn selective_stops_early_once_all_fields_are_found() {
    // one valid entry holding Int 1 under key "t", then garbage the
    // early exit must never reach (an entry-size varint with L = 0)
    let frame = [
        0x01, 0x05, // entry size 5
        0x01, b't', // key
        0x05, 0x01, 0x02, // Int 1
        0x00, // garbage
    ];
    let mut data = vec![0x00, 0x0c, 0x01, frame.len() as u8];
    data.extend_from_slice(&frame);

    assert!(matches!(decode(&data), Err(DecodeError::InvalidVarint(_))));

    let mut dec = Decoder::new().selective_fields(["t"]);
    let out = dec.decode(&data).unwrap();
    assert_eq!(
        out.to_vecmap().unwrap().get(b"t".as_slice()).and_then(Value::to_i64),
        Some(1)
    );
}

#[test]
fn duplicate_keys_decode_last_write_wins() {
    // two entries under the same key, hand-built because the encoder's
    // map cannot produce duplicates
    let frame = [
        0x01, 0x05, 0x01, b'k', 0x05, 0x01, 0x02, // k = Int 1
        0x01, 0x05, 0x01, b'k', 0x05, 0x01, 0x04, // k = Int 2
    ];
    let mut data = vec![0x00, 0x0c, 0x01, frame.len() as u8];
    data.extend_from_slice(&frame);

    let out = decode(&data).unwrap();
    let map = out.to_vecmap().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(b"k".as_slice()).and_then(Value::to_i64), Some(2));
}
