//! Proptest strategies for generating arbitrary Bogo values.

use bogo::Value;
use bytes::Bytes;
use proptest::prelude::*;

/// Arbitrary object key, well under the 255-byte limit.
pub fn arb_key() -> impl Strategy<Value = Bytes> {
    "[a-z_]{0,12}".prop_map(|s| Bytes::from(s.into_bytes()))
}

/// Arbitrary blob payload.
pub fn arb_blob() -> impl Strategy<Value = Bytes> {
    proptest::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

/// Arbitrary string free of U+FFFD, which the default encoder rejects.
pub fn arb_string() -> impl Strategy<Value = String> {
    "[^\u{FFFD}]{0,24}"
}

/// Arbitrary leaf (non-container) value.
pub fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<u8>().prop_map(Value::Byte),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        any::<f64>().prop_map(Value::Float),
        arb_string().prop_map(Value::String),
        arb_blob().prop_map(Value::Blob),
        any::<i64>().prop_map(Value::Timestamp),
    ]
}

/// Arbitrary value tree for use with proptest.
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::List),
                prop::collection::btree_map(arb_key(), inner, 0..10)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}
