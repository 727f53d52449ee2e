use bogo::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_value() -> Value {
    let row: Vec<Value> = (0..N_ARR).map(|i| Value::from(i as i64)).collect();
    let map: VecMap<Bytes, Value> = (0..N_MAP)
        .map(|i| {
            (
                Bytes::from(format!("key_{i:02}").into_bytes()),
                Value::from(row.clone()),
            )
        })
        .collect();
    let rows: Vec<Value> = std::iter::repeat(Value::Object(map)).take(N_ARR).collect();
    Value::List(rows)
}

fn wide_object() -> Value {
    Value::Object(VecMap::from(vec![
        (
            Bytes::from_static(b"large_payload"),
            Value::Blob(Bytes::from(vec![0xab; 10_000])),
        ),
        (
            Bytes::from_static(b"target_field"),
            Value::from("important_value_we_want"),
        ),
        (Bytes::from_static(b"status"), Value::from("active")),
    ]))
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("construct", |b| b.iter(|| black_box(big_value())));
}

fn bench_enc(c: &mut Criterion) {
    let v = big_value();
    let len = encode(&v).unwrap().len();
    c.bench_function(&format!("encode {len} bytes"), move |b| {
        b.iter(|| encode(black_box(&v)).unwrap())
    });
}

fn bench_dec(c: &mut Criterion) {
    let enc = encode(&big_value()).unwrap();
    c.bench_function(&format!("decode {} bytes", enc.len()), move |b| {
        b.iter(|| decode(black_box(&enc)).unwrap())
    });
}

fn bench_full_field_decode(c: &mut Criterion) {
    let enc = encode(&wide_object()).unwrap();
    c.bench_function("field decode, full object", move |b| {
        b.iter(|| decode(black_box(&enc)).unwrap())
    });
}

fn bench_selective_field_decode(c: &mut Criterion) {
    let enc = encode(&wide_object()).unwrap();
    c.bench_function("field decode, selective", move |b| {
        let mut dec = Decoder::new().selective_fields(["target_field"]);
        b.iter(|| dec.decode(black_box(&enc)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_dec,
    bench_full_field_decode,
    bench_selective_field_decode
);
criterion_main!(benches);
