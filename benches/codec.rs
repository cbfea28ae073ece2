use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use toon_codec::{
    decode, encode, from_str, to_string, to_value, toon, DecodeOptions, Delimiter, EncodeOptions,
    Value,
};

#[derive(Serialize, Deserialize, Clone)]
struct Span {
    trace: String,
    op: String,
    ms: f64,
    ok: bool,
}

/// Uniform records that the encoder lays out as a table. Every third op
/// name carries a comma so rows mix bare and quoted cells.
fn trace_spans(count: u32) -> Vec<Span> {
    (0..count)
        .map(|i| Span {
            trace: format!("t{:04x}", i),
            op: if i % 3 == 0 {
                format!("fetch, attempt {}", i)
            } else {
                format!("parse.block{}", i)
            },
            ms: f64::from(i) * 0.75 + 0.05,
            ok: i % 7 != 0,
        })
        .collect()
}

/// Strings the quoting policy passes through untouched.
fn bare_words(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("w{i}.seg")).collect()
}

/// Strings that all trip a quoting rule: active delimiter, numeric shape,
/// or a literal lookalike.
fn quoted_phrases(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("retry, backoff {i}"),
            1 => format!("{i:04}"),
            _ => "null".to_string(),
        })
        .collect()
}

/// Same element count, three different surface forms: the cost of shape
/// selection and of each emitter.
fn benchmark_shape_selection(c: &mut Criterion) {
    let inline = to_value(&bare_words(64)).unwrap();
    let tabular = to_value(&trace_spans(64)).unwrap();
    let list = Value::Array(
        (0..64)
            .map(|i| {
                if i % 2 == 0 {
                    Value::from(i)
                } else {
                    toon!({ "idx": i })
                }
            })
            .collect(),
    );
    let options = EncodeOptions::default();

    let mut group = c.benchmark_group("encode_shape");

    group.bench_function("inline", |b| b.iter(|| encode(black_box(&inline), &options)));
    group.bench_function("tabular", |b| b.iter(|| encode(black_box(&tabular), &options)));
    group.bench_function("list", |b| b.iter(|| encode(black_box(&list), &options)));

    group.finish();
}

fn benchmark_tabular_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabular");

    for size in [16u32, 64, 256, 1024] {
        let spans = trace_spans(size);
        let text = to_string(&spans).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &spans, |b, spans| {
            b.iter(|| to_string(black_box(spans)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Span>>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_quoting(c: &mut Criterion) {
    let bare = bare_words(128);
    let quoted = quoted_phrases(128);

    let mut group = c.benchmark_group("quoting");

    group.bench_function("bare_strings", |b| b.iter(|| to_string(black_box(&bare))));
    group.bench_function("quoted_strings", |b| b.iter(|| to_string(black_box(&quoted))));

    group.finish();
}

fn benchmark_delimiters(c: &mut Criterion) {
    let value = to_value(&trace_spans(128)).unwrap();

    let mut group = c.benchmark_group("delimiters");

    for (name, delimiter) in [
        ("comma", Delimiter::Comma),
        ("tab", Delimiter::Tab),
        ("pipe", Delimiter::Pipe),
    ] {
        let options = EncodeOptions::new().with_delimiter(delimiter);
        group.bench_function(name, |b| b.iter(|| encode(black_box(&value), &options)));
    }
    group.finish();
}

fn benchmark_decode_modes(c: &mut Criterion) {
    let text = to_string(&trace_spans(256)).unwrap();
    let lenient = DecodeOptions::default();
    let strict = DecodeOptions::strict();

    let mut group = c.benchmark_group("decode_modes");

    group.bench_function("lenient", |b| b.iter(|| decode(black_box(&text), &lenient)));
    group.bench_function("strict", |b| b.iter(|| decode(black_box(&text), &strict)));

    group.finish();
}

fn benchmark_dynamic_values(c: &mut Criterion) {
    let value = toon!({
        "id": 42,
        "metadata": {
            "created": "2026-02-11T09:14:00Z",
            "updated": "2026-06-30T17:45:10Z",
            "version": 3
        },
        "tags": ["important", "verified", "production"],
        "mixed": [1, { "note": "gift" }, [2, 3]]
    });
    let encode_options = EncodeOptions::default();
    let text = encode(&value, &encode_options);
    let decode_options = DecodeOptions::default();

    let mut group = c.benchmark_group("dynamic");

    group.bench_function("encode", |b| {
        b.iter(|| encode(black_box(&value), &encode_options))
    });

    group.bench_function("decode", |b| {
        b.iter(|| decode(black_box(&text), &decode_options))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_shape_selection,
    benchmark_tabular_throughput,
    benchmark_quoting,
    benchmark_delimiters,
    benchmark_decode_modes,
    benchmark_dynamic_values
);
criterion_main!(benches);
