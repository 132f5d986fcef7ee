//! Performance benchmarks for registration and lookup
//!
//! Run with: cargo bench --bench path_resolution

use chrono::{DateTime, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use typepath::types::Number;
use typepath::{ConvertError, Registry};

fn date_registry() -> Registry {
    let registry = Registry::new();
    registry.register_fn(|n: i32| Ok(i64::from(n)));
    registry.register_fn(|millis: i64| {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| ConvertError::failed("i64", "DateTime<Utc>", "out of range"))
    });
    registry.register_fn(|date: DateTime<Utc>| Ok(date.to_rfc3339()));
    registry
}

fn bench_registry_construction(c: &mut Criterion) {
    c.bench_function("registry_new_with_builtins", |b| {
        b.iter(|| black_box(Registry::new()));
    });

    c.bench_function("registry_new_with_string_parsing", |b| {
        b.iter(|| black_box(Registry::builder().string_parsing(true).build()));
    });
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("register_with_path_building", |b| {
        b.iter(|| black_box(date_registry()));
    });
}

fn bench_lookup(c: &mut Criterion) {
    let registry = date_registry();

    c.bench_function("get_direct_hit", |b| {
        b.iter(|| registry.get_typed::<i32, Number>());
    });

    c.bench_function("get_chained", |b| {
        b.iter(|| registry.get_typed::<i32, String>());
    });

    c.bench_function("get_null_fallback", |b| {
        b.iter(|| registry.get_typed::<typepath::types::Void, String>());
    });

    c.bench_function("get_miss", |b| {
        b.iter(|| registry.get_typed::<bool, DateTime<Utc>>());
    });
}

fn bench_conversion(c: &mut Criterion) {
    let registry = date_registry();
    let mut group = c.benchmark_group("convert");

    for millis in [0i32, 1_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("i32_to_rfc3339", millis), &millis, |b, &m| {
            b.iter(|| registry.convert(black_box(m)).to::<String>());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_registry_construction,
    bench_registration,
    bench_lookup,
    bench_conversion
);
criterion_main!(benches);
