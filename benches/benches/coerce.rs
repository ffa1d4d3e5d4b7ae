// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_coerce`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;

use understory_coerce::{
    Culture, DefaultValueConverter, EnumType, FuncValueConverter, PrimitiveType, TargetType,
    Value, ValueConverter, coerce,
};

fn bench_coerce(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Value={} TargetType={} ConversionNotification={}",
            core::mem::size_of::<Value>(),
            core::mem::size_of::<TargetType>(),
            core::mem::size_of::<understory_coerce::ConversionNotification>(),
        );
    });

    let i32_type = TargetType::primitive(PrimitiveType::I32);
    let f64_type = TargetType::primitive(PrimitiveType::F64);
    let alignment = EnumType::builder("Alignment")
        .member("Start", 0)
        .member("Center", 1)
        .member("End", 2)
        .build();
    let alignment_type = TargetType::enumeration(&alignment);

    let mut group = c.benchmark_group("coerce/try_convert");

    group.bench_function("assignable", |b| {
        let value = Value::I32(42);
        b.iter(|| black_box(coerce::try_convert(&i32_type, &value, &Culture::INVARIANT)));
    });

    group.bench_function("widening", |b| {
        let value = Value::I16(42);
        b.iter(|| black_box(coerce::try_convert(&f64_type, &value, &Culture::INVARIANT)));
    });

    for (name, culture, text) in [
        ("invariant", Culture::INVARIANT, "1234.5"),
        ("de-DE", Culture::DE_DE, "1.234,5"),
    ] {
        group.bench_function(BenchmarkId::new("parse_real", name), |b| {
            let value = Value::from(text);
            b.iter(|| black_box(coerce::try_convert(&f64_type, &value, &culture)));
        });
    }

    group.bench_function("enum_by_name", |b| {
        let value = Value::from("Center");
        b.iter(|| black_box(coerce::try_convert(&alignment_type, &value, &Culture::INVARIANT)));
    });

    group.bench_function("enum_from_int", |b| {
        let value = Value::I32(2);
        b.iter(|| {
            black_box(coerce::try_convert_enum(
                &value,
                &alignment_type,
                &Culture::INVARIANT,
            ))
        });
    });

    group.finish();

    let mut group = c.benchmark_group("coerce/converter");

    group.bench_function("default/success", |b| {
        let value = Value::from("42");
        b.iter(|| {
            black_box(DefaultValueConverter.convert(
                &value,
                &i32_type,
                None,
                &Culture::INVARIANT,
            ))
        });
    });

    group.bench_function("default/error", |b| {
        let value = Value::from("foo");
        b.iter(|| {
            black_box(DefaultValueConverter.convert(
                &value,
                &i32_type,
                None,
                &Culture::INVARIANT,
            ))
        });
    });

    group.bench_function("func/match", |b| {
        let converter = FuncValueConverter::infallible(|x: i32| f64::from(x) * 0.5);
        let value = Value::I32(10);
        b.iter(|| black_box(converter.convert(&value, &f64_type, None, &Culture::INVARIANT)));
    });

    group.bench_function("func/mismatch", |b| {
        let converter = FuncValueConverter::infallible(|x: i32| f64::from(x) * 0.5);
        let value = Value::from("10");
        b.iter(|| black_box(converter.convert(&value, &f64_type, None, &Culture::INVARIANT)));
    });

    group.finish();
}

criterion_group!(benches, bench_coerce);
criterion_main!(benches);
