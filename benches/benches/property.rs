// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_property` + `understory_style`.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::rc::Rc;
use std::sync::Once;

use understory_coerce::{PrimitiveType, TargetType, Value};
use understory_property::{
    InstancedBinding, PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin,
    StyleSource, StyledElement, StyledElementExt, ValueSubject,
};
use understory_style::{FuncTemplate, Setter, SetterValue, StyleBuilder};

#[derive(Clone, Default)]
struct Elem {
    store: PropertyStore,
}

impl StyledElement for Elem {
    fn property_store(&self) -> &PropertyStore {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }
}

fn bench_property(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: PropertyStore={} Elem={}",
            core::mem::size_of::<PropertyStore>(),
            core::mem::size_of::<Elem>(),
        );
    });

    let mut registry = PropertyRegistry::new();
    let width = registry.register(
        "Width",
        PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
    );
    let content = registry.register(
        "Content",
        PropertyMetadataBuilder::new(TargetType::any(), Value::Null).build(),
    );

    let mut group = c.benchmark_group("property/resolve");

    group.bench_function("local", |b| {
        let mut element = Elem::default();
        element.set_value(&width, 100.0_f64);
        b.iter(|| black_box(element.get_value(&width)));
    });

    group.bench_function("style", |b| {
        let mut element = Elem::default();
        element.set_style_value(&width, StyleSource::new(StyleOrigin::Sheet), 50.0_f64);
        b.iter(|| black_box(element.get_value(&width)));
    });

    group.bench_function("default", |b| {
        let element = Elem::default();
        b.iter(|| black_box(element.get_value(&width)));
    });

    group.finish();

    let mut group = c.benchmark_group("property/mutate");

    group.bench_function("set_value/assignable", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                black_box(element.set_value(&width, 123.0_f64));
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("set_value/parsed", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                black_box(element.set_value(&width, "123.5"));
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("sync_bindings", |b| {
        let subject = ValueSubject::with_value(0_i32);
        let mut element = Elem::default();
        element.bind(
            &width,
            StyleSource::new(StyleOrigin::Sheet),
            InstancedBinding::new(Rc::new(subject.clone())),
        );
        let mut next = 0_i32;
        b.iter(|| {
            next = next.wrapping_add(1);
            subject.next(next);
            black_box(element.sync_bindings())
        });
    });

    group.finish();

    let mut group = c.benchmark_group("style/apply");

    let literal = StyleBuilder::new()
        .origin(StyleOrigin::Sheet)
        .setter(Setter::new(width.clone(), SetterValue::literal(50_i32)).unwrap())
        .build();
    group.bench_function("literal", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                literal.apply(&mut element, None).unwrap();
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    let template = StyleBuilder::new()
        .setter(
            Setter::new(
                content.clone(),
                SetterValue::template(FuncTemplate::new(Elem::default)),
            )
            .unwrap(),
        )
        .build();
    group.bench_function("template", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                template.apply(&mut element, None).unwrap();
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
