//! Renderer Benchmarks
//!
//! Renders an `each` list of rows with a click handler per row, comparing a
//! memoized re-render against one where the list was replaced.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tether_core::render::Renderer;
use tether_core::view::tags::{button, li, span, ul};
use tether_core::{each, SessionContext, Signal};

fn list(size: usize) -> (Signal<Vec<u64>>, Renderer) {
    let cx = SessionContext::new();
    let items = cx.signal((0..size as u64).collect::<Vec<_>>()).unwrap();
    let view = ul().child(each(items.clone(), |n: &u64| {
        let n = *n;
        li().child(span().child(n))
            .child(button().on("onclick", move || {
                black_box(n);
            }).child("x"))
    }));
    (items, Renderer::new(view))
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("memoized", size), &size, |b, &size| {
            let (_, mut renderer) = list(size);
            renderer.render().unwrap();
            b.iter(|| black_box(renderer.render().unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("replaced", size), &size, |b, &size| {
            let (items, mut renderer) = list(size);
            renderer.render().unwrap();
            b.iter(|| {
                items.update(|items| items.iter().rev().copied().collect());
                black_box(renderer.render().unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
