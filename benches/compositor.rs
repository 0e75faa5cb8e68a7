//! Compositor benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zt_editor::highlight::KeywordTable;
use zt_editor::renderer::{compose, encode, Scene, Size, Viewport};

fn source_text() -> String {
    (0..2000)
        .map(|i| format!("int value_{} = compute({}, \"text\"); // line {}\n", i, i * 3, i))
        .collect()
}

fn keywords() -> KeywordTable {
    KeywordTable::parse("int 32\nreturn 35\nif 33\nelse 33\nwhile 34\nfor 34\nchar 32\nvoid 32\n")
}

fn bench_compose_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    let text = source_text();
    let keywords = keywords();

    group.bench_function("compose_top", |b| {
        b.iter(|| {
            let scene = Scene {
                text: text.as_bytes(),
                caret: 0,
                selection: None,
                keywords: &keywords,
                status: "file:bench.c  ready",
            };
            black_box(compose(&scene, Viewport::default(), Size::new(120, 40)))
        })
    });

    group.finish();
}

fn bench_compose_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    let text = source_text();
    let keywords = keywords();

    // Caret at the end pays the full position scan and scroll
    group.bench_function("compose_end_with_selection", |b| {
        b.iter(|| {
            let scene = Scene {
                text: text.as_bytes(),
                caret: text.len(),
                selection: Some(text.len() / 2..text.len()),
                keywords: &keywords,
                status: "file:bench.c  ready",
            };
            black_box(compose(&scene, Viewport::default(), Size::new(120, 40)))
        })
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    let text = source_text();
    let keywords = keywords();
    let scene = Scene {
        text: text.as_bytes(),
        caret: 0,
        selection: None,
        keywords: &keywords,
        status: "file:bench.c  ready",
    };
    let frame = compose(&scene, Viewport::default(), Size::new(120, 40));

    group.bench_function("encode_ansi", |b| b.iter(|| black_box(encode(black_box(&frame)))));

    group.finish();
}

criterion_group!(benches, bench_compose_top, bench_compose_end, bench_encode);
criterion_main!(benches);
