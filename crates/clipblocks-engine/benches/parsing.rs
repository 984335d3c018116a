use clipblocks_engine::{
    format::{FormatOptions, Formatter},
    parse,
    parsing::lexer::tokenize,
};
use criterion::{Criterion, criterion_group, criterion_main};
use pulldown_cmark::Parser;
mod common;

fn bench_pulldown_cmark_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_megabyte_markdown(1_000_000);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.bench_function("tokenize", |b| {
        b.iter(|| {
            let tokens = tokenize(std::hint::black_box(&content)).count();
            std::hint::black_box(tokens);
        });
    });

    group.bench_function("parse", |b| {
        b.iter(|| {
            let nodes = parse(std::hint::black_box(&content));
            std::hint::black_box(nodes);
        });
    });

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    group.sample_size(10);

    let nodes = parse(&common::generate_markdown_content(500));
    let formatter = Formatter::new(FormatOptions::default()).unwrap();
    group.bench_function("format_and_chunk", |b| {
        b.iter(|| {
            let doc = formatter.format(std::hint::black_box(&nodes));
            std::hint::black_box(doc);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pulldown_cmark_baseline, bench_format);
criterion_main!(benches);
