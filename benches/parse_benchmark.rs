//! Parser benchmark: Measure per-tick re-parse cost.
//!
//! A revealing reply is re-parsed on every tick, so parsing a typical reply
//! has to stay well under the 10ms tick interval.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flywheel_chat::{parse, to_plain_text, RevealState, RevealUnit};

fn sample_reply(sections: usize) -> String {
    let mut reply = String::new();
    for i in 0..sections {
        reply.push_str(&format!("## Section {i}\n\nSome **bold** and *italic* text here.\n"));
        reply.push_str("- first point\n- second point\n\n");
        reply.push_str("| Name | Value |\n|:-----|------:|\n| alpha | 1 |\n| beta | 2 |\n\n");
        reply.push_str("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n");
    }
    reply
}

fn parse_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_reply");
    for sections in [1, 10, 50] {
        let reply = sample_reply(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &reply, |b, reply| {
            b.iter(|| parse(black_box(reply)));
        });
    }
    group.finish();
}

fn parse_every_prefix(c: &mut Criterion) {
    let reply = sample_reply(2);
    c.bench_function("parse_every_revealed_prefix", |b| {
        b.iter(|| {
            let mut state = RevealState::new(reply.as_str(), RevealUnit::CodePoint);
            while let Some(prefix) = state.advance() {
                black_box(parse(prefix));
            }
        });
    });
}

fn render_plain(c: &mut Criterion) {
    let blocks = parse(&sample_reply(10));
    c.bench_function("to_plain_text_10_sections", |b| {
        b.iter(|| to_plain_text(black_box(&blocks)));
    });
}

fn reveal_grapheme(c: &mut Criterion) {
    let reply = "héllo wörld 👋🏽 ".repeat(100);
    c.bench_function("reveal_grapheme_1500", |b| {
        b.iter(|| {
            let mut state = RevealState::new(reply.as_str(), RevealUnit::Grapheme);
            while state.advance().is_some() {}
            black_box(state.revealed_length())
        });
    });
}

criterion_group!(benches, parse_reply, parse_every_prefix, render_plain, reveal_grapheme);
criterion_main!(benches);
