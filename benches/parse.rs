use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gfmark::{parse, ParseOptions};

fn sample_document() -> String {
    let mut doc = String::new();
    for i in 0..200 {
        doc.push_str(&format!("## Section {i}\n\n"));
        doc.push_str("A paragraph with **bold**, *emphasis*, `code`, and a [link](https://example.com/page).\n\n");
        doc.push_str("- first item\n- second item with *markup*\n- third item\n\n");
        doc.push_str("> A quoted line\n> continued here.\n\n");
        doc.push_str("```rust\nfn demo() -> u32 {\n    42\n}\n```\n\n");
        doc.push_str("| col a | col b |\n| --- | --- |\n| 1 | 2 |\n\n");
    }
    doc
}

fn bench_parse(c: &mut Criterion) {
    let input = sample_document();
    let plain = ParseOptions::default();
    let gfm = ParseOptions {
        tables: true,
        strikethrough: true,
        task_lists: true,
        autolink_text: true,
        ..Default::default()
    };

    c.bench_function("parse_commonmark", |b| {
        b.iter(|| parse(black_box(&input), &plain))
    });
    c.bench_function("parse_gfm", |b| b.iter(|| parse(black_box(&input), &gfm)));
    c.bench_function("parse_and_render_html", |b| {
        b.iter(|| parse(black_box(&input), &gfm).to_html())
    });
    c.bench_function("parse_and_render_markdown", |b| {
        b.iter(|| parse(black_box(&input), &gfm).to_markdown())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
