//! Document building and serialization benchmarks
//!
//! Measures how long it takes to fill pages with text and write them out.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use folio::{Border, CellFlow, CellOptions, Document, DocumentConfig, FinishedDocument};

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

fn build(pages: usize, compress: bool) -> FinishedDocument {
    let config = DocumentConfig {
        compress,
        ..DocumentConfig::default()
    };
    let mut doc = Document::new(config).expect("default config is valid");
    for page in 0..pages {
        doc.add_page().expect("page");
        doc.define_anchor(format!("page-{}", page)).expect("anchor");
        doc.set_font("Helvetica", "B", 14.0).expect("font");
        doc.cell(
            CellOptions::new(0.0, 20.0)
                .text(format!("Page {}", page + 1))
                .border(Border::parse("B"))
                .flow(CellFlow::NextLine),
        )
        .expect("cell");
        doc.set_font("Times", "", 11.0).expect("font");
        let width = doc.page_size().width - 2.0 * doc.margins().left;
        for _ in 0..6 {
            for line in doc.split_text(LOREM, width) {
                doc.write_text(14.0, &line).expect("text");
                doc.line_break(-1.0).expect("line break");
            }
        }
        doc.write_internal_link(14.0, "Back to the first page", "page-0").expect("link");
    }
    doc.finish().expect("finish")
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for pages in [1, 10, 100] {
        group.throughput(Throughput::Elements(pages as u64));
        for compress in [false, true] {
            let doc = build(pages, compress);
            let label = if compress { "compressed" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(label, pages), &doc, |b, doc| {
                b.iter(|| doc.serialize(Vec::with_capacity(64 * 1024)).expect("serialize"));
            });
        }
    }
    group.finish();
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for pages in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("pages", pages), &pages, |b, &pages| {
            b.iter(|| build(pages, false));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_serialize, benchmark_build);
criterion_main!(benches);
