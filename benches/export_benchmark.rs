//! Benchmarks for the output renderers.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic; no PDF parsing is involved.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfproc::config::ProcessingConfig;
use pdfproc::export::{to_html, to_json, to_markdown, to_report, to_text, ImageRefs, JsonOptions};
use pdfproc::model::{ExtractedDocument, Item, Page, TableItem, TableRow};
use pdfproc::record::ProcessingRecord;

/// Creates a document with `page_count` pages of headings, paragraphs,
/// a list and a table.
fn create_test_document(page_count: u32) -> ExtractedDocument {
    let mut doc = ExtractedDocument::new("bench");
    for n in 1..=page_count {
        let mut page = Page::new(n, 612.0, 792.0);
        page.push(Item::heading(format!("Section {}", n), 2));
        for p in 0..5 {
            page.push(Item::paragraph(format!(
                "Paragraph {} of page {} with some benchmark text & <markup> characters.",
                p, n
            )));
        }
        for i in 1..=3 {
            page.push(Item::list_item(format!("list entry {}", i), format!("{}.", i), true));
        }
        let mut table = TableItem::with_header(1);
        table.add_row(TableRow::from_strings(["Name", "Value", "Unit"]));
        for r in 0..10 {
            table.add_row(TableRow::from_strings([
                format!("row {}", r),
                format!("{}", r * n),
                "kg".to_string(),
            ]));
        }
        page.push(Item::Table(table));
        doc.add_page(page);
    }
    doc
}

fn bench_renderers(c: &mut Criterion) {
    let doc = create_test_document(20);
    let images = ImageRefs::placeholders();

    c.bench_function("markdown_20_pages", |b| {
        b.iter(|| to_markdown(black_box(&doc), &images));
    });

    c.bench_function("html_20_pages", |b| {
        b.iter(|| to_html(black_box(&doc), &images));
    });

    c.bench_function("text_20_pages", |b| {
        b.iter(|| to_text(black_box(&doc)));
    });
}

/// Benchmark the full record: statistics, summary, JSON and report.
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_document(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let record = ProcessingRecord::new(
                    Path::new("bench.pdf"),
                    1024,
                    "bench",
                    &ProcessingConfig::default(),
                    black_box(doc.clone()),
                    None,
                );
                let _ = to_json(&record, JsonOptions::default());
                to_report(&record, None)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_renderers, bench_record);
criterion_main!(benches);
