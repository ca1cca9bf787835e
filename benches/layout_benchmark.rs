//! Benchmarks for reading-order reconstruction.
//!
//! Run with: cargo bench
//!
//! These exercise the layout stage with synthetic fragment bags; decoding
//! is covered by the integration tests and benches would mostly measure
//! inflate throughput there.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use undoc::layout;
use undoc::{PdfPage, TextFragment};

/// Create a page of `lines * fragments_per_line` fragments with slight
/// sub-tolerance jitter on `y`, delivered in reverse order so the sort has
/// real work to do.
fn synthetic_page(lines: usize, fragments_per_line: usize) -> PdfPage {
    let mut page = PdfPage::new(1);
    for line in 0..lines {
        let y = 40.0 + line as f64 * 1.25 + (line % 3) as f64 * 0.004;
        for slot in 0..fragments_per_line {
            let x = 5.0 + slot as f64 * 6.5;
            page.add_fragment(TextFragment::new(format!("w{line}x{slot}"), x, y));
        }
    }
    page.fragments.reverse();
    page
}

fn bench_page_text(c: &mut Criterion) {
    let page = synthetic_page(60, 12);
    c.bench_function("layout_page_text", |b| {
        b.iter(|| layout::page_text(black_box(&page)))
    });
}

fn bench_document_text(c: &mut Criterion) {
    let pages: Vec<PdfPage> = (0..20).map(|_| synthetic_page(60, 12)).collect();

    c.bench_function("layout_document_text_parallel", |b| {
        b.iter(|| layout::document_text(black_box(&pages), true))
    });
    c.bench_function("layout_document_text_sequential", |b| {
        b.iter(|| layout::document_text(black_box(&pages), false))
    });
}

criterion_group!(benches, bench_page_text, bench_document_text);
criterion_main!(benches);
