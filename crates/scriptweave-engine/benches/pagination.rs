use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use scriptweave_engine::{
    Cmd, Screenplay,
    pagination::{CancellationToken, ExportSettings, LivePaginator, MonospaceStylesheet, paginate},
};
mod common;

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    group.sample_size(20);

    let settings = ExportSettings::default();
    let style = MonospaceStylesheet::new();
    let cancel = CancellationToken::new();

    for scenes in [10, 100, 500] {
        let doc = Screenplay::parse_full(&common::generate_screenplay(scenes));
        group.bench_function(format!("{scenes}_scenes"), |b| {
            b.iter(|| {
                let result = paginate(black_box(doc.lines()), &settings, &style, &cancel);
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_live_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("live_paginate");
    group.sample_size(20);

    let settings = ExportSettings::default();
    let style = MonospaceStylesheet::new();
    let cancel = CancellationToken::new();
    let mut doc = Screenplay::parse_full(&common::generate_screenplay(500));

    // Edit near the end so most pages are reusable
    let at = doc.len().saturating_sub(20);
    doc.apply(Cmd::InsertText {
        at,
        text: "x".to_string(),
    });

    group.bench_function("edit_near_end", |b| {
        b.iter_batched(
            || live_copy(&doc, &settings, &style),
            |mut live| {
                let result = live.paginate(black_box(doc.lines()), &settings, &style, &cancel);
                black_box(result.pages.len());
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

/// A live paginator primed with the state before the edit.
fn live_copy(doc: &Screenplay, settings: &ExportSettings, style: &MonospaceStylesheet) -> LivePaginator {
    let mut before = doc.clone();
    let at = before.len().saturating_sub(21);
    before.apply(Cmd::DeleteRange { range: at..at + 1 });
    let mut live = LivePaginator::new();
    live.paginate(before.lines(), settings, style, &CancellationToken::new());
    live
}

criterion_group!(benches, bench_paginate, bench_live_paginate);
criterion_main!(benches);
