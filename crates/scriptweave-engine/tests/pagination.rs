//! Pagination over whole documents: coverage, dialogue splits, cancellation
//! and live reuse.

use std::{
    collections::BTreeMap,
    ops::Range,
    sync::atomic::{AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;
use scriptweave_engine::{
    Cmd, LineType, Screenplay,
    pagination::{
        BreakReason, CancellationToken, ElementStyle, ExportSettings, LivePaginator,
        MonospaceStylesheet, PaginationResult, PaperSize, Stylesheet, build_blocks, paginate,
    },
};

fn long_script(scenes: usize) -> String {
    let mut out = String::new();
    for n in 1..=scenes {
        out.push_str(&format!("INT. OFFICE {n} - DAY\n\n"));
        out.push_str(&format!(
            "Phones ring in office {n}. Nobody answers them. A printer jams and keeps \
             blinking while the clock on the wall runs slow.\n\n"
        ));
        out.push_str("ALICE\n(quietly)\nWe should go. The meeting started ten minutes ago.\n");
        out.push_str("They will notice. They always notice when we are late.\n\n");
        out.push_str("BOB ^\nFive more minutes.\n\n");
    }
    out
}

/// Every printed source line is covered by fragments that tile it exactly
/// once, and page ranges tile the document.
fn assert_covers(doc: &Screenplay, result: &PaginationResult) {
    let mut fragments: BTreeMap<usize, Vec<Range<usize>>> = BTreeMap::new();
    for page in &result.pages {
        for block in &page.blocks {
            for line in block.lines.iter().chain(&block.right) {
                if !line.generated {
                    fragments.entry(line.line_index).or_default().push(line.range.clone());
                }
            }
        }
    }
    for (index, ranges) in &fragments {
        let mut next = 0;
        for range in ranges {
            assert_eq!(range.start, next, "line {index} fragments {ranges:?}");
            next = range.end;
        }
        assert_eq!(next, doc.lines()[*index].len(), "line {index} not fully printed");
    }

    let mut next = 0;
    for page in &result.pages {
        assert_eq!(page.range.start, next, "page {} range", page.number);
        next = page.range.end;
    }
    assert_eq!(next, doc.len());
}

#[test]
fn pages_cover_the_document() {
    let doc = Screenplay::parse_full(&long_script(40));
    let style = MonospaceStylesheet::new();
    let result = paginate(doc.lines(), &ExportSettings::default(), &style, &CancellationToken::new());
    assert!(result.pages.len() > 5);
    assert!(!result.canceled);
    assert_covers(&doc, &result);
    for page in &result.pages {
        assert!(page.used_height <= page.max_height, "page {} overflows", page.number);
    }
    assert_eq!(result.breaks.len(), result.pages.len() - 1);
}

#[test]
fn small_pages_split_dialogue() {
    let mut text = String::new();
    for n in 1..=8 {
        text.push_str(&format!("INT. HALL {n} - NIGHT\n\n"));
        text.push_str("Lights flicker.\nA door creaks.\nWind howls.\nSomeone coughs.\n\nALICE\n");
        for line in 1..=6 {
            text.push_str(&format!("Part {line} of what I need to say\n"));
        }
        text.push('\n');
    }
    let doc = Screenplay::parse_full(&text);
    let style = MonospaceStylesheet::new().with_page_height(12);
    let result = paginate(doc.lines(), &ExportSettings::default(), &style, &CancellationToken::new());
    assert_covers(&doc, &result);
    assert!(
        result
            .breaks
            .iter()
            .any(|b| b.reason == BreakReason::DialogueSplit)
    );
}

#[test]
fn long_dialogue_splits_with_more_and_contd() {
    let mut text = String::new();
    for n in 1..=45 {
        text.push_str(&format!("Rain falls on row {n}.\n"));
    }
    text.push_str("\nALICE\n");
    for n in 1..=40 {
        text.push_str(&format!("I say thing number {n}.\n"));
    }
    let doc = Screenplay::parse_full(&text);
    let settings = ExportSettings {
        paper: PaperSize::Letter,
        ..Default::default()
    };
    let result = paginate(doc.lines(), &settings, &MonospaceStylesheet::new(), &CancellationToken::new());

    // 45 rows of action leave 10 rows: margin, cue, 7 lines and (MORE)
    assert_eq!(result.pages.len(), 2);
    let first = &result.pages[0];
    assert_eq!(first.break_reason, BreakReason::DialogueSplit);
    assert_eq!(first.used_height, 55);
    let head = first.blocks.last().unwrap();
    assert_eq!(head.lines.len(), 9);
    assert_eq!(head.lines[7].text, "I say thing number 7.");
    assert_eq!(head.lines[8].text, "(MORE)");
    assert_eq!(head.lines[8].kind, LineType::More);

    let second = &result.pages[1];
    assert!(second.starts_with_continuation);
    let tail = &second.blocks[0];
    assert_eq!(tail.lines[0].text, "ALICE (CONT'D)");
    assert!(tail.lines[0].generated);
    assert_eq!(tail.lines[1].text, "I say thing number 8.");
    assert_eq!(tail.lines.len(), 34);
    assert_covers(&doc, &result);
}

/// Cancels its token after a fixed number of measurements.
struct CancelingStylesheet {
    inner: MonospaceStylesheet,
    cancel: CancellationToken,
    calls: AtomicUsize,
    limit: usize,
}

impl Stylesheet for CancelingStylesheet {
    fn page_height(&self, paper: PaperSize) -> usize {
        self.inner.page_height(paper)
    }

    fn element(&self, kind: LineType) -> ElementStyle {
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.limit {
            self.cancel.cancel();
        }
        self.inner.element(kind)
    }
}

#[test]
fn canceling_mid_run_returns_partial_pages() {
    let doc = Screenplay::parse_full(&long_script(60));
    let settings = ExportSettings::default();
    let blocks = build_blocks(doc.lines(), &settings);
    let cancel = CancellationToken::new();
    let style = CancelingStylesheet {
        inner: MonospaceStylesheet::new().with_page_height(20),
        cancel: cancel.clone(),
        calls: AtomicUsize::new(0),
        limit: 200,
    };

    let result = paginate(doc.lines(), &settings, &style, &cancel);

    assert!(result.canceled);
    let processed = result.pages.last().map_or(0, |p| p.end_block + 1);
    assert!(processed < blocks.len());
    assert!(result.pages.len() <= processed);
    for (n, page) in result.pages.iter().enumerate() {
        assert_eq!(page.number, n + 1);
    }
}

#[test]
fn live_pagination_matches_fresh_after_edits() {
    let mut doc = Screenplay::parse_full(&long_script(30));
    let settings = ExportSettings::default();
    let style = MonospaceStylesheet::new().with_page_height(30);
    let cancel = CancellationToken::new();
    let mut live = LivePaginator::new();
    live.paginate(doc.lines(), &settings, &style, &cancel);

    let edits = [
        (doc.len(), "Coda.\n\n"),
        (doc.text().find("INT. OFFICE 20").unwrap_or(0), "EXT. ROOF - NIGHT\n\nWind.\n\n"),
        (0, "Cold open.\n\n"),
    ];
    for (at, text) in edits {
        doc.apply(Cmd::InsertText {
            at,
            text: text.to_string(),
        });
        let incremental = live.paginate(doc.lines(), &settings, &style, &cancel).clone();
        let fresh = paginate(doc.lines(), &settings, &style, &cancel);
        assert_eq!(incremental, fresh);
        assert_covers(&doc, &incremental);
    }
}

#[test]
fn hidden_revisions_are_not_marked() {
    let mut doc = Screenplay::parse_full("INT. LAB - DAY\n\nThe beaker hisses.\n");
    doc.set_revision_generation(Some(3));
    doc.apply(Cmd::InsertText {
        at: 33,
        text: " loudly".into(),
    });
    let style = MonospaceStylesheet::new();
    let cancel = CancellationToken::new();

    let hidden = paginate(doc.lines(), &ExportSettings::default(), &style, &cancel);
    assert_eq!(hidden.pages[0].blocks[1].lines[0].revision, None);

    let settings = ExportSettings {
        visible_revisions: [3].into_iter().collect(),
        ..Default::default()
    };
    let shown = paginate(doc.lines(), &settings, &style, &cancel);
    assert_eq!(shown.pages[0].blocks[1].lines[0].revision, Some(3));
    assert_eq!(shown.pages[0].blocks[1].lines[0].text, "The beaker hisses loudly.");
}
