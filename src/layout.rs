//! Reading-order reconstruction for positioned PDF fragments.
//!
//! A decoded page is an unordered bag of fragments. This module buckets them
//! into lines by quantized vertical position, orders each line left to
//! right, and joins fragments with gap-based word spacing. The heuristic is
//! deliberately approximate: with no real glyph metrics available it targets
//! a best-effort word/line segmentation adequate for display and search, not
//! a reproduction of exact visual spacing.

use rayon::prelude::*;

use crate::model::{PdfPage, TextFragment};

/// Vertical quantization step: fragments whose `y` rounds to the same
/// 0.01-unit bucket belong to one line.
pub const LINE_TOLERANCE: f64 = 0.01;

/// Horizontal gap (in page units) above which a space separates two
/// consecutive fragments on a line.
pub const GAP_THRESHOLD: f64 = 1.0;

/// Estimated average glyph width used to approximate a fragment's right edge.
pub const AVG_GLYPH_WIDTH: f64 = 0.6;

/// Quantize a vertical position to its line bucket.
///
/// An integer key sidesteps float equality; sorting on `(key, x)` and doing
/// one linear sweep replaces any float-keyed map.
fn line_key(y: f64) -> i64 {
    (y / LINE_TOLERANCE).round() as i64
}

/// Reconstruct the reading-order text of a single page.
///
/// Lines are emitted top to bottom, fragments within a line left to right.
/// Whitespace runs collapse to single spaces; lines that end up empty are
/// dropped.
pub fn page_text(page: &PdfPage) -> String {
    let mut ordered: Vec<&TextFragment> = page
        .fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    ordered.sort_by(|a, b| {
        line_key(a.y)
            .cmp(&line_key(b.y))
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_key: Option<i64> = None;
    let mut prev_right: Option<f64> = None;

    for fragment in ordered {
        let key = line_key(fragment.y);
        if current_key != Some(key) {
            flush_line(&mut lines, &mut current);
            current_key = Some(key);
            prev_right = None;
        }

        let text = fragment.text.trim();
        if let Some(right) = prev_right {
            if fragment.x - right > GAP_THRESHOLD {
                current.push(' ');
            }
        }
        current.push_str(text);
        prev_right = Some(fragment.x + text.chars().count() as f64 * AVG_GLYPH_WIDTH);
    }
    flush_line(&mut lines, &mut current);

    lines.join("\n")
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    let collapsed = collapse_whitespace(current);
    if !collapsed.is_empty() {
        lines.push(collapsed);
    }
    current.clear();
}

/// Collapse whitespace runs to single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assemble the full document text: non-empty pages joined by a blank line,
/// the result trimmed as a whole.
///
/// Pages are independent, so multi-page reconstruction may run in parallel;
/// page order is preserved either way and the output is identical.
pub fn document_text(pages: &[PdfPage], parallel: bool) -> String {
    let page_texts: Vec<String> = if parallel {
        pages.par_iter().map(page_text).collect()
    } else {
        pages.iter().map(page_text).collect()
    };

    page_texts
        .iter()
        .filter(|text| !text.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(fragments: Vec<TextFragment>) -> PdfPage {
        PdfPage {
            number: 1,
            fragments,
        }
    }

    #[test]
    fn test_fragments_sorted_by_x_within_line() {
        let page = page_with(vec![
            TextFragment::new("B", 10.0, 5.0),
            TextFragment::new("A", 1.0, 5.0),
        ]);
        assert_eq!(page_text(&page), "A B");
    }

    #[test]
    fn test_line_grouping_tolerance() {
        // 5.001 and 5.004 round to the same bucket; 5.02 does not.
        let same = page_with(vec![
            TextFragment::new("left", 0.0, 5.001),
            TextFragment::new("right", 20.0, 5.004),
        ]);
        assert_eq!(page_text(&same).lines().count(), 1);

        let different = page_with(vec![
            TextFragment::new("upper", 0.0, 5.0),
            TextFragment::new("lower", 0.0, 5.02),
        ]);
        assert_eq!(page_text(&different).lines().count(), 2);
    }

    #[test]
    fn test_gap_inserts_space() {
        // Right edge of "Hello" is 0 + 5 * 0.6 = 3.0; gap to x=20 is 17.0.
        let page = page_with(vec![
            TextFragment::new("Hello", 0.0, 1.0),
            TextFragment::new("World", 20.0, 1.0),
        ]);
        assert_eq!(page_text(&page), "Hello World");
    }

    #[test]
    fn test_small_gap_joins_without_space() {
        // Right edge of "Hel" is 1.8; the next fragment starts exactly there.
        let page = page_with(vec![
            TextFragment::new("Hel", 0.0, 1.0),
            TextFragment::new("lo", 1.8, 1.0),
        ]);
        assert_eq!(page_text(&page), "Hello");
    }

    #[test]
    fn test_empty_fragments_dropped() {
        let page = page_with(vec![
            TextFragment::new("  ", 0.0, 1.0),
            TextFragment::new("kept", 5.0, 1.0),
            TextFragment::new("", 9.0, 1.0),
        ]);
        assert_eq!(page_text(&page), "kept");
    }

    #[test]
    fn test_inner_whitespace_collapses() {
        let page = page_with(vec![TextFragment::new("a  \t b", 0.0, 1.0)]);
        assert_eq!(page_text(&page), "a b");
    }

    #[test]
    fn test_empty_page_contributes_nothing() {
        let pages = vec![
            page_with(vec![TextFragment::new("one", 0.0, 1.0)]),
            PdfPage::new(2),
            page_with(vec![TextFragment::new("three", 0.0, 1.0)]),
        ];
        assert_eq!(document_text(&pages, false), "one\n\nthree");
    }

    #[test]
    fn test_pages_joined_by_blank_line() {
        let pages = vec![
            page_with(vec![TextFragment::new("first", 0.0, 1.0)]),
            page_with(vec![TextFragment::new("second", 0.0, 1.0)]),
        ];
        assert_eq!(document_text(&pages, false), "first\n\nsecond");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<PdfPage> = (0..8)
            .map(|n| {
                page_with(vec![
                    TextFragment::new(format!("page{n}b"), 10.0, 2.0),
                    TextFragment::new(format!("page{n}a"), 0.0, 2.0),
                ])
            })
            .collect();
        assert_eq!(document_text(&pages, true), document_text(&pages, false));
    }

    #[test]
    fn test_no_fragments_yields_empty_string() {
        assert_eq!(document_text(&[], false), "");
        assert_eq!(document_text(&[PdfPage::new(1)], true), "");
    }
}
