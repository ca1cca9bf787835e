//! Structural model for DOCX documents.
//!
//! The decoder produces this tree; plain text and preview HTML are derived
//! from it independently, so an edit to the stored text never has to
//! round-trip through the original file.

use serde::{Deserialize, Serialize};

use crate::render::escape_html;

/// A parsed DOCX document body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxDocument {
    /// Top-level blocks in document order
    pub blocks: Vec<DocxBlock>,
}

/// A top-level DOCX block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocxBlock {
    /// A paragraph of styled runs
    Paragraph(DocxParagraph),
    /// A table, flattened to rows of plain-text cells
    Table(DocxTable),
}

/// A paragraph with an optional named style and its styled runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxParagraph {
    /// Paragraph style name from `w:pStyle` (e.g. `Heading1`)
    pub style: Option<String>,

    /// Whether the paragraph carries list numbering (`w:numPr`)
    pub list_item: bool,

    /// Runs in paragraph order
    pub runs: Vec<DocxRun>,
}

impl DocxParagraph {
    /// Concatenated, whitespace-normalized paragraph text.
    pub fn text(&self) -> String {
        let raw: String = self.runs.iter().map(|r| r.text.as_str()).collect();
        normalize_text(&raw)
    }

    /// Heading level derived from the paragraph style (`Heading1`..`Heading6`,
    /// `Title` variants), or `None` for body paragraphs.
    pub fn heading_level(&self) -> Option<usize> {
        let style = self.style.as_deref()?.trim();
        if style.is_empty() {
            return None;
        }
        let lowered = style.to_lowercase();
        if lowered.starts_with("heading") || lowered.starts_with("title") {
            let digits: String = lowered.chars().filter(|ch| ch.is_ascii_digit()).collect();
            if let Ok(level) = digits.parse::<usize>() {
                if level > 0 && level <= 6 {
                    return Some(level);
                }
            }
            return Some(1);
        }
        None
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            let mut piece = escape_html(&run.text).replace('\n', "<br />");
            if run.italic {
                piece = format!("<em>{piece}</em>");
            }
            if run.bold {
                piece = format!("<strong>{piece}</strong>");
            }
            out.push_str(&piece);
        }
        out
    }
}

/// A run of text with character formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxRun {
    /// Decoded run text; tabs and explicit breaks appear as `\t` and `\n`
    pub text: String,

    /// `w:b` flag
    pub bold: bool,

    /// `w:i` flag
    pub italic: bool,
}

/// A table, flattened to rows of plain-text cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxTable {
    /// Rows of cell text, in document order
    pub rows: Vec<Vec<String>>,
}

impl DocxDocument {
    /// Check whether the document carries any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flat plain-text rendition: non-empty blocks joined by a blank line,
    /// table cells tab-separated within their row.
    pub fn plain_text(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();
        for block in &self.blocks {
            let text = match block {
                DocxBlock::Paragraph(p) => p.text(),
                DocxBlock::Table(t) => t
                    .rows
                    .iter()
                    .map(|row| row.join("\t"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            if !text.trim().is_empty() {
                blocks.push(text);
            }
        }
        blocks.join("\n\n")
    }

    /// Preview HTML derived directly from the structural tree.
    ///
    /// Headings map to `<h1>`..`<h6>` via the paragraph style, numbered
    /// paragraphs group into `<ul>` lists, runs keep bold/italic emphasis,
    /// and tables become plain `<table>` markup. All text is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut in_list = false;

        for block in &self.blocks {
            match block {
                DocxBlock::Paragraph(p) => {
                    if p.text().is_empty() {
                        continue;
                    }
                    if p.list_item {
                        if !in_list {
                            in_list = true;
                            out.push_str("<ul>");
                        }
                        out.push_str(&format!("<li>{}</li>", p.inner_html()));
                        continue;
                    }
                    close_list(&mut out, &mut in_list);
                    match p.heading_level() {
                        Some(level) => {
                            out.push_str(&format!("<h{level}>{}</h{level}>", p.inner_html()))
                        }
                        None => out.push_str(&format!("<p>{}</p>", p.inner_html())),
                    }
                }
                DocxBlock::Table(t) => {
                    close_list(&mut out, &mut in_list);
                    out.push_str("<table>");
                    for row in &t.rows {
                        out.push_str("<tr>");
                        for cell in row {
                            out.push_str(&format!("<td>{}</td>", escape_html(cell)));
                        }
                        out.push_str("</tr>");
                    }
                    out.push_str("</table>");
                }
            }
        }

        close_list(&mut out, &mut in_list);
        out
    }
}

fn close_list(out: &mut String, in_list: &mut bool) {
    if *in_list {
        *in_list = false;
        out.push_str("</ul>");
    }
}

/// Collapse whitespace runs to single spaces, keeping explicit line breaks.
fn normalize_text(text: &str) -> String {
    let mut output = String::new();
    let mut last_space = false;
    for ch in text.chars() {
        if ch == '\r' {
            continue;
        }
        if ch == '\n' {
            if !output.ends_with('\n') {
                output.push('\n');
            }
            last_space = false;
            continue;
        }
        if ch.is_whitespace() {
            if !last_space {
                output.push(' ');
                last_space = true;
            }
            continue;
        }
        output.push(ch);
        last_space = false;
    }
    output.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> DocxParagraph {
        DocxParagraph {
            runs: vec![DocxRun {
                text: text.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_heading_level_from_style() {
        let mut p = paragraph("Overview");
        assert_eq!(p.heading_level(), None);

        p.style = Some("Heading2".to_string());
        assert_eq!(p.heading_level(), Some(2));

        p.style = Some("Title".to_string());
        assert_eq!(p.heading_level(), Some(1));

        p.style = Some("Heading9".to_string());
        assert_eq!(p.heading_level(), Some(1));

        p.style = Some("BodyText".to_string());
        assert_eq!(p.heading_level(), None);
    }

    #[test]
    fn test_plain_text_joins_blocks() {
        let doc = DocxDocument {
            blocks: vec![
                DocxBlock::Paragraph(paragraph("First")),
                DocxBlock::Paragraph(paragraph("")),
                DocxBlock::Paragraph(paragraph("Second")),
            ],
        };
        assert_eq!(doc.plain_text(), "First\n\nSecond");
    }

    #[test]
    fn test_table_plain_text() {
        let doc = DocxDocument {
            blocks: vec![DocxBlock::Table(DocxTable {
                rows: vec![
                    vec!["a".to_string(), "b".to_string()],
                    vec!["c".to_string(), "d".to_string()],
                ],
            })],
        };
        assert_eq!(doc.plain_text(), "a\tb\nc\td");
    }

    #[test]
    fn test_html_headings_and_lists() {
        let mut heading = paragraph("Summary");
        heading.style = Some("Heading1".to_string());
        let mut item_a = paragraph("first");
        item_a.list_item = true;
        let mut item_b = paragraph("second");
        item_b.list_item = true;

        let doc = DocxDocument {
            blocks: vec![
                DocxBlock::Paragraph(heading),
                DocxBlock::Paragraph(item_a),
                DocxBlock::Paragraph(item_b),
                DocxBlock::Paragraph(paragraph("closing")),
            ],
        };

        let html = doc.to_html();
        assert_eq!(
            html,
            "<h1>Summary</h1><ul><li>first</li><li>second</li></ul><p>closing</p>"
        );
    }

    #[test]
    fn test_html_emphasis_and_escaping() {
        let doc = DocxDocument {
            blocks: vec![DocxBlock::Paragraph(DocxParagraph {
                runs: vec![
                    DocxRun {
                        text: "bold".to_string(),
                        bold: true,
                        ..Default::default()
                    },
                    DocxRun {
                        text: " & <plain>".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })],
        };

        let html = doc.to_html();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("&amp; &lt;plain&gt;"));
        assert!(!html.contains("<plain>"));
    }
}
