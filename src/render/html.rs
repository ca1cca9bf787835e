//! Heuristic HTML rendering of newline-delimited extracted text.
//!
//! One parameterized renderer serves both the upload-time preview and the
//! document-viewer re-render; the call sites differ only in heading length
//! cap and blank-line handling. No font or size information survives
//! extraction, so line classification is best-effort formatting; there is
//! nothing more authoritative to check the rules against.

use std::sync::OnceLock;

use regex::Regex;

/// Shown when a document produced no text at all.
const EMPTY_PLACEHOLDER: &str = r#"<p style="color:#888;">No extracted text found.</p>"#;

/// Fixed-height spacer emitted for blank lines in [`BlankLines::Spacer`] mode.
const SPACER: &str = r#"<div style="height:10px;"></div>"#;

/// How blank lines in the extracted text are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLines {
    /// Drop blank lines entirely (compact upload preview).
    #[default]
    Skip,

    /// Emit a fixed-height spacer, keeping the document's vertical rhythm.
    Spacer,
}

/// Options for the line-classification renderer.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Maximum character count for a line to qualify as a heading
    pub heading_max_len: usize,

    /// Blank-line handling
    pub blank_lines: BlankLines,
}

impl HtmlOptions {
    /// Compact settings used for the upload-time preview.
    pub fn preview() -> Self {
        Self {
            heading_max_len: 30,
            blank_lines: BlankLines::Skip,
        }
    }

    /// Settings used when re-rendering a stored document in the viewer.
    pub fn viewer() -> Self {
        Self {
            heading_max_len: 35,
            blank_lines: BlankLines::Spacer,
        }
    }

    /// Set the heading length cap.
    pub fn with_heading_max_len(mut self, len: usize) -> Self {
        self.heading_max_len = len;
        self
    }

    /// Set blank-line handling.
    pub fn with_blank_lines(mut self, mode: BlankLines) -> Self {
        self.blank_lines = mode;
        self
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self::preview()
    }
}

/// Escape text for insertion into HTML markup.
///
/// Extracted content comes from arbitrary uploads and must never reach
/// markup unescaped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

fn bullet_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-•]\s*").expect("bullet marker pattern"))
}

/// Render extracted text into an HTML fragment.
///
/// Per line, in precedence order: blank, heading, bullet, paragraph.
/// Consecutive bullet lines share one enclosing list. Empty input renders
/// the muted placeholder, never an empty fragment.
pub fn render_html(text: &str, options: &HtmlOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let mut out = String::new();
    let mut in_list = false;

    for raw_line in text.split('\n') {
        let line = raw_line.trim();

        if line.is_empty() {
            if options.blank_lines == BlankLines::Spacer {
                close_list(&mut out, &mut in_list);
                out.push_str(SPACER);
            }
            continue;
        }

        if is_heading(line, options.heading_max_len) {
            close_list(&mut out, &mut in_list);
            out.push_str(&format!(
                r#"<h2 style="margin:14px 0 6px;font-size:16px;font-weight:700;">{}</h2>"#,
                escape_html(line)
            ));
            continue;
        }

        if line.starts_with('•') || line.starts_with('-') {
            if !in_list {
                in_list = true;
                out.push_str(r#"<ul style="margin:6px 0 6px 18px;padding:0;">"#);
            }
            let item = bullet_marker_re().replace(line, "");
            out.push_str(&format!(
                r#"<li style="margin:6px 0;line-height:1.6;">{}</li>"#,
                escape_html(item.trim())
            ));
            continue;
        }

        close_list(&mut out, &mut in_list);
        out.push_str(&format!(
            r#"<p style="margin:6px 0;line-height:1.7;">{}</p>"#,
            escape_html(line)
        ));
    }

    close_list(&mut out, &mut in_list);
    out
}

/// Wrap plain text in an escaped preformatted block.
pub fn wrap_preformatted(text: &str) -> String {
    format!(
        r#"<pre style="white-space: pre-wrap; font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace;">{}</pre>"#,
        escape_html(text)
    )
}

/// A heading is a short line with no lowercase letters and neither `@` nor `|`.
fn is_heading(line: &str, max_len: usize) -> bool {
    line.chars().count() <= max_len
        && !line.contains('@')
        && !line.contains('|')
        && line.to_uppercase() == line
}

fn close_list(out: &mut String, in_list: &mut bool) {
    if *in_list {
        *in_list = false;
        out.push_str("</ul>");
    }
}
