//! Rendering of extracted text into display-ready HTML.

mod html;

pub use html::{escape_html, render_html, wrap_preformatted, BlankLines, HtmlOptions};
