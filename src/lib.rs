//! # undoc
//!
//! Document text extraction for uploaded files: PDF, DOCX, and plain text
//! in; normalized plain text and a fully escaped HTML preview out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undoc::extract;
//!
//! fn main() -> undoc::Result<()> {
//!     let data = std::fs::read("report.pdf")?;
//!     let extraction = extract(&data, "application/pdf")?;
//!     println!("{}", extraction.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three input formats**: PDF (positioned-fragment layout
//!   reconstruction), DOCX (WordprocessingML tree), plain text; declared
//!   types outside this set are rejected before any decoding
//! - **Reading-order recovery**: quantized line grouping with gap-based
//!   word spacing for PDF pages
//! - **Safe previews**: uploads are untrusted; every HTML fragment is
//!   escaped before it reaches markup
//! - **Deterministic**: identical bytes always produce identical text
//! - **Parallel processing**: multi-page documents reconstruct with Rayon

pub mod convert;
pub mod decode;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConverterRegistry, DocumentConverter, DocxConverter, ExtractOptions, Extraction,
    PdfConverter, TextConverter,
};
pub use detect::{MediaType, MIME_DOCX, MIME_PDF, MIME_TEXT};
pub use error::{Error, Result};
pub use model::{DocxDocument, PdfPage, TextFragment};
pub use render::{escape_html, render_html, BlankLines, HtmlOptions};

use std::path::Path;

/// Extract text and preview HTML from document bytes.
///
/// # Arguments
///
/// * `data` - Raw document bytes
/// * `media_type` - Declared MIME-like type; must be one of the three
///   accepted types
///
/// # Example
///
/// ```
/// use undoc::{extract, MIME_TEXT};
///
/// let extraction = extract(b"hello", MIME_TEXT).unwrap();
/// assert_eq!(extraction.text, "hello");
/// ```
pub fn extract(data: &[u8], media_type: &str) -> Result<Extraction> {
    extract_with_options(data, media_type, &ExtractOptions::default())
}

/// Extract with custom options.
///
/// # Example
///
/// ```no_run
/// use undoc::{extract_with_options, ExtractOptions, MIME_PDF};
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let options = ExtractOptions::new().sequential();
/// let extraction = extract_with_options(&data, MIME_PDF, &options).unwrap();
/// ```
pub fn extract_with_options(
    data: &[u8],
    media_type: &str,
    options: &ExtractOptions,
) -> Result<Extraction> {
    ConverterRegistry::with_defaults().extract(data, media_type, options)
}

/// Extract from a file, inferring the media type from its extension.
///
/// # Example
///
/// ```no_run
/// use undoc::extract_file;
///
/// let extraction = extract_file("notes.txt").unwrap();
/// println!("{}", extraction.preview_html);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let media_type = MediaType::from_path(&path)?;
    let data = std::fs::read(path)?;
    extract_with_options(&data, media_type.mime(), &ExtractOptions::default())
}

/// Extract on a blocking thread from an async context.
///
/// Extraction is CPU-bound; this moves it off the async executor via
/// `spawn_blocking` and awaits the single outcome.
#[cfg(feature = "async")]
pub async fn extract_async(
    data: Vec<u8>,
    media_type: String,
    options: ExtractOptions,
) -> Result<Extraction> {
    tokio::task::spawn_blocking(move || extract_with_options(&data, &media_type, &options))
        .await
        .map_err(|e| Error::Other(format!("extraction task failed: {e}")))?
}

/// Builder for configuring extractions.
///
/// # Example
///
/// ```no_run
/// use undoc::Undoc;
///
/// let extraction = Undoc::new()
///     .sequential()
///     .heading_max_len(35)
///     .blank_line_spacers()
///     .extract_file("handout.docx")?;
/// # Ok::<(), undoc::Error>(())
/// ```
pub struct Undoc {
    options: ExtractOptions,
    registry: ConverterRegistry,
}

impl Undoc {
    /// Create a new builder with the default converters.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            registry: ConverterRegistry::with_defaults(),
        }
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Set the input size limit in bytes (0 disables the guard).
    pub fn max_input_bytes(mut self, limit: usize) -> Self {
        self.options.max_input_bytes = limit;
        self
    }

    /// Set the heading length cap for HTML previews.
    pub fn heading_max_len(mut self, len: usize) -> Self {
        self.options.html.heading_max_len = len;
        self
    }

    /// Render blank lines as fixed-height spacers instead of dropping them.
    pub fn blank_line_spacers(mut self) -> Self {
        self.options.html.blank_lines = BlankLines::Spacer;
        self
    }

    /// Replace the HTML rendering options wholesale.
    pub fn html_options(mut self, html: HtmlOptions) -> Self {
        self.options.html = html;
        self
    }

    /// Replace the converter for one media type.
    pub fn register(mut self, converter: std::sync::Arc<dyn DocumentConverter>) -> Self {
        self.registry.register(converter);
        self
    }

    /// Extract text and preview HTML from document bytes.
    pub fn extract(&self, data: &[u8], media_type: &str) -> Result<Extraction> {
        self.registry.extract(data, media_type, &self.options)
    }

    /// Extract from a file, inferring the media type from its extension.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let media_type = MediaType::from_path(&path)?;
        let data = std::fs::read(path)?;
        self.extract(&data, media_type.mime())
    }
}

impl Default for Undoc {
    fn default() -> Self {
        Self::new()
    }
}
