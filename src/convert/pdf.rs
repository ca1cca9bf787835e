//! PDF extraction: decode positioned fragments, reconstruct reading order.

use super::{DocumentConverter, ExtractOptions, Extraction};
use crate::decode::PdfDecoder;
use crate::detect::MediaType;
use crate::error::Result;
use crate::layout;

/// Converter for `application/pdf`.
///
/// The preview is intentionally empty: callers render the original PDF
/// bytes directly instead of a derived fragment, and the stored plain text
/// can always be re-rendered with [`crate::render::render_html`].
#[derive(Debug, Default)]
pub struct PdfConverter;

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for PdfConverter {
    fn media_type(&self) -> MediaType {
        MediaType::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<Extraction> {
        let pages = PdfDecoder::from_bytes(data)?.decode()?;
        let text = layout::document_text(&pages, options.parallel);
        Ok(Extraction {
            text,
            preview_html: String::new(),
        })
    }
}
