//! Plain-text extraction: the buffer itself, plus a preformatted preview.

use super::{DocumentConverter, ExtractOptions, Extraction};
use crate::decode::decode_plain_text;
use crate::detect::MediaType;
use crate::error::Result;
use crate::render::wrap_preformatted;

/// Converter for `text/plain`.
#[derive(Debug, Default)]
pub struct TextConverter;

impl TextConverter {
    /// Create a new plain-text converter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for TextConverter {
    fn media_type(&self) -> MediaType {
        MediaType::Text
    }

    fn name(&self) -> &str {
        "text"
    }

    fn extract(&self, data: &[u8], _options: &ExtractOptions) -> Result<Extraction> {
        let text = decode_plain_text(data).trim_end().to_string();
        let preview_html = wrap_preformatted(&text);
        Ok(Extraction { text, preview_html })
    }
}
