//! DOCX extraction: plain text and HTML derived independently from the tree.

use super::{DocumentConverter, ExtractOptions, Extraction};
use crate::decode::decode_docx;
use crate::detect::MediaType;
use crate::error::Result;

/// Converter for Open XML WordprocessingML documents.
#[derive(Debug, Default)]
pub struct DocxConverter;

impl DocxConverter {
    /// Create a new DOCX converter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for DocxConverter {
    fn media_type(&self) -> MediaType {
        MediaType::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, data: &[u8], _options: &ExtractOptions) -> Result<Extraction> {
        let doc = decode_docx(data)?;
        Ok(Extraction {
            text: doc.plain_text(),
            preview_html: doc.to_html(),
        })
    }
}
