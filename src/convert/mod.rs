//! The extraction pipeline: converters, registry, options, and result types.
//!
//! One converter serves each accepted media type; a [`ConverterRegistry`]
//! dispatches on the declared MIME type. The registry's contents are the
//! allow-list: a type without a registered converter is rejected before a
//! single payload byte is inspected.

mod docx;
mod pdf;
mod text;

pub use docx::DocxConverter;
pub use pdf::PdfConverter;
pub use text::TextConverter;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::render::HtmlOptions;

/// Default input size limit: 64 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

/// Options for a single extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum accepted input size in bytes (0 = unlimited)
    pub max_input_bytes: usize,

    /// Whether multi-page reconstruction may run in parallel
    pub parallel: bool,

    /// HTML rendering configuration for previews
    pub html: HtmlOptions,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input size limit (0 disables the guard).
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set HTML rendering options.
    pub fn with_html(mut self, html: HtmlOptions) -> Self {
        self.html = html;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            parallel: true,
            html: HtmlOptions::default(),
        }
    }
}

/// The outcome of one extraction.
///
/// Re-running extraction on identical bytes yields an identical value; the
/// pipeline holds no state across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Flat plain-text rendition; for PDF, page breaks are blank lines
    pub text: String,

    /// Display-ready, fully escaped HTML fragment (empty for PDF)
    pub preview_html: String,
}

/// Trait for per-format document converters.
///
/// Implement this trait to replace how one of the accepted media types is
/// handled.
pub trait DocumentConverter: Send + Sync {
    /// The media type this converter serves.
    fn media_type(&self) -> MediaType;

    /// Short converter name for logs and lookups.
    fn name(&self) -> &str;

    /// Extract text and preview HTML from raw document bytes.
    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<Extraction>;
}

/// Registry of converters keyed by media type.
pub struct ConverterRegistry {
    converters: HashMap<MediaType, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry with the three default converters (PDF, DOCX, plain text).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfConverter::new()));
        registry.register(Arc::new(DocxConverter::new()));
        registry.register(Arc::new(TextConverter::new()));
        registry
    }

    /// Register a converter, replacing any previous one for its media type.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        self.converters.insert(converter.media_type(), converter);
    }

    /// Check whether a media type has a registered converter.
    pub fn supports(&self, media_type: MediaType) -> bool {
        self.converters.contains_key(&media_type)
    }

    /// Get the converter for a media type.
    pub fn get(&self, media_type: MediaType) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&media_type).cloned()
    }

    /// Run one extraction.
    ///
    /// The declared type is checked against the allow-list and the size
    /// guard fires before any decoding starts; unsupported input never has
    /// its payload inspected.
    pub fn extract(
        &self,
        data: &[u8],
        media_type: &str,
        options: &ExtractOptions,
    ) -> Result<Extraction> {
        let media_type = MediaType::from_mime(media_type)?;
        let converter = self
            .get(media_type)
            .ok_or_else(|| Error::UnsupportedType(media_type.to_string()))?;

        if options.max_input_bytes > 0 && data.len() > options.max_input_bytes {
            return Err(Error::InputTooLarge {
                size: data.len(),
                limit: options.max_input_bytes,
            });
        }

        log::debug!("extracting {} bytes via {}", data.len(), converter.name());
        converter.extract(data, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
