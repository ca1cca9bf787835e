//! Positioned text fragments decoded from PDF pages.

use serde::{Deserialize, Serialize};

/// A run of decoded glyphs at a page position.
///
/// Coordinates are in page units with `y` growing downward, so the top of
/// the page has the smallest `y`. Fragments arrive in content-stream order,
/// which bears no relation to reading order; many fragments share a visual
/// line while differing in `y` by less than the layout tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Decoded text content
    pub text: String,

    /// Left edge of the fragment
    pub x: f64,

    /// Vertical position (top-down)
    pub y: f64,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// A single decoded PDF page: positioned fragments in content-stream order.
///
/// Pages are independent of each other; no state crosses a page boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfPage {
    /// 1-indexed page number
    pub number: u32,

    /// Fragments in content-stream order
    pub fragments: Vec<TextFragment>,
}

impl PdfPage {
    /// Create a new empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    /// Append a fragment.
    pub fn add_fragment(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Check whether the page carries any fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_accumulates_fragments() {
        let mut page = PdfPage::new(1);
        assert!(page.is_empty());

        page.add_fragment(TextFragment::new("Hello", 1.0, 5.0));
        page.add_fragment(TextFragment::new("World", 7.5, 5.0));

        assert_eq!(page.number, 1);
        assert_eq!(page.fragments.len(), 2);
        assert_eq!(page.fragments[0].text, "Hello");
    }
}
