//! PDF decoding: content streams to positioned text fragments.
//!
//! The decoder walks each page's decompressed content stream, tracking the
//! text matrix through the positioning operators, and emits one fragment per
//! shown string. Content-stream coordinates grow upward; fragments are
//! flipped against the page's MediaBox height so `y` grows downward and the
//! layout stage can sort ascending-y as top-first.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{PdfPage, TextFragment};

/// Letter-size fallback when a page carries no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Kerning adjustment (in 1/1000 text-space units) treated as a word break
/// inside a `TJ` array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// PDF document decoder.
#[derive(Debug)]
pub struct PdfDecoder {
    doc: LopdfDocument,
}

impl PdfDecoder {
    /// Load a PDF from bytes.
    ///
    /// Fails with [`Error::PdfParse`] when the header or the document
    /// structure is invalid; nothing is decoded in that case.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !detect::is_pdf_bytes(data) {
            return Err(Error::PdfParse("missing %PDF header".to_string()));
        }
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Decode every page into positioned text fragments.
    pub fn decode(&self) -> Result<Vec<PdfPage>> {
        let page_ids = self.doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());
        for (page_num, page_id) in page_ids.iter() {
            pages.push(self.decode_page(*page_num, *page_id)?);
        }
        Ok(pages)
    }

    fn decode_page(&self, page_num: u32, page_id: ObjectId) -> Result<PdfPage> {
        let page_height = self.page_height(page_id);
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.page_content(page_id)?;

        let mut page = PdfPage::new(page_num);
        self.walk_content(&content, &fonts, page_height, &mut page)?;
        log::debug!(
            "page {}: {} fragments decoded",
            page_num,
            page.fragments.len()
        );
        Ok(page)
    }

    /// Page height from the MediaBox, following the Parent chain when the
    /// entry is inherited.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Ok(media_box) = dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(DEFAULT_PAGE_HEIGHT);
                    }
                }
            }
            current = dict.get(b"Parent").ok().and_then(|p| p.as_reference().ok());
        }
        DEFAULT_PAGE_HEIGHT
    }

    /// Concatenated, decompressed page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without Contents is legal: it is simply blank.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return Ok(s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone()));
                }
                Err(Error::PdfParse("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            let data = s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone());
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("invalid content stream".to_string())),
        }
    }

    /// Walk a content stream and append one fragment per shown string.
    fn walk_content(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        page_height: f32,
        page: &mut PdfPage,
    ) -> Result<()> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut current_font: Vec<u8> = Vec::new();
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if let Some(Object::Name(font_name)) = op.operands.first() {
                        current_font = font_name.clone();
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text_block {
                        continue;
                    }
                    let encoding = fonts
                        .get(&current_font)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| -> String {
                        let text = match encoding.as_ref() {
                            Some(enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|err| {
                                    log::debug!(
                                        "glyph run decode failed ({err}); keeping raw bytes"
                                    );
                                    decode_bytes_raw(bytes)
                                }),
                            None => decode_bytes_raw(bytes),
                        };
                        text.nfc().collect()
                    };

                    let text = if op.operator == "TJ" {
                        // TJ interleaves strings with kerning adjustments;
                        // large negative adjustments stand in for spaces.
                        match op.operands.first() {
                            Some(Object::Array(arr)) => {
                                let mut combined = String::new();
                                for item in arr {
                                    match item {
                                        Object::String(bytes, _) => {
                                            combined.push_str(&decode(bytes));
                                        }
                                        Object::Integer(n) => {
                                            push_kerning_space(&mut combined, -(*n as f32));
                                        }
                                        Object::Real(n) => {
                                            push_kerning_space(&mut combined, -n);
                                        }
                                        _ => {}
                                    }
                                }
                                combined
                            }
                            _ => String::new(),
                        }
                    } else {
                        match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        }
                    };

                    push_fragment(page, &matrix, page_height, &text);
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&current_font)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                        let text: String = match encoding.as_ref() {
                            Some(enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_bytes_raw(bytes)),
                            None => decode_bytes_raw(bytes),
                        };
                        let text: String = text.nfc().collect();
                        push_fragment(page, &matrix, page_height, &text);
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn push_fragment(page: &mut PdfPage, matrix: &TextMatrix, page_height: f32, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    page.add_fragment(TextFragment::new(
        text,
        x as f64,
        (page_height - y) as f64,
    ));
}

fn push_kerning_space(combined: &mut String, adjustment: f32) {
    if adjustment > TJ_SPACE_THRESHOLD
        && !combined.is_empty()
        && !combined.ends_with(' ')
        && !combined.ends_with('\u{00A0}')
    {
        combined.push(' ');
    }
}

/// Raw text decoding when the font's declared encoding is missing or the
/// bytes refuse to decode under it: UTF-16BE with a BOM, then UTF-8, then
/// Latin-1. The fallback recovers locally; it never fails the extraction.
fn decode_bytes_raw(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default line leading; a TL-aware interpreter would use that instead.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }
}
