//! Decoders turning raw document bytes into structural representations.
//!
//! Each decoder owns one format: PDF bytes become pages of positioned
//! fragments, DOCX bytes become a paragraph/run tree, plain text is decoded
//! as UTF-8. A structural failure aborts the whole extraction; there are no
//! partial results.

mod docx;
mod pdf;
mod text;

pub use docx::decode_docx;
pub use pdf::PdfDecoder;
pub use text::decode_plain_text;
