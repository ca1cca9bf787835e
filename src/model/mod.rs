//! Data model for decoded documents.

mod docx;
mod fragment;

pub use docx::{DocxBlock, DocxDocument, DocxParagraph, DocxRun, DocxTable};
pub use fragment::{PdfPage, TextFragment};
