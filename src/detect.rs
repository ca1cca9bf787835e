//! Media-type detection and the input allow-list.
//!
//! Exactly three input formats are accepted. The declared type is checked
//! before any payload byte is decoded; everything else is rejected with
//! [`Error::UnsupportedType`].

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// MIME essence for PDF input.
pub const MIME_PDF: &str = "application/pdf";

/// MIME essence for DOCX (Open XML WordprocessingML) input.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME essence for plain-text input.
pub const MIME_TEXT: &str = "text/plain";

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Zip local-file header, the outer shell of a DOCX container.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// An accepted input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/pdf`
    Pdf,
    /// Open XML WordprocessingML (`.docx`)
    Docx,
    /// `text/plain`
    Text,
}

impl MediaType {
    /// Parse a declared MIME-like type string against the allow-list.
    ///
    /// Parameters after `;` are ignored and the essence is matched
    /// ASCII-case-insensitively, so `text/plain; charset=utf-8` is accepted.
    ///
    /// # Example
    /// ```
    /// use undoc::detect::MediaType;
    ///
    /// assert_eq!(
    ///     MediaType::from_mime("application/pdf").unwrap(),
    ///     MediaType::Pdf
    /// );
    /// assert!(MediaType::from_mime("image/png").is_err());
    /// ```
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(MIME_PDF) {
            Ok(Self::Pdf)
        } else if essence.eq_ignore_ascii_case(MIME_DOCX) {
            Ok(Self::Docx)
        } else if essence.eq_ignore_ascii_case(MIME_TEXT) {
            Ok(Self::Text)
        } else {
            Err(Error::UnsupportedType(mime.to_string()))
        }
    }

    /// Map a file extension (without the leading dot) to a media type.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Text),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }

    /// Infer the media type from a file path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedType(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// The canonical MIME essence for this media type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::Docx => MIME_DOCX,
            Self::Text => MIME_TEXT,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Check whether bytes begin with the PDF magic header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Check whether bytes begin with a zip local-file header.
///
/// Every DOCX file is a zip archive; the converse does not hold, so this is
/// a cheap sanity check, not a positive identification.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert_eq!(MediaType::from_mime(MIME_PDF).unwrap(), MediaType::Pdf);
        assert_eq!(MediaType::from_mime(MIME_DOCX).unwrap(), MediaType::Docx);
        assert_eq!(MediaType::from_mime(MIME_TEXT).unwrap(), MediaType::Text);
    }

    #[test]
    fn test_parameters_and_case_ignored() {
        assert_eq!(
            MediaType::from_mime("text/plain; charset=utf-8").unwrap(),
            MediaType::Text
        );
        assert_eq!(
            MediaType::from_mime("Application/PDF").unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_everything_else_rejected() {
        for mime in ["image/png", "application/json", "text/html", ""] {
            let err = MediaType::from_mime(mime).unwrap_err();
            assert!(matches!(err, Error::UnsupportedType(_)));
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(MediaType::from_extension("pdf").unwrap(), MediaType::Pdf);
        assert_eq!(MediaType::from_extension("DOCX").unwrap(), MediaType::Docx);
        assert_eq!(MediaType::from_extension("txt").unwrap(), MediaType::Text);
        assert!(MediaType::from_extension("png").is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            MediaType::from_path("dir/report.pdf").unwrap(),
            MediaType::Pdf
        );
        assert!(MediaType::from_path("no_extension").is_err());
    }

    #[test]
    fn test_magic_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.7\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
        assert!(is_docx_bytes(b"PK\x03\x04rest"));
        assert!(!is_docx_bytes(b"%PDF-1.7"));
    }
}
