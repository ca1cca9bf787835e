//! Error types for the undoc library.

use std::io;
use thiserror::Error;

/// Result type alias for undoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during document extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared media type is not in the accepted set.
    #[error("Unsupported media type: {0} (only PDF, DOCX, and plain text are accepted)")]
    UnsupportedType(String),

    /// The PDF document structure could not be parsed.
    #[error("PDF decode failure: {0}")]
    PdfParse(String),

    /// The DOCX container or its document XML could not be parsed.
    #[error("DOCX decode failure: {0}")]
    DocxParse(String),

    /// The input exceeds the configured size limit.
    #[error("input of {size} bytes exceeds the {limit}-byte limit")]
    InputTooLarge {
        /// Size of the rejected input
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::DocxParse(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::DocxParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedType("image/png".to_string());
        assert!(err.to_string().contains("image/png"));

        let err = Error::InputTooLarge {
            size: 100,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "input of 100 bytes exceeds the 10-byte limit"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::DocxParse(_)));
    }
}
