//! Plain-text decoding.

use std::borrow::Cow;

/// Decode a byte buffer as UTF-8 text, replacing invalid sequences.
///
/// Plain text has no structure to recover; the decoded buffer is used
/// verbatim as the extracted text.
pub fn decode_plain_text(data: &[u8]) -> String {
    match String::from_utf8_lossy(data) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8() {
        assert_eq!(decode_plain_text("héllo\nworld".as_bytes()), "héllo\nworld");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let decoded = decode_plain_text(&[b'o', b'k', 0xFF, 0xFE]);
        assert!(decoded.starts_with("ok"));
        assert!(decoded.contains('\u{FFFD}'));
    }
}
