//! Character encoding detection and transcoding for fetched pages.
//!
//! Boards in the wild still serve windows-1251 pages next to UTF-8 ones, so
//! raw bytes are decoded using, in order, the `Content-Type` header charset,
//! a `<meta>` declaration, and finally UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `charset=` in a `<meta charset>` or `http-equiv` declaration.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>;]+)"#).expect("valid regex")
});

/// Match `charset=` inside a `Content-Type` header value.
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex"));

/// Charset named by a `Content-Type` header value, if any.
#[must_use]
pub fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    HEADER_CHARSET_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Charset declared by a `<meta>` tag in the first 1024 bytes.
#[must_use]
pub fn meta_charset(html: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&html[..html.len().min(1024)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Decodes a page body to UTF-8.
///
/// `content_type` is the raw header value. Invalid sequences are replaced
/// with U+FFFD.
///
/// ```
/// use threadsplit::encoding::decode;
///
/// let body = b"<html><body>\xcf\xf0\xe8\xe2\xe5\xf2</body></html>";
/// assert!(decode(body, Some("text/html; charset=windows-1251")).contains("Привет"));
/// ```
#[must_use]
pub fn decode(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_parsed() {
        let encoding = header_charset("text/html; charset=windows-1251").unwrap();
        assert_eq!(encoding.name(), "windows-1251");
        assert!(header_charset("text/html").is_none());
    }

    #[test]
    fn meta_charset_forms() {
        let plain = br#"<html><head><meta charset="windows-1251"></head></html>"#;
        assert_eq!(meta_charset(plain).unwrap().name(), "windows-1251");

        let equiv = br#"<meta http-equiv="Content-Type" content="text/html; charset=koi8-r">"#;
        assert_eq!(meta_charset(equiv).unwrap().name(), "KOI8-R");
    }

    #[test]
    fn header_wins_over_meta() {
        let body = b"<meta charset=\"koi8-r\"><p>\xcf\xf0\xe8\xe2\xe5\xf2</p>";
        assert!(decode(body, Some("text/html; charset=cp1251")).contains("Привет"));
    }

    #[test]
    fn meta_is_used_without_header() {
        let body = b"<meta charset=\"windows-1251\"><p>\xcf\xf0\xe8\xe2\xe5\xf2</p>";
        assert!(decode(body, None).contains("Привет"));
    }

    #[test]
    fn utf8_fallback_is_lossy() {
        assert_eq!(decode("Тред".as_bytes(), None), "Тред");
        assert!(decode(b"bad \xff byte", None).contains('\u{FFFD}'));
    }
}
