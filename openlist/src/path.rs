//! Paths sent in HTTP headers.
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::HeaderValue;

/// Everything but the RFC 3986 unreserved characters is escaped, slashes
/// included.
const PATH_HEADER: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a remote path for use in the `File-Path` header.
///
/// ```
/// use openlist::path::encode;
///
/// assert_eq!(encode("/docs/a b.txt"), "%2Fdocs%2Fa%20b.txt");
/// ```
#[must_use]
pub fn encode(path: &str) -> String {
    utf8_percent_encode(path, PATH_HEADER).to_string()
}

/// [`encode`] the path into a header value.
pub(crate) fn header_value(path: &str) -> crate::Result<HeaderValue> {
    Ok(HeaderValue::try_from(encode(path))?)
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;

    use super::{encode, header_value};

    #[test]
    fn encodes_like_quote_with_nothing_safe() {
        let cases = [
            ("/", "%2F"),
            ("/docs/文件 1.txt", "%2Fdocs%2F%E6%96%87%E4%BB%B6%201.txt"),
            ("/a b/c~d_e.f-g!", "%2Fa%20b%2Fc~d_e.f-g%21"),
            ("/100%/#hash?q=1&r", "%2F100%25%2F%23hash%3Fq%3D1%26r"),
        ];

        for (path, expected) in cases {
            assert_eq!(encode(path), expected, "{path}");
        }
    }

    #[test]
    fn non_ascii_round_trip() {
        let paths = [
            "/照片/2024/夏天.jpg",
            "/Überweisungen/März.pdf",
            "/emoji/🦀 crab.txt",
            "/mixed/naïve café/résumé.docx",
        ];

        for path in paths {
            let encoded = encode(path);
            assert!(encoded.is_ascii());

            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, path);
        }
    }

    #[test]
    fn header_value_is_encoded() {
        assert_eq!(header_value("/a b").unwrap().to_str().unwrap(), "%2Fa%20b");
    }
}
