use url::Url;

/// Check that `raw`, once trimmed, is an absolute URL with an `http` or
/// `https` scheme.
///
/// The url crate lowercases schemes while parsing, so `HTTPS://...` is
/// accepted just like a browser's `URL` would accept it.
pub fn validate(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate("https://example.com"));
        assert!(validate("http://example.com"));
        assert!(validate("http://localhost:8000/a/b#frag"));
    }

    #[test]
    fn test_trims_before_parsing() {
        assert!(validate("  https://example.com/path?q=1  "));
        assert!(validate("\thttps://example.com\n"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!validate("ftp://example.com"));
        assert!(!validate("mailto:someone@example.com"));
        assert!(!validate("javascript:alert(1)"));
        assert!(!validate("file:///etc/passwd"));
    }

    #[test]
    fn test_rejects_non_urls() {
        assert!(!validate("not a url"));
        assert!(!validate(""));
        assert!(!validate("   "));
        assert!(!validate("example.com"));
        assert!(!validate("/relative/path"));
        assert!(!validate("https://"));
    }
}
