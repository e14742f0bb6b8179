//! Origin URL handling for the landing page and the AJAX endpoint.

use url::Url;

/// Path of the WordPress AJAX endpoint, relative to the site root.
const AJAX_PATH: &str = "wp-admin/admin-ajax.php";

/// Error type for origin URL failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize the configured origin URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Remove fragment and query
/// 4. Ensure the path ends with `/` so relative joins stay under it
pub fn canonicalize(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);
    parsed.set_query(None);

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}

/// URL of the AJAX endpoint served next to the landing page.
pub fn ajax_endpoint(base: &Url) -> Result<Url, UrlError> {
    base.join(AJAX_PATH).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}

/// Value for the `Origin` header: scheme, host and port of the landing page.
pub fn origin_header(base: &Url) -> String {
    base.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://adventskalender-vs.de/").unwrap();
        assert_eq!(url.as_str(), "https://adventskalender-vs.de/");
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("adventskalender-vs.de").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("adventskalender-vs.de"));
    }

    #[test]
    fn test_canonicalize_adds_trailing_slash() {
        let url = canonicalize("https://example.com/calendar").unwrap();
        assert_eq!(url.path(), "/calendar/");
    }

    #[test]
    fn test_canonicalize_drops_query_and_fragment() {
        let url = canonicalize("https://example.com/?utm=x#top").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_ajax_endpoint() {
        let base = canonicalize("https://adventskalender-vs.de/").unwrap();
        let ajax = ajax_endpoint(&base).unwrap();
        assert_eq!(ajax.as_str(), "https://adventskalender-vs.de/wp-admin/admin-ajax.php");
    }

    #[test]
    fn test_ajax_endpoint_under_subpath() {
        let base = canonicalize("https://example.com/advent").unwrap();
        let ajax = ajax_endpoint(&base).unwrap();
        assert_eq!(ajax.as_str(), "https://example.com/advent/wp-admin/admin-ajax.php");
    }

    #[test]
    fn test_origin_header() {
        let base = canonicalize("https://adventskalender-vs.de/").unwrap();
        assert_eq!(origin_header(&base), "https://adventskalender-vs.de");
    }

    #[test]
    fn test_origin_header_drops_subpath() {
        let base = canonicalize("https://example.com/advent").unwrap();
        assert_eq!(origin_header(&base), "https://example.com");

        let base = canonicalize("http://127.0.0.1:8080/calendar/").unwrap();
        assert_eq!(origin_header(&base), "http://127.0.0.1:8080");
    }
}
