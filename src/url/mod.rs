//! URL parsing for sitemap entries
//!
//! This module turns the raw string fields of a sitemap entry into validated
//! values. The location is all-or-nothing; the optional fields are normalized
//! leniently and report what they had to discard.

mod fields;

pub use fields::{check_change_frequency, parse_last_modified, parse_priority, CHANGE_FREQUENCIES};

use crate::UrlError;
use url::Url;

/// Parses a sitemap location into an absolute URL
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace; reject if nothing is left
/// 2. Parse the URL; reject if malformed or relative
/// 3. Require the HTTP or HTTPS scheme
/// 4. Require a host
///
/// The URL is otherwise kept as written (no normalization), since the sitemap
/// author chose the canonical form.
///
/// # Arguments
///
/// * `raw` - The location text as it appeared in the document
///
/// # Returns
///
/// * `Ok(Url)` - A syntactically valid absolute URL
/// * `Err(UrlError)` - The location cannot be used
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::parse_location;
///
/// let url = parse_location("  https://example.com/page  ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// assert!(parse_location("not a url").is_err());
/// ```
pub fn parse_location(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_location() {
        let url = parse_location("https://example.com/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_location_is_trimmed() {
        let url = parse_location("\n\t https://example.com/a \r\n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_location_kept_as_written() {
        let url = parse_location("http://Example.com/Page/?b=2&a=1").unwrap();
        assert_eq!(url.as_str(), "http://example.com/Page/?b=2&a=1");
    }

    #[test]
    fn test_empty_location() {
        assert_eq!(parse_location(""), Err(UrlError::Empty));
        assert_eq!(parse_location("   "), Err(UrlError::Empty));
    }

    #[test]
    fn test_malformed_location() {
        assert!(matches!(parse_location("not a url"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_relative_location() {
        assert!(matches!(parse_location("/page.html"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_invalid_scheme() {
        assert!(matches!(
            parse_location("ftp://example.com/file"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_location("mailto:admin@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }
}
