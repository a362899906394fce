use thiserror::Error;
use url::Url;

/// Errors from validating a URL before handing it to the system browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// http(s) URL without a host.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL before passing it to `open::that()`.
///
/// SEC: `open` hands its argument to the platform launcher (`xdg-open`,
/// `open`, `start`), which would happily run `file://` targets or treat a
/// leading `-` as an option. Only absolute http(s) URLs with a host pass.
///
/// # Examples
///
/// ```
/// use brackets_tv::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://www.youtube.com/watch?v=abc").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("--help").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_urls_accepted() {
        let url = validate_url_for_open("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(url.host_str(), Some("www.youtube.com"));
        assert!(validate_url_for_open("http://example.com/video").is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert!(validate_url_for_open("  https://example.com/v  ").is_ok());
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
        assert!(validate_url_for_open("ftp://example.com").is_err());
    }

    #[test]
    fn test_option_like_strings_rejected() {
        assert!(matches!(
            validate_url_for_open("--new-window"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_url_for_open("").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = validate_url_for_open("ftp://example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported scheme: ftp (only http/https allowed)"
        );
    }
}
