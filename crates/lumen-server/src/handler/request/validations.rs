//! Request validation utilities.

use url::Url;
use validator::ValidationError;

/// Creates a [`ValidationError`] whose message is used verbatim as the
/// response detail.
pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Parses an absolute `http` or `https` URL with a host.
pub fn parse_http_url(input: &str) -> Option<Url> {
    let url = Url::parse(input.trim()).ok()?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    (matches!(url.scheme(), "http" | "https") && has_host).then_some(url)
}

/// Validates that `url` is an absolute `http` or `https` URL with a host.
pub fn is_http_url(url: &str) -> Result<(), ValidationError> {
    match parse_http_url(url) {
        Some(_) => Ok(()),
        None => Err(validation_error(
            "image_url",
            &format!("Invalid image URL '{url}'. Must be an absolute http or https URL."),
        )),
    }
}

/// Validates every URL of a batch, failing on the first invalid one.
pub fn are_http_urls(urls: &[String]) -> Result<(), ValidationError> {
    urls.iter().try_for_each(|url| is_http_url(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_http_url("https://example.com/cat.jpg").is_ok());
        assert!(is_http_url("http://10.0.0.1:8080/a.png").is_ok());
        assert!(is_http_url("  https://example.com/padded.jpg ").is_ok());
    }

    #[test]
    fn rejects_other_urls() {
        assert!(is_http_url("ftp://example.com/cat.jpg").is_err());
        assert!(is_http_url("not a url").is_err());
        assert!(is_http_url("/relative/cat.jpg").is_err());
        assert!(is_http_url("").is_err());
    }

    #[test]
    fn first_invalid_url_is_reported() {
        let urls = vec![
            "https://example.com/a.jpg".to_owned(),
            "nope".to_owned(),
            "ftp://x/y".to_owned(),
        ];

        let error = are_http_urls(&urls).unwrap_err();
        assert_eq!(
            error.message.as_deref(),
            Some("Invalid image URL 'nope'. Must be an absolute http or https URL.")
        );
    }
}
