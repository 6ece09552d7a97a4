use snip_core::ShortenerError;
use url::Url;

/// Schemes a short link may point at, compared case-insensitively.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Checks that `url` is a well-formed absolute URL with an allowed network
/// scheme and a host.
///
/// The check is syntactic only: the URL is neither fetched nor normalized.
pub fn validate_url(url: &str) -> Result<(), ShortenerError> {
    if url.is_empty() {
        return Err(ShortenerError::InvalidUrl(
            "URL cannot be empty".to_string(),
        ));
    }

    if url.chars().any(char::is_whitespace) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must not contain whitespace: {url:?}"
        )));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {url}"
        )));
    };
    if scheme.is_empty() || rest.is_empty() {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {url}"
        )));
    }

    if !ALLOWED_SCHEMES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL scheme must be one of {}: {scheme}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;

    // The `://` found above must be the one right after the scheme.
    if !parsed.scheme().eq_ignore_ascii_case(scheme) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must start with a scheme: {url}"
        )));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ShortenerError::InvalidUrl(format!(
            "URL must have a host: {url}"
        ))),
    }
}
