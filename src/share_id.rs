//! Share identifier normalisation.

/// Extract a share identifier from a share URL, or pass a bare identifier
/// through.
///
/// Identifiers are opaque: the only rule is that when the input contains a
/// `/` it is treated as a URL and its final path segment is the identifier.
/// Any query string or fragment is dropped first, as is a trailing slash.
///
/// # Examples
///
/// ```
/// use clawshare::share_id::extract_share_id;
///
/// assert_eq!(extract_share_id("https://clawshare.io/s/abc123"), "abc123");
/// assert_eq!(extract_share_id("abc123"), "abc123");
/// ```
pub fn extract_share_id(share_or_url: &str) -> String {
    let trimmed = share_or_url.trim();
    if !trimmed.contains('/') {
        return trimmed.to_string();
    }

    let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
