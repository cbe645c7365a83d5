use once_cell::sync::Lazy;
use regex::Regex;

/// Regex pattern for the authority of an absolute URI
/// Format: scheme://[userinfo@]host[:port][/path][?query][#fragment]
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://(?:[^@/?#]*@)?(\[[^\]/?#]*\]|[^:/?#\[\]\s]*)(?::\d*)?(?:[/?#]|$)")
        .expect("URI_PATTERN: hardcoded regex is invalid")
});

/// Extract the host of an absolute URI.
///
/// Returns `None` if the URI does not parse or has an empty host.
/// IPv6 literals are returned without their brackets.
pub fn host_from_uri(uri: &str) -> Option<&str> {
    let host = URI_PATTERN.captures(uri.trim())?.get(1)?.as_str();
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
