use super::HostMatcher;
use crate::codec::normalize_host;

/// Ad and analytics network identifiers blocked wherever they appear in a host.
pub const DEFAULT_STATIC_SUBSTRINGS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "adservice.google.com",
    "ads.",
    "adserver.",
];

/// Unanchored substring matcher over a fixed list of patterns.
///
/// A pattern matches if it occurs anywhere in the host, so `"ads."` also
/// matches `"downloads.example.com"`.
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    patterns: Vec<String>,
}

impl SubstringMatcher {
    /// Create a matcher from patterns. Patterns are lowercased; empty ones are dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().to_ascii_lowercase();
            if pattern.is_empty() || out.contains(&pattern) {
                continue;
            }
            out.push(pattern);
        }
        Self { patterns: out }
    }

    /// Return the first pattern contained in `host`.
    pub fn find(&self, host: &str) -> Option<&str> {
        if host.is_empty() {
            return None;
        }
        let host = normalize_host(host);
        self.patterns
            .iter()
            .find(|p| host.contains(p.as_str()))
            .map(String::as_str)
    }

    /// Configured patterns, in match order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check if there are no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_STATIC_SUBSTRINGS)
    }
}

impl HostMatcher for SubstringMatcher {
    fn matches(&self, host: &str) -> bool {
        self.find(host).is_some()
    }
}
