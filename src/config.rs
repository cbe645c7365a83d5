use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BlocklistError, Result};
use crate::filter::{RequestFilter, DEFAULT_CACHE_SIZE};
use crate::loader::load_file_or_warn;
use crate::matcher::{SubstringMatcher, SuffixTrie, DEFAULT_STATIC_SUBSTRINGS};

/// Request filter configuration handed in by the host application.
///
/// ```
/// use domain_blocklist::FilterConfig;
///
/// let config = FilterConfig::from_json(r#"{ "cache_size": 16 }"#).unwrap();
/// assert_eq!(config.cache_size, 16);
/// assert!(config.blocklist_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Hosts-style blocklist file; `None` means no blocklist
    pub blocklist_path: Option<PathBuf>,
    /// Substrings blocked wherever they appear in a host
    pub static_substrings: Vec<String>,
    /// LRU verdict cache size (0 disables caching)
    pub cache_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blocklist_path: None,
            static_substrings: DEFAULT_STATIC_SUBSTRINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl FilterConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the blocklist file.
    pub fn with_blocklist_path(mut self, path: impl AsRef<Path>) -> Self {
        self.blocklist_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the static substrings.
    pub fn with_static_substrings<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_substrings = substrings.into_iter().map(Into::into).collect();
        self
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Check the configuration for values that cannot be honoured.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.blocklist_path {
            if path.as_os_str().is_empty() {
                return Err(BlocklistError::Config(
                    "blocklist_path must not be empty".to_string(),
                ));
            }
        }
        if self.static_substrings.iter().any(|s| s.trim().is_empty()) {
            return Err(BlocklistError::Config(
                "static_substrings must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a filter: load the blocklist once, freeze it and wire it in.
    ///
    /// An unreadable blocklist file is logged and leaves the blocklist empty.
    pub fn build(&self) -> Result<RequestFilter> {
        self.validate()?;

        let mut trie = SuffixTrie::new();
        if let Some(path) = &self.blocklist_path {
            let stats = load_file_or_warn(path, &mut trie);
            debug!(
                "Block list {}: {} domains from {} lines",
                path.display(),
                stats.inserted,
                stats.lines
            );
        }

        Ok(RequestFilter::with_options(
            trie.freeze(),
            SubstringMatcher::new(&self.static_substrings),
            self.cache_size,
        ))
    }
}
