mod substring;
mod trie;

pub use substring::{SubstringMatcher, DEFAULT_STATIC_SUBSTRINGS};
pub use trie::{Blocklist, SuffixTrie, TrieNode};

/// Trait for host matchers
pub trait HostMatcher: Send + Sync {
    /// Check if the host matches this matcher
    fn matches(&self, host: &str) -> bool;
}
