//! Domain blocklist - reversed-domain suffix matching for request filtering
//!
//! This library decides, for every outbound request a host application
//! makes, whether the request's destination host should be blocked:
//! - Hosts-file style blocklist loading (`0.0.0.0 domain.name`)
//! - Suffix trie keyed by reversed, case-folded host bytes
//! - Automatic blocking of every subdomain of a blocked domain
//! - A static list of always-blocked ad/analytics substrings
//! - LRU caching of verdicts
//!
//! # Example
//!
//! ```rust
//! use domain_blocklist::{load, PolicyStage, RequestFilter, SuffixTrie, Verdict};
//!
//! let text = "
//! ## ad networks
//! 0.0.0.0 ads.example.com
//! 0.0.0.0 tracker.io
//! ";
//!
//! // Load once at startup, then freeze
//! let mut trie = SuffixTrie::new();
//! let stats = load(text, &mut trie).unwrap();
//! assert_eq!(stats.inserted, 2);
//!
//! let filter = RequestFilter::new(trie.freeze());
//!
//! // Evaluate request hosts
//! assert_eq!(filter.evaluate("cdn.tracker.io").reason(), Some("trie"));
//! assert_eq!(filter.evaluate("doubleclick.net").reason(), Some("static"));
//! assert_eq!(filter.evaluate("example.com"), Verdict::Allow);
//!
//! // Or whole request URIs at an interception point
//! let verdict = filter.decide(PolicyStage::Navigation, "https://cdn.tracker.io/p.gif");
//! assert!(verdict.is_blocked());
//! ```
//!
//! # Matching Rules
//!
//! | Check | Example rule | Blocks | Allows |
//! |-------|--------------|--------|--------|
//! | Empty host | - | - | `""` |
//! | Static substring | `ads.` | `ads.mysite.com`, `downloads.example.com` | `adsite.com` |
//! | Blocklist suffix | `tracker.io` | `tracker.io`, `cdn.tracker.io` | `tracker.org` |
//!
//! Checks run top to bottom and the first match wins. Comparison is
//! ASCII case-insensitive.

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod matcher;
pub mod types;
pub mod uri;

// Re-export commonly used items
pub use config::FilterConfig;
pub use error::{AllocErrorKind, BlocklistError, Result};
pub use filter::{RequestFilter, DEFAULT_CACHE_SIZE};
pub use loader::{
    load, load_file, load_file_or_warn, load_reader, parse_line, DEFAULT_BLOCKLIST_FILE,
};
pub use matcher::{
    Blocklist, HostMatcher, SubstringMatcher, SuffixTrie, TrieNode, DEFAULT_STATIC_SUBSTRINGS,
};
pub use types::{BlockReason, LoadStats, PolicyStage, Verdict};
pub use uri::host_from_uri;
