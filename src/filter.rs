use std::num::NonZeroUsize;

use log::{info, warn};
use lru::LruCache;
use parking_lot::Mutex;

use crate::codec::normalize_host;
use crate::matcher::{Blocklist, SubstringMatcher};
use crate::types::{BlockReason, PolicyStage, Verdict};
use crate::uri::host_from_uri;

/// Default LRU cache size. Caching is off unless a size is configured: a
/// lookup is a short byte walk, cheaper than locking and keying the cache.
pub const DEFAULT_CACHE_SIZE: usize = 0;

/// Decides, per outbound request, whether its host must be blocked.
///
/// Checks run in order and the first match wins:
/// 1. an empty host is allowed,
/// 2. a host containing a static substring is blocked,
/// 3. a host ending with a blocklist domain is blocked,
/// 4. anything else is allowed.
///
/// `evaluate` never fails. With a non-zero cache size, verdicts are cached per
/// host; the blocklist is read-only, so a cached verdict never goes stale.
pub struct RequestFilter {
    static_matcher: SubstringMatcher,
    blocklist: Blocklist,
    cache: Option<Mutex<LruCache<String, Verdict>>>,
}

impl RequestFilter {
    /// Create a filter with the default static substrings and no verdict cache.
    pub fn new(blocklist: Blocklist) -> Self {
        Self::with_options(blocklist, SubstringMatcher::default(), DEFAULT_CACHE_SIZE)
    }

    /// Create a filter. A `cache_size` of 0 disables verdict caching.
    pub fn with_options(
        blocklist: Blocklist,
        static_matcher: SubstringMatcher,
        cache_size: usize,
    ) -> Self {
        let cache = NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n)));
        Self {
            static_matcher,
            blocklist,
            cache,
        }
    }

    /// Evaluate a request host.
    pub fn evaluate(&self, host: &str) -> Verdict {
        if host.is_empty() {
            return Verdict::Allow;
        }

        let host = normalize_host(host);

        let Some(cache) = &self.cache else {
            return self.find_verdict(&host);
        };

        let mut cache = cache.lock();
        if let Some(cached) = cache.get(&*host) {
            return cached.clone();
        }

        // Matching is CPU-only, so computing under the lock is acceptable.
        let verdict = self.find_verdict(&host);
        cache.put(host.into_owned(), verdict.clone());
        verdict
    }

    /// Evaluate the target of a request at one interception point.
    ///
    /// A URI without a usable host is allowed.
    pub fn decide(&self, stage: PolicyStage, uri: &str) -> Verdict {
        let Some(host) = host_from_uri(uri) else {
            warn!("Failed to parse URI ({}) at {} stage", uri, stage);
            return Verdict::Allow;
        };

        let verdict = self.evaluate(host);
        if let Verdict::Block(reason) = &verdict {
            info!("Blocking ad ({} match, {} stage): {}", reason.as_str(), stage, uri);
        }
        verdict
    }

    /// Verdict without caching; `host` is already normalized.
    fn find_verdict(&self, host: &str) -> Verdict {
        if let Some(pattern) = self.static_matcher.find(host) {
            return Verdict::Block(BlockReason::Static {
                pattern: pattern.to_string(),
            });
        }

        if !self.blocklist.is_empty() {
            if let Some(suffix) = self.blocklist.find_blocked_suffix(host) {
                return Verdict::Block(BlockReason::Trie {
                    suffix: suffix.to_string(),
                });
            }
        }

        Verdict::Allow
    }

    /// Shared handle to the loaded blocklist
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Static substring matcher
    pub fn static_matcher(&self) -> &SubstringMatcher {
        &self.static_matcher
    }

    /// Number of cached verdicts
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.lock().len())
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::matcher::SuffixTrie;

    fn filter_from(text: &str) -> RequestFilter {
        let mut trie = SuffixTrie::new();
        load(text, &mut trie).unwrap();
        RequestFilter::new(trie.freeze())
    }

    fn trie_block(suffix: &str) -> Verdict {
        Verdict::Block(BlockReason::Trie {
            suffix: suffix.to_string(),
        })
    }

    fn static_block(pattern: &str) -> Verdict {
        Verdict::Block(BlockReason::Static {
            pattern: pattern.to_string(),
        })
    }

    #[test]
    fn test_trie_scenario() {
        let filter = filter_from("0.0.0.0 ads.example.com\n0.0.0.0 tracker.io\n");

        // "ads." is also a static substring and is checked first
        let v = filter.evaluate("ads.example.com");
        assert_eq!(v.reason(), Some("static"));

        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("example.com"), Verdict::Allow);
    }

    #[test]
    fn test_trie_scenario_without_static_list() {
        let mut trie = SuffixTrie::new();
        load("0.0.0.0 ads.example.com\n0.0.0.0 tracker.io\n", &mut trie).unwrap();
        let filter = RequestFilter::with_options(
            trie.freeze(),
            SubstringMatcher::new(Vec::<String>::new()),
            DEFAULT_CACHE_SIZE,
        );

        assert_eq!(filter.evaluate("ads.example.com"), trie_block("ads.example.com"));
        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("example.com"), Verdict::Allow);
    }

    #[test]
    fn test_empty_blocklist_scenario() {
        let filter = RequestFilter::new(Blocklist::default());
        assert_eq!(filter.evaluate("doubleclick.net"), static_block("doubleclick.net"));
        assert_eq!(filter.evaluate("safe.example.org"), Verdict::Allow);
    }

    #[test]
    fn test_empty_host_is_allowed() {
        let filter = filter_from("0.0.0.0 tracker.io\n");
        assert_eq!(filter.evaluate(""), Verdict::Allow);
        assert_eq!(filter.cached_len(), 0);
    }

    #[test]
    fn test_static_before_trie() {
        let filter = filter_from("0.0.0.0 doubleclick.net\n");
        assert_eq!(filter.evaluate("doubleclick.net"), static_block("doubleclick.net"));
    }

    #[test]
    fn test_static_is_unanchored() {
        let filter = RequestFilter::new(Blocklist::default());
        assert_eq!(filter.evaluate("downloads.example.com"), static_block("ads."));
        assert_eq!(filter.evaluate("myadserver.example.com"), static_block("adserver."));
    }

    #[test]
    fn test_case_insensitive_evaluation() {
        let filter = filter_from("0.0.0.0 tracker.io\n");
        assert_eq!(filter.evaluate("CDN.Tracker.IO"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("DoubleClick.NET"), static_block("doubleclick.net"));
    }

    #[test]
    fn test_default_filter_does_not_cache() {
        let filter = filter_from("0.0.0.0 tracker.io\n");
        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("example.com"), Verdict::Allow);
        assert_eq!(filter.cached_len(), 0);
    }

    #[test]
    fn test_cache_hits_and_clear() {
        let mut trie = SuffixTrie::new();
        trie.insert("tracker.io").unwrap();
        let filter =
            RequestFilter::with_options(trie.freeze(), SubstringMatcher::default(), 16);
        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("CDN.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.evaluate("example.com"), Verdict::Allow);
        assert_eq!(filter.cached_len(), 2);

        filter.clear_cache();
        assert_eq!(filter.cached_len(), 0);
        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
    }

    #[test]
    fn test_cache_disabled() {
        let mut trie = SuffixTrie::new();
        trie.insert("tracker.io").unwrap();
        let filter = RequestFilter::with_options(trie.freeze(), SubstringMatcher::default(), 0);
        assert_eq!(filter.evaluate("cdn.tracker.io"), trie_block("tracker.io"));
        assert_eq!(filter.cached_len(), 0);
    }

    #[test]
    fn test_cache_eviction() {
        let filter =
            RequestFilter::with_options(Blocklist::default(), SubstringMatcher::default(), 2);
        filter.evaluate("a.com");
        filter.evaluate("b.com");
        filter.evaluate("c.com");
        assert_eq!(filter.cached_len(), 2);
    }

    #[test]
    fn test_decide_both_stages() {
        let filter = filter_from("0.0.0.0 tracker.io\n");
        for stage in [PolicyStage::Navigation, PolicyStage::Response] {
            assert_eq!(
                filter.decide(stage, "https://cdn.tracker.io/pixel.gif"),
                trie_block("tracker.io")
            );
            assert_eq!(
                filter.decide(stage, "https://pagead2.googlesyndication.com/x.js"),
                static_block("googlesyndication.com")
            );
            assert_eq!(filter.decide(stage, "https://example.com/"), Verdict::Allow);
        }
    }

    #[test]
    fn test_decide_unparsable_uri_is_allowed() {
        let filter = filter_from("0.0.0.0 tracker.io\n");
        assert_eq!(filter.decide(PolicyStage::Navigation, "not a uri"), Verdict::Allow);
        assert_eq!(filter.decide(PolicyStage::Response, "about:blank"), Verdict::Allow);
    }

    #[test]
    fn test_filter_is_shareable_across_threads() {
        let filter = std::sync::Arc::new(filter_from("0.0.0.0 tracker.io\n"));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let filter = filter.clone();
                std::thread::spawn(move || filter.evaluate(&format!("n{}.tracker.io", i)))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_blocked());
        }
    }
}
