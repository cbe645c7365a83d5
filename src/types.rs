use std::fmt;

/// Why a request was blocked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockReason {
    /// The host contains one of the always-blocked substrings
    Static { pattern: String },
    /// The host ends with a domain from the loaded blocklist
    Trie { suffix: String },
}

impl BlockReason {
    /// Short rule name: `"static"` or `"trie"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockReason::Static { .. } => "static",
            BlockReason::Trie { .. } => "trie",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Static { pattern } => write!(f, "static ({})", pattern),
            BlockReason::Trie { suffix } => write!(f, "trie ({})", suffix),
        }
    }
}

/// Per-request allow/block decision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    Block(BlockReason),
}

impl Verdict {
    /// Check if the request must be cancelled
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Block(_))
    }

    /// Rule name that produced a block, if any
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Verdict::Allow => None,
            Verdict::Block(reason) => Some(reason.as_str()),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow => f.write_str("allow"),
            Verdict::Block(reason) => write!(f, "block: {}", reason),
        }
    }
}

/// Interception point at which the host application asks for a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyStage {
    /// Before a navigation is started
    Navigation,
    /// After a response arrived, before it is used
    Response,
}

impl fmt::Display for PolicyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyStage::Navigation => f.write_str("navigation"),
            PolicyStage::Response => f.write_str("response"),
        }
    }
}

/// Counters collected while loading a blocklist source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read from the source
    pub lines: usize,
    /// New domains added to the trie
    pub inserted: usize,
    /// Well-formed entries that were already present
    pub duplicates: usize,
    /// Blank, comment and malformed lines
    pub skipped: usize,
    /// Well-formed entries the trie could not store
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_reason() {
        assert_eq!(Verdict::Allow.reason(), None);
        assert!(!Verdict::Allow.is_blocked());

        let v = Verdict::Block(BlockReason::Static {
            pattern: "ads.".into(),
        });
        assert!(v.is_blocked());
        assert_eq!(v.reason(), Some("static"));

        let v = Verdict::Block(BlockReason::Trie {
            suffix: "tracker.io".into(),
        });
        assert_eq!(v.reason(), Some("trie"));
    }

    #[test]
    fn test_display() {
        let v = Verdict::Block(BlockReason::Trie {
            suffix: "tracker.io".into(),
        });
        assert_eq!(v.to_string(), "block: trie (tracker.io)");
        assert_eq!(Verdict::Allow.to_string(), "allow");
        assert_eq!(PolicyStage::Response.to_string(), "response");
    }
}
