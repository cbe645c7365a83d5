//! Reversed-domain suffix trie.
//!
//! Domains are stored byte by byte from their last character to their first,
//! so "does the hostname end with a blocked domain" becomes a root-anchored
//! prefix walk. A lookup stops at the first terminal node it reaches, which
//! gives every subdomain of a blocked domain the same verdict without any
//! extra bookkeeping.
//!
//! ```
//! use domain_blocklist::matcher::SuffixTrie;
//!
//! let mut trie = SuffixTrie::new();
//! trie.insert("tracker.io").unwrap();
//!
//! assert!(trie.contains_blocked_suffix("tracker.io"));
//! assert!(trie.contains_blocked_suffix("cdn.tracker.io"));
//! assert!(!trie.contains_blocked_suffix("example.com"));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::HostMatcher;
use crate::codec::{reversed_keys, Key};
use crate::error::{AllocErrorKind, BlocklistError, Result};

/// One byte position in some reversed blocked domain.
#[derive(Default)]
pub struct TrieNode {
    /// The path from the root to this node spells a complete blocked domain
    is_terminal: bool,
    /// Sparse children keyed by normalized byte
    children: HashMap<Key, TrieNode>,
}

impl TrieNode {
    fn terminal() -> Self {
        Self {
            is_terminal: true,
            children: HashMap::new(),
        }
    }

    /// Whether a blocked domain ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Child reached by `key`, if any.
    pub fn child(&self, key: Key) -> Option<&TrieNode> {
        self.children.get(&key)
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Attach `child` under `key`, reserving room first so allocation
    /// failure is reported instead of aborting.
    fn try_attach(&mut self, key: Key, child: TrieNode, domain: &str) -> Result<()> {
        if let Err(e) = reserve_child(&mut self.children, domain) {
            release_nodes(child);
            return Err(e);
        }
        self.children.insert(key, child);
        Ok(())
    }
}

/// Summary only; the derived form would recurse once per byte of depth.
impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieNode")
            .field("is_terminal", &self.is_terminal)
            .field("children", &self.children.len())
            .finish()
    }
}

fn reserve_child(children: &mut HashMap<Key, TrieNode>, domain: &str) -> Result<()> {
    children
        .try_reserve(1)
        .map_err(|_| BlocklistError::Allocation {
            domain: domain.to_string(),
            kind: AllocErrorKind::ChildMap,
        })
}

/// Free a subtree without recursing.
fn release_nodes(node: TrieNode) {
    let mut stack = vec![node];
    while let Some(mut node) = stack.pop() {
        stack.extend(node.children.drain().map(|(_, n)| n));
    }
}

/// Build the detached chain below a new child; `keys` are the edges under it.
fn build_tail(keys: &[Key], domain: &str) -> Result<TrieNode> {
    let mut tail = TrieNode::terminal();
    for &key in keys.iter().rev() {
        let mut parent = TrieNode::default();
        parent.try_attach(key, tail, domain)?;
        tail = parent;
    }
    Ok(tail)
}

/// Mutable-at-load suffix trie of blocked domains.
#[derive(Default)]
pub struct SuffixTrie {
    root: TrieNode,
    /// Number of terminal nodes
    len: usize,
    /// Number of nodes below the root
    nodes: usize,
}

impl SuffixTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blocked domain.
    ///
    /// Returns `Ok(true)` if the domain was new and `Ok(false)` if it was
    /// empty or already present. The missing tail of the path is built
    /// detached and attached in one step, so a failed insertion leaves the
    /// trie exactly as it was.
    pub fn insert(&mut self, domain: &str) -> Result<bool> {
        if domain.is_empty() {
            return Ok(false);
        }

        let keys: Vec<Key> = reversed_keys(domain).collect();

        let mut node = &mut self.root;
        for (depth, &key) in keys.iter().enumerate() {
            if !node.children.contains_key(&key) {
                reserve_child(&mut node.children, domain)?;
            }
            match node.children.entry(key) {
                Entry::Occupied(child) => node = child.into_mut(),
                Entry::Vacant(slot) => {
                    let tail = build_tail(&keys[depth + 1..], domain)?;
                    slot.insert(tail);
                    self.nodes += keys.len() - depth;
                    self.len += 1;
                    return Ok(true);
                }
            }
        }

        if node.is_terminal {
            return Ok(false);
        }
        node.is_terminal = true;
        self.len += 1;
        Ok(true)
    }

    /// Check whether `hostname` equals, or ends with, a blocked domain.
    pub fn contains_blocked_suffix(&self, hostname: &str) -> bool {
        self.find_blocked_suffix(hostname).is_some()
    }

    /// Return the trailing part of `hostname` that matched a blocked domain.
    ///
    /// The walk returns at the first terminal node, so the shortest blocked
    /// suffix wins and the rest of the hostname is never inspected.
    pub fn find_blocked_suffix<'a>(&self, hostname: &'a str) -> Option<&'a str> {
        let mut node = &self.root;
        for (consumed, key) in reversed_keys(hostname).enumerate() {
            node = node.children.get(&key)?;
            if node.is_terminal {
                return hostname.get(hostname.len() - (consumed + 1)..);
            }
        }
        None
    }

    /// Number of blocked domains stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no domain is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Root node, for read-only inspection.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Finish loading and share the trie read-only.
    pub fn freeze(self) -> Blocklist {
        Blocklist(Arc::new(self))
    }

    /// Release every node. Equivalent to dropping the trie.
    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for SuffixTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuffixTrie")
            .field("len", &self.len)
            .field("node_count", &self.nodes)
            .field("root_children", &self.root.children.len())
            .finish()
    }
}

impl Drop for SuffixTrie {
    fn drop(&mut self) {
        // Iterative teardown; recursion depth would follow the longest entry.
        release_nodes(std::mem::take(&mut self.root));
    }
}

impl HostMatcher for SuffixTrie {
    fn matches(&self, host: &str) -> bool {
        self.contains_blocked_suffix(host)
    }
}

/// Read-only, shareable handle to a fully loaded trie.
///
/// Cloning is cheap. The trie is released when the last handle is dropped.
#[derive(Clone, Default)]
pub struct Blocklist(Arc<SuffixTrie>);

impl fmt::Debug for Blocklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Blocklist").field(&*self.0).finish()
    }
}

impl Deref for Blocklist {
    type Target = SuffixTrie;

    fn deref(&self) -> &SuffixTrie {
        &self.0
    }
}

impl From<SuffixTrie> for Blocklist {
    fn from(trie: SuffixTrie) -> Self {
        trie.freeze()
    }
}

impl HostMatcher for Blocklist {
    fn matches(&self, host: &str) -> bool {
        self.0.contains_blocked_suffix(host)
    }
}
