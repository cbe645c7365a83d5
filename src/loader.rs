//! Hosts-file style blocklist loader.
//!
//! Each non-blank line that does not start with `#` is split on whitespace;
//! the second token is the blocked domain. The first token is conventionally
//! a placeholder address (`0.0.0.0`, `127.0.0.1`) and is not inspected.
//!
//! ```text
//! # comment
//! 0.0.0.0 ads.example.com
//! 0.0.0.0 tracker.io
//! ```

use std::fs;
use std::io::BufRead;
use std::path::Path;

use log::{debug, warn};

use crate::error::{BlocklistError, Result};
use crate::matcher::SuffixTrie;
use crate::types::LoadStats;

/// Conventional blocklist file name looked up by host applications.
pub const DEFAULT_BLOCKLIST_FILE: &str = "block.txt";

/// Extract the domain from one blocklist line.
///
/// Returns `None` for blank lines, comments and lines with fewer than two tokens.
pub fn parse_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut tokens = line.split_whitespace();
    let _address = tokens.next()?;
    tokens.next()
}

/// Load blocklist text into `trie`.
///
/// An entry that cannot be inserted is logged, counted in `failed` and
/// skipped; the remaining lines are still loaded.
pub fn load(text: &str, trie: &mut SuffixTrie) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for line in text.lines() {
        load_line(line, &mut stats, |domain| trie.insert(domain));
    }
    debug!(
        "Loaded block list: {} lines, {} inserted, {} duplicates, {} skipped, {} failed",
        stats.lines, stats.inserted, stats.duplicates, stats.skipped, stats.failed
    );
    Ok(stats)
}

/// Load a blocklist from a buffered reader.
///
/// Invalid UTF-8 is replaced rather than rejected. Only read errors end the load.
pub fn load_reader<R: BufRead>(reader: R, trie: &mut SuffixTrie) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for line in reader.split(b'\n') {
        let line = line?;
        load_line(&String::from_utf8_lossy(&line), &mut stats, |domain| {
            trie.insert(domain)
        });
    }
    debug!(
        "Loaded block list stream: {} lines, {} inserted, {} failed",
        stats.lines, stats.inserted, stats.failed
    );
    Ok(stats)
}

/// Load a blocklist file.
pub fn load_file(path: impl AsRef<Path>, trie: &mut SuffixTrie) -> Result<LoadStats> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| BlocklistError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    load(&String::from_utf8_lossy(&bytes), trie)
}

/// Load a blocklist file, logging failures instead of returning them.
///
/// An unreadable file leaves `trie` untouched; filtering then relies on the
/// static substring list alone.
pub fn load_file_or_warn(path: impl AsRef<Path>, trie: &mut SuffixTrie) -> LoadStats {
    match load_file(path, trie) {
        Ok(stats) => stats,
        Err(e) => {
            warn!("{}", e);
            LoadStats::default()
        }
    }
}

fn load_line<F>(line: &str, stats: &mut LoadStats, insert: F)
where
    F: FnOnce(&str) -> Result<bool>,
{
    stats.lines += 1;
    let Some(domain) = parse_line(line) else {
        stats.skipped += 1;
        return;
    };
    match insert(domain) {
        Ok(true) => stats.inserted += 1,
        Ok(false) => stats.duplicates += 1,
        Err(e) => {
            warn!("Skipping block list entry: {}", e);
            stats.failed += 1;
        }
    }
}
