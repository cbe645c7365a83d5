//! Byte normalization for hostnames and blocklist patterns.
//!
//! Keys are raw bytes, so every value in `0..=255` is a valid child key.
//! Only ASCII letters are folded; non-ASCII bytes (UTF-8 sequences of
//! internationalized names) pass through untouched.

use std::borrow::Cow;

/// Normalized trie key for a single byte.
pub type Key = u8;

/// Normalize a single byte to its canonical key.
#[inline]
pub fn normalize(byte: u8) -> Key {
    byte.to_ascii_lowercase()
}

/// Iterate the normalized keys of `s` from its last byte to its first.
#[inline]
pub fn reversed_keys(s: &str) -> impl Iterator<Item = Key> + '_ {
    s.bytes().rev().map(normalize)
}

/// Normalize a whole hostname, only allocating when an uppercase ASCII byte is present.
pub fn normalize_host(host: &str) -> Cow<'_, str> {
    if host.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(host.to_ascii_lowercase())
    } else {
        Cow::Borrowed(host)
    }
}
