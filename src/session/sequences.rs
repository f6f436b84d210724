//! Detection of screen-clearing and alternate-screen control sequences.
//!
//! Detectors are stateless: a lookup over a given haystack and starting
//! position always returns the same match, no matter what was searched
//! before. Matching is case-sensitive and leftmost-first.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Replaces a screen clear that sits between two pieces of real content.
pub const CLEAR_SEPARATOR: &str = "\n\n──────── terminal cleared ────────\n\n";

/// Replaces an alternate-screen session that sits between two pieces of
/// real content.
pub const ALT_SCREEN_SEPARATOR: &str = "\n\n──────── alternate screen ────────\n\n";

const ESC: u8 = 0x1b;

/// Clear sequences, in priority order:
/// - `ESC[H` / `ESC[1;1H` followed by `ESC[J`, `ESC[0J`, `ESC[2J` or `ESC[3J`
/// - `ESC[2J` / `ESC[3J` followed by `ESC[H`
/// - bare `ESC[2J` / `ESC[3J`
static CLEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[(?:1;1)?H\x1b\[(?:0?J|[23]J)|\x1b\[[23]J\x1b\[H|\x1b\[[23]J")
        .expect("clear pattern is a valid regex")
});

/// Alternate screen buffer enter (`h`) / leave (`l`) for modes 1049, 47, 1047.
static ALT_SCREEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[\?(?:1049|47|1047)[hl]")
        .expect("alt screen pattern is a valid regex")
});

/// A stateless finder for one family of control sequences.
pub trait SequenceDetector {
    /// Find the leftmost match starting at or after `start`.
    fn find_at(&self, haystack: &[u8], start: usize) -> Option<Range<usize>>;

    /// Upper bound on the length of any match. A match starting at `p` is
    /// fully decided once `haystack.len() >= p + max_len()`.
    fn max_len(&self) -> usize;
}

/// Screen clear sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearSequences;

impl SequenceDetector for ClearSequences {
    fn find_at(&self, haystack: &[u8], start: usize) -> Option<Range<usize>> {
        if start > haystack.len() {
            return None;
        }
        CLEAR_PATTERN.find_at(haystack, start).map(|m| m.range())
    }

    fn max_len(&self) -> usize {
        // ESC[1;1H ESC[0J
        10
    }
}

/// Alternate screen buffer transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AltScreenSequences;

impl AltScreenSequences {
    /// Whether the matched sequence enters the alternate screen.
    pub fn is_enter(sequence: &[u8]) -> bool {
        sequence.last() == Some(&b'h')
    }
}

impl SequenceDetector for AltScreenSequences {
    fn find_at(&self, haystack: &[u8], start: usize) -> Option<Range<usize>> {
        if start > haystack.len() {
            return None;
        }
        ALT_SCREEN_PATTERN.find_at(haystack, start).map(|m| m.range())
    }

    fn max_len(&self) -> usize {
        // ESC[?1049h
        8
    }
}

/// Whitespace as far as separator placement is concerned.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// True when `bytes` holds nothing but whitespace (or nothing at all).
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_space(b))
}

/// Index of the first non-whitespace byte.
pub fn first_non_blank(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| !is_space(b))
}

/// Where a streaming scanner has to stop when more input may follow.
///
/// Bytes before the returned index cannot begin a sequence that is still
/// undecided; bytes from it onward might, and are carried into the next
/// chunk. Only an ESC within the last `lookahead - 1` bytes can start one.
pub fn carry_point(buf: &[u8], from: usize, lookahead: usize) -> usize {
    let window = buf.len().saturating_sub(lookahead.saturating_sub(1)).max(from);
    buf[window..]
        .iter()
        .position(|&b| b == ESC)
        .map_or(buf.len(), |i| window + i)
}
