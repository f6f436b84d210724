//! Recording preamble/postamble marker sets.
//!
//! `script(1)` wraps the captured bytes in a header and footer whose exact
//! wording depends on the implementation:
//!
//! ```text
//! Script started on Wed Dec 31 12:10:34 2025          (simple dialect)
//! Command: bash
//! ...
//! Script done on Wed Dec 31 12:11:22 2025
//!
//! Script started on 2026-01-12 06:41:43+00:00 [COMMAND="bash" TERM="xterm"]
//! ...
//! Script done on 2026-01-12 06:45:00+00:00 [COMMAND_EXIT_STATUS="0"]
//! ```
//!
//! The markers live in data rather than in the stripping code so another
//! recorder's dialect can be supported from configuration.

use serde::{Deserialize, Serialize};

/// Textual markers identifying header and footer lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    /// A line starting with any of these is a header line.
    pub header_prefixes: Vec<String>,
    /// A line containing any of these is a footer line.
    pub footer_markers: Vec<String>,
}

impl MarkerSet {
    /// BSD/macOS `script`: "Script started on" + "Command:" header,
    /// "Saving session" / "Command exit status" / "Script done on" footer.
    pub fn simple() -> Self {
        Self {
            header_prefixes: vec!["Script started on".into(), "Command:".into()],
            footer_markers: vec![
                "Saving session".into(),
                "Command exit status".into(),
                "Script done on".into(),
            ],
        }
    }

    /// util-linux `script`: a single header line carrying a `COMMAND="..."`
    /// attribute list, footer carrying `COMMAND_EXIT_STATUS="..."`.
    pub fn attributed() -> Self {
        Self {
            header_prefixes: vec!["Script started on".into()],
            footer_markers: vec![
                "Script done on".into(),
                "COMMAND_EXIT_STATUS=\"".into(),
            ],
        }
    }

    /// Merge two marker sets, keeping the first occurrence of each marker.
    pub fn union(mut self, other: MarkerSet) -> Self {
        for prefix in other.header_prefixes {
            if !self.header_prefixes.contains(&prefix) {
                self.header_prefixes.push(prefix);
            }
        }
        for marker in other.footer_markers {
            if !self.footer_markers.contains(&marker) {
                self.footer_markers.push(marker);
            }
        }
        self
    }

    pub fn is_header_line(&self, line: &[u8]) -> bool {
        self.header_prefixes
            .iter()
            .any(|p| !p.is_empty() && line.starts_with(p.as_bytes()))
    }

    pub fn is_footer_line(&self, line: &[u8]) -> bool {
        self.footer_markers
            .iter()
            .any(|m| contains(line, m.as_bytes()))
    }

    /// Length in bytes of the longest footer marker.
    pub fn longest_footer_marker(&self) -> usize {
        self.footer_markers.iter().map(|m| m.len()).max().unwrap_or(0)
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::simple().union(Self::attributed())
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
