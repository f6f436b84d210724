//! Removal of the recording utility's header and footer.
//!
//! Two flavours:
//! - [`MetadataStripper::strip_raw`] only cuts the header off the front and
//!   the footer off the back. The result is a contiguous slice of the input,
//!   so byte offsets measured from the start of the recorded output (as the
//!   timing log does) stay valid.
//! - [`MetadataStripper::strip`] additionally neutralizes clear and
//!   alternate-screen sequences, producing content ready for display.

use std::ops::Range;

use super::markers::MarkerSet;
use super::neutralize::neutralize_all;
use super::sequences::is_blank;

/// Lines at the top of a recording that may carry header markers.
pub const DEFAULT_HEADER_SCAN_LINES: usize = 5;

/// Bytes at the end of a recording searched for footer lines.
pub const DEFAULT_FOOTER_WINDOW: usize = 512;

/// Strips recording metadata using a [`MarkerSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataStripper {
    pub markers: MarkerSet,
    /// Only the first this-many lines are examined for header markers.
    pub header_scan_lines: usize,
    /// Only the last this-many bytes are examined for footer lines.
    pub footer_window: usize,
}

impl Default for MetadataStripper {
    fn default() -> Self {
        Self {
            markers: MarkerSet::default(),
            header_scan_lines: DEFAULT_HEADER_SCAN_LINES,
            footer_window: DEFAULT_FOOTER_WINDOW,
        }
    }
}

impl MetadataStripper {
    pub fn new(markers: MarkerSet) -> Self {
        Self {
            markers,
            ..Self::default()
        }
    }

    /// Header and footer removed, nothing else touched.
    pub fn strip_raw<'a>(&self, content: &'a [u8]) -> &'a [u8] {
        &content[self.body_range(content)]
    }

    /// Header and footer removed, then clears and alternate-screen
    /// sessions neutralized.
    pub fn strip(&self, content: &[u8]) -> Vec<u8> {
        neutralize_all(self.strip_raw(content))
    }

    /// Location of the recorded output inside `content`.
    pub fn body_range(&self, content: &[u8]) -> Range<usize> {
        let start = self.header_len(content);
        let body = &content[start..];
        let window_start = body.len().saturating_sub(self.footer_window);
        let keep = self.footer_keep(&body[window_start..]);
        start..start + window_start + keep
    }

    /// Number of leading bytes occupied by the header.
    ///
    /// The header ends after the last of the first `header_scan_lines`
    /// lines that starts with a header prefix. The answer only depends on
    /// those lines, so it can be computed as soon as they are complete.
    pub fn header_len(&self, content: &[u8]) -> usize {
        let mut header_end = 0;
        let mut line_start = 0;
        for _ in 0..self.header_scan_lines {
            if line_start > content.len() {
                break;
            }
            let rest = &content[line_start..];
            let (line, next) = match rest.iter().position(|&b| b == b'\n') {
                Some(i) => (&rest[..i], line_start + i + 1),
                None => (rest, content.len() + 1),
            };
            if self.markers.is_header_line(line) {
                header_end = next.min(content.len());
            }
            line_start = next;
        }
        header_end
    }

    /// Number of leading bytes of `window` to keep once footer lines are
    /// removed.
    ///
    /// The footer is the longest run of trailing lines that each contain a
    /// footer marker or are blank. The first line of the window is never
    /// dropped for being blank. Kept lines lose the newline that separated
    /// them from the footer.
    pub fn footer_keep(&self, window: &[u8]) -> usize {
        let mut end = window.len();
        loop {
            let line_start = window[..end]
                .iter()
                .rposition(|&b| b == b'\n')
                .map_or(0, |i| i + 1);
            let line = &window[line_start..end];
            let first_line = line_start == 0;
            let footer =
                self.markers.is_footer_line(line) || (is_blank(line) && !first_line);
            if !footer {
                return end;
            }
            if first_line {
                return 0;
            }
            end = line_start - 1;
        }
    }
}
