//! Whole-buffer neutralization of clear and alternate-screen sequences.
//!
//! Replaying a recording in a terminal emulator would let a screen clear
//! or an alternate-screen session wipe out everything recorded before it.
//! These passes turn such sequences into visible separators (or drop the
//! full-screen redraw noise) so the earlier output survives.
//!
//! Every pass also reports an [`OffsetMapper`] so positions measured
//! against the raw capture can be carried onto the rendered content.

use std::ops::Range;

use super::offset::{Composed, MapperBuilder, OffsetMapper};
use super::sequences::{
    is_blank, AltScreenSequences, ClearSequences, SequenceDetector, ALT_SCREEN_SEPARATOR,
    CLEAR_SEPARATOR,
};

/// Replace screen clears with [`CLEAR_SEPARATOR`].
pub fn neutralize_clears(content: &[u8]) -> Vec<u8> {
    neutralize_clears_mapped(content).0
}

/// Drop alternate-screen sessions, marking them with [`ALT_SCREEN_SEPARATOR`].
pub fn neutralize_alt_screen(content: &[u8]) -> Vec<u8> {
    neutralize_alt_screen_mapped(content).0
}

/// Alternate-screen pass followed by the clear pass.
pub fn neutralize_all(content: &[u8]) -> Vec<u8> {
    neutralize_all_mapped(content).0
}

/// Alternate-screen pass then clear pass, with the two mappers composed.
///
/// The alternate-screen pass has to run first: it looks for the clear that
/// started a full-screen program's redraws, which the clear pass would
/// otherwise have already turned into a separator.
pub fn neutralize_all_mapped(content: &[u8]) -> (Vec<u8>, Composed<OffsetMapper, OffsetMapper>) {
    use super::offset::MapOffset;

    let (intermediate, alt_mapper) = neutralize_alt_screen_mapped(content);
    let (output, clear_mapper) = neutralize_clears_mapped(&intermediate);
    (output, alt_mapper.then(clear_mapper))
}

/// Clear pass with offset tracking.
///
/// The content is cut at every clear sequence. Without any clear it comes
/// back untouched. Otherwise the segments holding real (non-whitespace)
/// content are kept and joined by one separator each; whitespace-only
/// segments disappear, so clears at either end or back-to-back clears
/// never produce a dangling or doubled separator.
pub fn neutralize_clears_mapped(content: &[u8]) -> (Vec<u8>, OffsetMapper) {
    let detector = ClearSequences;
    let mut out = Vec::with_capacity(content.len());
    let mut builder = MapperBuilder::default();
    let mut seg_start = 0;
    let mut any_clear = false;

    let mut keep = |seg: Range<usize>, out: &mut Vec<u8>| {
        if is_blank(&content[seg.clone()]) {
            return;
        }
        if !out.is_empty() {
            out.extend_from_slice(CLEAR_SEPARATOR.as_bytes());
        }
        builder.preserve(seg.start, seg.end, out.len());
        out.extend_from_slice(&content[seg]);
    };

    while let Some(m) = detector.find_at(content, seg_start) {
        any_clear = true;
        keep(seg_start..m.start, &mut out);
        seg_start = m.end;
    }

    if !any_clear {
        return (content.to_vec(), OffsetMapper::identity(content.len()));
    }
    keep(seg_start..content.len(), &mut out);

    let len = out.len();
    (out, builder.finish(len))
}

/// Alternate-screen pass with offset tracking.
///
/// Everything between an enter and its leave is discarded. So is the
/// stretch between the first screen clear after the previous sequence and
/// the enter: full-screen programs clear and redraw before switching
/// buffers, and those cursor-addressed redraws garble plain replay.
/// Leaving a region owes a separator, which is written in front of the
/// next real content if anything real came before the region.
pub fn neutralize_alt_screen_mapped(content: &[u8]) -> (Vec<u8>, OffsetMapper) {
    let alt = AltScreenSequences;
    let clear = ClearSequences;
    let mut writer = AltWriter::new(content);
    let mut last_end = 0;
    let mut in_alt = false;

    while let Some(m) = alt.find_at(content, last_end) {
        let enter = AltScreenSequences::is_enter(&content[m.clone()]);
        if in_alt {
            if !enter {
                in_alt = false;
                writer.close_region();
            }
        } else if enter {
            let strip_from = clear
                .find_at(content, last_end)
                .filter(|c| c.end <= m.start)
                .map_or(m.start, |c| c.start);
            writer.preserve(last_end..strip_from);
            in_alt = true;
        } else {
            // a leave without an enter only loses the sequence itself; the
            // content before it is kept rather than dropped with it
            writer.preserve(last_end..m.start);
        }
        last_end = m.end;
    }

    if !in_alt {
        writer.preserve(last_end..content.len());
    }
    writer.finish()
}

/// Output side of the alternate-screen pass.
struct AltWriter<'a> {
    content: &'a [u8],
    out: Vec<u8>,
    builder: MapperBuilder,
    emitted_content: bool,
    separator_owed: bool,
    /// Whitespace spans held back while a separator is owed.
    held: Vec<Range<usize>>,
}

impl<'a> AltWriter<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            out: Vec::with_capacity(content.len()),
            builder: MapperBuilder::default(),
            emitted_content: false,
            separator_owed: false,
            held: Vec::new(),
        }
    }

    fn preserve(&mut self, span: Range<usize>) {
        if span.is_empty() {
            return;
        }
        let blank = is_blank(&self.content[span.clone()]);
        if self.separator_owed {
            if blank {
                self.held.push(span);
                return;
            }
            self.out.extend_from_slice(ALT_SCREEN_SEPARATOR.as_bytes());
            self.separator_owed = false;
            self.release_held();
        }
        self.copy(span);
        self.emitted_content |= !blank;
    }

    fn close_region(&mut self) {
        if self.emitted_content {
            self.separator_owed = true;
        }
    }

    fn release_held(&mut self) {
        for span in std::mem::take(&mut self.held) {
            self.copy(span);
        }
    }

    fn copy(&mut self, span: Range<usize>) {
        self.builder.preserve(span.start, span.end, self.out.len());
        self.out.extend_from_slice(&self.content[span]);
    }

    fn finish(mut self) -> (Vec<u8>, OffsetMapper) {
        self.release_held();
        let len = self.out.len();
        (self.out, self.builder.finish(len))
    }
}
