//! Chunk-at-a-time normalization for progressive rendering.
//!
//! [`StreamingNormalizer`] produces exactly the bytes of
//! [`MetadataStripper::strip`] however the input is split into `write`
//! calls, down to one byte at a time. It does so by withholding only what
//! the next bytes could still change:
//!
//! - the head of the stream until the header lines are complete,
//! - the last `footer_window` bytes until [`StreamingNormalizer::end`],
//! - a possible partial control sequence at the end of each chunk,
//! - whitespace whose separator placement is still undecided,
//! - content after a screen clear until it is known whether an alternate
//!   screen session follows (which would discard it).

use tracing::trace;

use super::metadata::MetadataStripper;
use super::sequences::{
    carry_point, first_non_blank, is_blank, AltScreenSequences, ClearSequences,
    SequenceDetector, ALT_SCREEN_SEPARATOR, CLEAR_SEPARATOR,
};

/// Streaming counterpart of [`MetadataStripper::strip`].
///
/// Output is handed to `sink` as it becomes final. Consuming `end` flushes
/// everything that was withheld.
pub struct StreamingNormalizer<F: FnMut(&[u8])> {
    stripper: MetadataStripper,
    header: HeaderState,
    /// Trailing carry: the last `footer_window` body bytes.
    tail: Vec<u8>,
    alt: AltScreenStage,
    clear: ClearStage,
    sink: F,
    written: u64,
    emitted: u64,
}

#[derive(Debug, Default)]
struct HeaderState {
    buf: Vec<u8>,
    newlines: usize,
    done: bool,
}

impl<F: FnMut(&[u8])> StreamingNormalizer<F> {
    pub fn new(stripper: MetadataStripper, sink: F) -> Self {
        Self {
            stripper,
            header: HeaderState::default(),
            tail: Vec::new(),
            alt: AltScreenStage::default(),
            clear: ClearStage::default(),
            sink,
            written: 0,
            emitted: 0,
        }
    }

    /// Feed the next chunk of the raw recording.
    pub fn write(&mut self, chunk: &[u8]) {
        self.written += chunk.len() as u64;
        let mut out = Vec::new();

        if self.header.done {
            self.push_body(chunk, &mut out);
        } else {
            self.header.buf.extend_from_slice(chunk);
            self.header.newlines += chunk.iter().filter(|&&b| b == b'\n').count();
            if self.header.newlines >= self.stripper.header_scan_lines {
                let head = self.release_header();
                self.push_body(&head, &mut out);
            }
        }

        self.emit(out);
    }

    /// Flush everything withheld: footer lines are removed from the
    /// trailing carry and the remaining state is resolved.
    pub fn end(mut self) {
        let mut out = Vec::new();
        if !self.header.done {
            let head = self.release_header();
            self.push_body(&head, &mut out);
        }

        let tail = std::mem::take(&mut self.tail);
        let keep = self.stripper.footer_keep(&tail);
        trace!(
            withheld = tail.len(),
            footer = tail.len() - keep,
            "releasing trailing carry"
        );

        let mut intermediate = Vec::new();
        self.alt.push(&tail[..keep], &mut intermediate);
        self.alt.finish(&mut intermediate);
        self.clear.push(&intermediate, &mut out);
        self.clear.finish(&mut out);

        self.emit(out);
        trace!(
            written = self.written,
            emitted = self.emitted,
            "streaming normalizer finished"
        );
    }

    fn release_header(&mut self) -> Vec<u8> {
        let mut head = std::mem::take(&mut self.header.buf);
        let header_len = self.stripper.header_len(&head);
        self.header.done = true;
        head.drain(..header_len);
        head
    }

    fn push_body(&mut self, bytes: &[u8], out: &mut Vec<u8>) {
        self.tail.extend_from_slice(bytes);
        let window = self.stripper.footer_window;
        if self.tail.len() <= window {
            return;
        }
        let released: Vec<u8> = self.tail.drain(..self.tail.len() - window).collect();
        let mut intermediate = Vec::new();
        self.alt.push(&released, &mut intermediate);
        self.clear.push(&intermediate, out);
    }

    fn emit(&mut self, out: Vec<u8>) {
        if !out.is_empty() {
            self.emitted += out.len() as u64;
            (self.sink)(&out);
        }
    }
}

/// Normalize `input` delivered as the given chunks, collecting the output.
pub fn normalize_chunks<'a, I>(stripper: MetadataStripper, chunks: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut output = Vec::new();
    let mut normalizer = StreamingNormalizer::new(stripper, |bytes: &[u8]| {
        output.extend_from_slice(bytes)
    });
    for chunk in chunks {
        normalizer.write(chunk);
    }
    normalizer.end();
    output
}

/// Separator bookkeeping of the clear pass.
///
/// Content between clears arrives in pieces; whitespace is held until a
/// non-whitespace byte shows the segment is real, at which point any owed
/// separator is written first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearState {
    /// The current segment has shown real content and is being copied.
    segment_live: bool,
    /// Real content was written and a clear followed it.
    separator_owed: bool,
    /// A clear has been seen at all; without one, content is verbatim.
    seen_clear: bool,
    whitespace: Vec<u8>,
}

impl ClearState {
    pub fn on_content(&mut self, bytes: &[u8], out: &mut Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        if self.segment_live {
            out.extend_from_slice(bytes);
            return;
        }
        if first_non_blank(bytes).is_none() {
            self.whitespace.extend_from_slice(bytes);
            return;
        }
        if self.separator_owed {
            out.extend_from_slice(CLEAR_SEPARATOR.as_bytes());
            self.separator_owed = false;
        }
        out.append(&mut self.whitespace);
        out.extend_from_slice(bytes);
        self.segment_live = true;
    }

    pub fn on_clear(&mut self) {
        self.seen_clear = true;
        if self.segment_live {
            self.separator_owed = true;
        }
        self.segment_live = false;
        self.whitespace.clear();
    }

    pub fn on_end(&mut self, out: &mut Vec<u8>) {
        if self.seen_clear {
            self.whitespace.clear();
        } else {
            out.append(&mut self.whitespace);
        }
        self.separator_owed = false;
    }

    pub fn separator_owed(&self) -> bool {
        self.separator_owed
    }
}

/// Separator and region bookkeeping of the alternate-screen pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltScreenState {
    in_alt: bool,
    emitted_content: bool,
    separator_owed: bool,
    whitespace: Vec<u8>,
}

impl AltScreenState {
    pub fn in_alt(&self) -> bool {
        self.in_alt
    }

    pub fn separator_owed(&self) -> bool {
        self.separator_owed
    }

    pub fn on_preserved(&mut self, bytes: &[u8], out: &mut Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        if self.separator_owed {
            if is_blank(bytes) {
                self.whitespace.extend_from_slice(bytes);
                return;
            }
            out.extend_from_slice(ALT_SCREEN_SEPARATOR.as_bytes());
            out.append(&mut self.whitespace);
            self.separator_owed = false;
            self.emitted_content = true;
        } else if !is_blank(bytes) {
            self.emitted_content = true;
        }
        out.extend_from_slice(bytes);
    }

    /// Enter inside a region is ignored.
    pub fn on_enter(&mut self) {
        self.in_alt = true;
    }

    /// A leave outside a region is ignored.
    pub fn on_leave(&mut self) {
        if self.in_alt {
            self.in_alt = false;
            if self.emitted_content {
                self.separator_owed = true;
            }
        }
    }

    pub fn on_end(&mut self, out: &mut Vec<u8>) {
        out.append(&mut self.whitespace);
        self.separator_owed = false;
    }
}

/// Scanner feeding [`ClearState`].
#[derive(Debug, Default)]
struct ClearStage {
    /// Escape carry: unscanned bytes that may start a sequence.
    pending: Vec<u8>,
    state: ClearState,
}

impl ClearStage {
    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) {
        if input.is_empty() {
            return;
        }
        self.pending.extend_from_slice(input);
        self.scan(false, out);
    }

    fn finish(&mut self, out: &mut Vec<u8>) {
        self.scan(true, out);
        self.state.on_end(out);
    }

    fn scan(&mut self, last: bool, out: &mut Vec<u8>) {
        let detector = ClearSequences;
        let lookahead = detector.max_len();
        let buf = &self.pending;
        let mut pos = 0;

        while let Some(m) = detector.find_at(buf, pos) {
            if !last && m.start + lookahead > buf.len() {
                break;
            }
            self.state.on_content(&buf[pos..m.start], out);
            self.state.on_clear();
            pos = m.end;
        }

        let stop = if last {
            buf.len()
        } else {
            carry_point(buf, pos, lookahead)
        };
        self.state.on_content(&buf[pos..stop], out);
        self.pending.drain(..stop);
    }
}

/// Scanner feeding [`AltScreenState`].
#[derive(Debug, Default)]
struct AltScreenStage {
    pending: Vec<u8>,
    /// Content from the first clear since the last alternate-screen
    /// sequence. `Some` until the next sequence decides its fate.
    suspect: Option<Vec<u8>>,
    state: AltScreenState,
}

impl AltScreenStage {
    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) {
        if input.is_empty() {
            return;
        }
        self.pending.extend_from_slice(input);
        self.scan(false, out);
    }

    fn finish(&mut self, out: &mut Vec<u8>) {
        self.scan(true, out);
        if let Some(suspect) = self.suspect.take() {
            self.state.on_preserved(&suspect, out);
        }
        self.state.on_end(out);
    }

    fn scan(&mut self, last: bool, out: &mut Vec<u8>) {
        let alt = AltScreenSequences;
        let clear = ClearSequences;
        let lookahead = alt.max_len().max(clear.max_len());
        let decided = |start: usize, len: usize| last || start + lookahead <= len;

        let buf = &self.pending;
        let mut pos = 0;

        loop {
            let len = buf.len();
            let next_alt = alt.find_at(buf, pos).filter(|m| decided(m.start, len));

            if self.state.in_alt() {
                // everything inside the region is dropped
                match next_alt {
                    Some(m) => {
                        if !AltScreenSequences::is_enter(&buf[m.clone()]) {
                            self.state.on_leave();
                        }
                        pos = m.end;
                    }
                    None => {
                        pos = if last { len } else { carry_point(buf, pos, lookahead) };
                        break;
                    }
                }
                continue;
            }

            if let Some(suspect) = self.suspect.as_mut() {
                match next_alt {
                    Some(m) if AltScreenSequences::is_enter(&buf[m.clone()]) => {
                        self.suspect = None;
                        self.state.on_enter();
                        pos = m.end;
                    }
                    Some(m) => {
                        suspect.extend_from_slice(&buf[pos..m.start]);
                        if let Some(suspect) = self.suspect.take() {
                            self.state.on_preserved(&suspect, out);
                        }
                        pos = m.end;
                    }
                    None => {
                        let stop = if last { len } else { carry_point(buf, pos, lookahead) };
                        suspect.extend_from_slice(&buf[pos..stop]);
                        pos = stop;
                        break;
                    }
                }
                continue;
            }

            // outside any region: whichever of clear / alt sequence comes first
            let next_alt = alt.find_at(buf, pos);
            let next_clear = clear.find_at(buf, pos);
            let first = match (&next_alt, &next_clear) {
                (Some(a), Some(c)) => Some(a.start.min(c.start)),
                (Some(a), None) => Some(a.start),
                (None, Some(c)) => Some(c.start),
                (None, None) => None,
            };
            match first {
                Some(start) if decided(start, len) => {
                    if let Some(c) = next_clear.filter(|c| c.start == start) {
                        self.state.on_preserved(&buf[pos..c.start], out);
                        self.suspect = Some(buf[c.clone()].to_vec());
                        pos = c.end;
                    } else if let Some(a) = next_alt {
                        self.state.on_preserved(&buf[pos..a.start], out);
                        if AltScreenSequences::is_enter(&buf[a.clone()]) {
                            self.state.on_enter();
                        }
                        pos = a.end;
                    }
                }
                _ => {
                    let stop = if last { len } else { carry_point(buf, pos, lookahead) };
                    self.state.on_preserved(&buf[pos..stop], out);
                    pos = stop;
                    break;
                }
            }
        }

        self.pending.drain(..pos);
    }
}
