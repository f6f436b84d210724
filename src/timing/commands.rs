//! Reconstruction of typed commands from the timing and keystroke logs.
//!
//! Input entries say how many keystroke bytes arrived, output entries how
//! many bytes the terminal printed. Walking both in order tells which
//! output position the user was looking at when they started typing each
//! line.

use tracing::{debug, trace};

use super::{EntryKind, TimingEntry};

const ESC: u8 = 0x1b;
const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7f;

/// A line the user typed and submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The typed text with the terminator and control input removed.
    pub text: String,
    /// Output bytes recorded before the user started typing this line.
    pub output_byte_offset: u64,
}

/// Knobs for [`extract_commands`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Keep a trailing line that was never submitted (the recording
    /// stopped mid-type).
    pub include_unterminated: bool,
}

/// Walk `entries` against the keystroke bytes in `input` and collect the
/// submitted command lines, in the order they were typed.
///
/// An input entry reading past the end of `input` is clamped to it.
pub fn extract_commands(
    entries: &[TimingEntry],
    input: &[u8],
    options: &ExtractOptions,
) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut output_offset: u64 = 0;
    let mut input_offset: usize = 0;
    let mut current: Vec<u8> = Vec::new();
    let mut command_offset: u64 = 0;

    for entry in entries {
        match entry.kind {
            EntryKind::Output => output_offset += u64::from(entry.byte_count),
            EntryKind::Input => {
                if current.is_empty() {
                    command_offset = output_offset;
                }
                let end = input_offset
                    .saturating_add(entry.byte_count as usize)
                    .min(input.len());
                for &byte in input.get(input_offset..end).unwrap_or_default() {
                    current.push(byte);
                    if byte == b'\r' || byte == b'\n' {
                        commands.extend(finalize(&current, command_offset, options));
                        current.clear();
                    }
                }
                input_offset = end;
            }
            EntryKind::Header | EntryKind::Signal => {}
        }
    }

    if !current.is_empty() {
        trace!(bytes = current.len(), "input ended without a terminator");
        commands.extend(finalize(&current, command_offset, options));
    }

    debug!(
        commands = commands.len(),
        output_bytes = output_offset,
        "extracted commands"
    );
    commands
}

/// Turn one line of keystrokes into a command, or drop it as noise.
fn finalize(line: &[u8], output_byte_offset: u64, options: &ExtractOptions) -> Option<Command> {
    let terminated = matches!(line.last(), Some(b'\r' | b'\n'));
    if !terminated && !options.include_unterminated {
        return None;
    }

    let end = line
        .iter()
        .rposition(|&b| b != b'\r' && b != b'\n')
        .map_or(0, |i| i + 1);
    let text = &line[..end];

    if text.is_empty() {
        return None;
    }
    // Ctrl-C, Ctrl-D and friends
    if text.len() == 1 && text[0] < 0x20 {
        return None;
    }
    // arrow keys, function keys
    if !has_printable(text) {
        return None;
    }
    // tab completion
    if text == b"\t" {
        return None;
    }

    let label = sanitize_label(text);
    if label.is_empty() {
        return None;
    }
    Some(Command {
        text: label,
        output_byte_offset,
    })
}

/// Reduce raw keystrokes to the text they produced.
///
/// Escape sequences are removed whole: CSI (`ESC [` parameters and
/// intermediates, then one final byte), SS3 (`ESC O` and one byte) and
/// two-byte escapes. Other control bytes are dropped; backspace and DEL
/// also erase the character before them, so the label is the line as the
/// user edited it rather than every printable byte that was typed
/// (`"lss\x7f"` gives `"ls"`, not `"lss"`).
pub fn sanitize_label(raw: &[u8]) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    for token in Tokens::new(raw) {
        match token {
            Token::Printable(b) => out.push(b),
            Token::Control(BACKSPACE | DEL) => pop_char(&mut out),
            Token::Control(_) | Token::Escape => {}
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn has_printable(raw: &[u8]) -> bool {
    Tokens::new(raw).any(|t| matches!(t, Token::Printable(_)))
}

/// Remove the last (possibly multi-byte) character.
fn pop_char(buf: &mut Vec<u8>) {
    while let Some(b) = buf.pop() {
        if b & 0xc0 != 0x80 {
            break;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Printable(u8),
    Control(u8),
    Escape,
}

/// Splits keystroke bytes into printable bytes, lone controls and whole
/// escape sequences.
struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_escape(&mut self) {
        match self.bytes.get(self.pos) {
            Some(b'[') => {
                self.pos += 1;
                while matches!(self.bytes.get(self.pos), Some(0x20..=0x3f)) {
                    self.pos += 1;
                }
                // final byte
                if self.pos < self.bytes.len() {
                    self.pos += 1;
                }
            }
            Some(b'O') => self.pos = (self.pos + 2).min(self.bytes.len()),
            Some(_) => self.pos += 1,
            None => {}
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(match b {
            ESC => {
                self.skip_escape();
                Token::Escape
            }
            0x00..=0x1f | DEL => Token::Control(b),
            _ => Token::Printable(b),
        })
    }
}
