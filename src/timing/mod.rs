//! Timing log parsing and command reconstruction.
//!
//! `script` writes a timing log next to the session when asked to time its
//! output. Two dialects exist:
//!
//! ```text
//! O 0.009404 16     advanced: kind tag, delay, byte count
//! I 0.500000 1
//! H 0.000000 START_TIME 2026-02-03 08:32:06+00:00
//! 0.440731 35       classic: delay, byte count (output only)
//! ```
//!
//! Lines are read in order and turned into [`TimingEntry`] values; the
//! [`commands`] module then replays them against the keystroke log.

pub mod commands;
mod error;

use std::io::BufRead;

use tracing::debug;

pub use commands::{extract_commands, sanitize_label, Command, ExtractOptions};
pub use error::TimingError;

/// What a timing entry accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Bytes written to the terminal.
    Output,
    /// Bytes typed by the user.
    Input,
    /// Recording metadata.
    Header,
    /// A signal delivered to the session.
    Signal,
}

impl EntryKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'O' => Some(EntryKind::Output),
            b'I' => Some(EntryKind::Input),
            b'H' => Some(EntryKind::Header),
            b'S' => Some(EntryKind::Signal),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            EntryKind::Output => 'O',
            EntryKind::Input => 'I',
            EntryKind::Header => 'H',
            EntryKind::Signal => 'S',
        }
    }

    /// Whether entries of this kind always carry a byte count.
    fn counts_bytes(&self) -> bool {
        matches!(self, EntryKind::Output | EntryKind::Input)
    }
}

/// One line of a timing log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingEntry {
    pub kind: EntryKind,
    /// Seconds since the previous entry.
    pub delay: f64,
    pub byte_count: u32,
}

impl TimingEntry {
    pub fn new(kind: EntryKind, delay: f64, byte_count: u32) -> Self {
        Self {
            kind,
            delay,
            byte_count,
        }
    }

    pub fn output(delay: f64, byte_count: u32) -> Self {
        Self::new(EntryKind::Output, delay, byte_count)
    }

    pub fn input(delay: f64, byte_count: u32) -> Self {
        Self::new(EntryKind::Input, delay, byte_count)
    }
}

/// Parse a whole timing log.
///
/// Blank lines are skipped but still counted for error positions. The
/// first malformed line aborts the parse; no partial result is returned.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<TimingEntry>, TimingError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = parse_line(line).map_err(|message| TimingError::parse(index + 1, message))?;
        entries.push(entry);
    }
    debug!(entries = entries.len(), "parsed timing log");
    Ok(entries)
}

/// Parse a timing log held in memory.
pub fn parse_str(content: &str) -> Result<Vec<TimingEntry>, TimingError> {
    parse(content.as_bytes())
}

/// Parse one non-blank, trimmed line.
pub fn parse_line(line: &str) -> Result<TimingEntry, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(format!(
            "expected at least 2 fields, got {}: {:?}",
            fields.len(),
            line
        ));
    }

    let first = fields[0].as_bytes();
    if first.len() == 1 && !first[0].is_ascii_digit() {
        let kind = EntryKind::from_tag(first[0])
            .ok_or_else(|| format!("unknown entry kind {:?}", fields[0]))?;
        let delay = parse_delay(fields[1])?;

        if !kind.counts_bytes() {
            // header and signal records carry free-form metadata instead
            let byte_count = fields
                .get(2)
                .and_then(|f| f.parse::<u32>().ok())
                .unwrap_or(0);
            return Ok(TimingEntry::new(kind, delay, byte_count));
        }

        if fields.len() < 3 {
            return Err(format!(
                "{} entries need 3 fields, got {}: {:?}",
                kind.tag(),
                fields.len(),
                line
            ));
        }
        let byte_count = parse_byte_count(fields[2])?;
        return Ok(TimingEntry::new(kind, delay, byte_count));
    }

    let delay = parse_delay(fields[0])?;
    let byte_count = parse_byte_count(fields[1])?;
    Ok(TimingEntry::output(delay, byte_count))
}

fn parse_delay(field: &str) -> Result<f64, String> {
    match field.parse::<f64>() {
        Ok(delay) if delay.is_finite() => Ok(delay),
        Ok(_) => Err(format!("delay {:?} is not a finite number", field)),
        Err(e) => Err(format!("invalid delay {:?}: {}", field, e)),
    }
}

fn parse_byte_count(field: &str) -> Result<u32, String> {
    field
        .parse::<u32>()
        .map_err(|e| format!("invalid byte count {:?}: {}", field, e))
}
