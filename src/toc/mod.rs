//! Table of contents for a rendered session.
//!
//! Each command the user typed becomes a navigation point: its label plus
//! the line of the *rendered* content where its prompt appeared. Command
//! offsets are measured against the raw output, so they are carried through
//! the same neutralization the renderer applies before lines are counted.

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, warn};

use crate::session::{neutralize_all_mapped, MapOffset, MetadataStripper};
use crate::timing::{self, extract_commands, Command, ExtractOptions, TimingError};

/// A navigation point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub label: String,
    /// Zero-based; counts the line breaks before the command's position.
    pub line: u32,
}

/// Assign line numbers to `commands` by counting line breaks in `content`
/// up to each mapped offset.
///
/// Offsets past the end of `content` are clamped to it. The scan over
/// `content` happens once however many commands there are; results come
/// back in the order of `commands`.
pub fn from_commands<M: MapOffset>(commands: &[Command], content: &[u8], mapper: &M) -> Vec<TocEntry> {
    let mut order: Vec<(usize, usize)> = commands
        .iter()
        .enumerate()
        .map(|(index, command)| {
            let raw = usize::try_from(command.output_byte_offset).unwrap_or(usize::MAX);
            (index, mapper.map(raw).min(content.len()))
        })
        .collect();
    // stable: equal offsets keep typing order
    order.sort_by_key(|&(_, offset)| offset);

    let mut lines = vec![0u32; commands.len()];
    let mut scanned = 0;
    let mut line_count: u32 = 0;
    for (index, offset) in order {
        line_count += content[scanned..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u32;
        scanned = offset;
        lines[index] = line_count;
    }

    commands
        .iter()
        .zip(lines)
        .map(|(command, line)| TocEntry {
            label: command.text.clone(),
            line,
        })
        .collect()
}

/// Builds navigation entries from a session and its companion logs.
#[derive(Debug, Clone, Default)]
pub struct TocBuilder {
    pub stripper: MetadataStripper,
    pub extract: ExtractOptions,
}

impl TocBuilder {
    pub fn new(stripper: MetadataStripper, extract: ExtractOptions) -> Self {
        Self { stripper, extract }
    }

    /// Like [`TocBuilder::try_build`], but a timing log that cannot be read
    /// only costs the navigation, never the caller.
    pub fn build<R: BufRead>(
        &self,
        timing_log: R,
        input: &[u8],
        session: &[u8],
    ) -> Option<Vec<TocEntry>> {
        match self.try_build(timing_log, input, session) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("No table of contents: {}", e);
                None
            }
        }
    }

    /// Parse the timing log, extract commands from the keystrokes and
    /// place them in the neutralized session content.
    ///
    /// `Ok(None)` when no command survives extraction.
    pub fn try_build<R: BufRead>(
        &self,
        timing_log: R,
        input: &[u8],
        session: &[u8],
    ) -> Result<Option<Vec<TocEntry>>, TimingError> {
        let entries = timing::parse(timing_log)?;

        let input = self.stripper.strip_raw(input);
        let commands = extract_commands(&entries, input, &self.extract);
        if commands.is_empty() {
            debug!("no commands found, skipping table of contents");
            return Ok(None);
        }

        let body = self.stripper.strip_raw(session);
        let (content, mapper) = neutralize_all_mapped(body);
        let toc = from_commands(&commands, &content, &mapper);
        debug!(entries = toc.len(), "built table of contents");
        Ok(Some(toc))
    }
}

/// [`TocBuilder::build`] with default markers and options.
pub fn build_toc<R: BufRead>(timing_log: R, input: &[u8], session: &[u8]) -> Option<Vec<TocEntry>> {
    TocBuilder::default().build(timing_log, input, session)
}
