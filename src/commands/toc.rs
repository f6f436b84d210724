//! Toc subcommand handler

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use replaykit::{Config, Recording, TocEntry};

use super::write_output;

/// Print the navigation entries of a session.
///
/// Missing or unusable companion logs only produce a warning and an
/// empty listing.
pub fn handle(session: &Path, json: bool, config: &Config) -> Result<()> {
    let recording = Recording::load(session)?;
    if !recording.has_companions() {
        warn!(
            "No .timing/.input companion files next to {}",
            session.display()
        );
    }
    let entries = recording.toc(&config.toc_builder()).unwrap_or_default();
    let rendered = if json {
        format_json(&entries)?
    } else {
        format_lines(&entries)
    };
    write_output(None, rendered.as_bytes())
}

fn format_json(entries: &[TocEntry]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(entries)?;
    out.push('\n');
    Ok(out)
}

/// `<line>\t<label>`, one entry per line.
fn format_lines(entries: &[TocEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\t{}\n", e.line, e.label))
        .collect()
}
