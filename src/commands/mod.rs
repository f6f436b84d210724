//! Subcommand handlers.

pub mod config;
pub mod render;
pub mod stream;
pub mod toc;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Read a session file, naming it in the error.
pub fn read_session(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read session: {}", path.display()))
}

/// Write `bytes` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")
        }
    }
}
