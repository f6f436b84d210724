//! Render subcommand handler

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use replaykit::Config;

use super::{read_session, write_output};

/// Strip and neutralize a whole session at once.
pub fn handle(session: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let raw = read_session(session)?;
    let rendered = config.stripper().strip(&raw);
    debug!(input = raw.len(), output = rendered.len(), "rendered session");
    write_output(output, &rendered)
}
