//! Stream subcommand handler

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use replaykit::{Config, StreamingNormalizer};

/// Feed a session through the streaming normalizer `chunk_size` bytes at
/// a time, writing output as soon as it is released.
pub fn handle(session: &Path, chunk_size: usize, config: &Config) -> Result<()> {
    let mut file = File::open(session)
        .with_context(|| format!("Failed to read session: {}", session.display()))?;

    let mut stdout = io::stdout().lock();
    let mut write_error: Option<io::Error> = None;
    let mut chunks = 0usize;
    {
        let mut normalizer = StreamingNormalizer::new(config.stripper(), |bytes: &[u8]| {
            if write_error.is_none() {
                if let Err(e) = stdout.write_all(bytes) {
                    write_error = Some(e);
                }
            }
        });

        let mut buf = vec![0u8; chunk_size];
        loop {
            let n = file
                .read(&mut buf)
                .with_context(|| format!("Failed to read session: {}", session.display()))?;
            if n == 0 {
                break;
            }
            chunks += 1;
            normalizer.write(&buf[..n]);
        }
        normalizer.end();
    }
    debug!(chunks, chunk_size, "streamed session");

    if let Some(e) = write_error {
        return Err(e).context("Failed to write to stdout");
    }
    stdout.flush().context("Failed to write to stdout")
}
