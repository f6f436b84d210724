//! Loading a recorded session together with its companion logs.
//!
//! `script --log-timing session.timing --log-in session.input` writes three
//! files side by side. Given the session path the other two are derived:
//!
//! - `session.log` → `session.timing`, `session.input`
//! - `session-abc` → `session-abc.timing`, `session-abc.input`

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::toc::{TocBuilder, TocEntry};

pub const TIMING_EXTENSION: &str = ".timing";
pub const INPUT_EXTENSION: &str = ".input";

/// Path of a companion file: a trailing `.log` is replaced by `extension`,
/// any other name gets `extension` appended.
pub fn companion_path(session_path: &Path, extension: &str) -> PathBuf {
    let base = if session_path.extension() == Some(OsStr::new("log")) {
        session_path.with_extension("")
    } else {
        session_path.to_path_buf()
    };
    let mut companion = base.into_os_string();
    companion.push(extension);
    PathBuf::from(companion)
}

/// A session and whichever companion logs were found next to it.
#[derive(Debug, Clone)]
pub struct Recording {
    pub session_path: PathBuf,
    /// Raw session bytes, header and footer included.
    pub session: Vec<u8>,
    pub timing: Option<Vec<u8>>,
    pub input: Option<Vec<u8>>,
}

impl Recording {
    /// Read a session file and its companions.
    ///
    /// Only the session file is required. A companion that is missing or
    /// unreadable is left out.
    pub fn load(session_path: &Path) -> Result<Self> {
        let session = fs::read(session_path)
            .with_context(|| format!("Failed to read session: {}", session_path.display()))?;
        let timing = read_companion(&companion_path(session_path, TIMING_EXTENSION));
        let input = read_companion(&companion_path(session_path, INPUT_EXTENSION));
        debug!(
            session = %session_path.display(),
            bytes = session.len(),
            timing = timing.is_some(),
            input = input.is_some(),
            "loaded recording"
        );
        Ok(Self {
            session_path: session_path.to_path_buf(),
            session,
            timing,
            input,
        })
    }

    /// An in-memory recording; mostly useful for tests.
    pub fn from_parts(session: Vec<u8>, timing: Option<Vec<u8>>, input: Option<Vec<u8>>) -> Self {
        Self {
            session_path: PathBuf::new(),
            session,
            timing,
            input,
        }
    }

    /// Both companion logs are available.
    pub fn has_companions(&self) -> bool {
        self.timing.is_some() && self.input.is_some()
    }

    /// Navigation entries, when both companions exist and parse.
    pub fn toc(&self, builder: &TocBuilder) -> Option<Vec<TocEntry>> {
        let (Some(timing), Some(input)) = (&self.timing, &self.input) else {
            debug!("companion logs missing, no table of contents");
            return None;
        };
        builder.build(timing.as_slice(), input, &self.session)
    }
}

fn read_companion(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            None
        }
    }
}
