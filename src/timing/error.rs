//! Timing log errors.

/// Errors that can occur while reading a timing log.
#[derive(Debug, thiserror::Error)]
pub enum TimingError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to read timing log: {0}")]
    Io(#[from] std::io::Error),
}

impl TimingError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        TimingError::Parse {
            line,
            message: message.into(),
        }
    }

    /// 1-based line number of a parse failure.
    pub fn line(&self) -> Option<usize> {
        match self {
            TimingError::Parse { line, .. } => Some(*line),
            TimingError::Io(_) => None,
        }
    }
}
