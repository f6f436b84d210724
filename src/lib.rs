//! replaykit - replay pipeline for terminal sessions captured with `script`.
//!
//! A capture is cleaned for display (recording metadata stripped, screen
//! clears and alternate-screen sessions neutralized) either in one go or
//! chunk by chunk, and its timing and keystroke logs are turned into a
//! table of contents that points into the cleaned content.

pub mod config;
pub mod files;
pub mod session;
pub mod timing;
pub mod toc;

pub use config::Config;
pub use files::Recording;
pub use session::{MarkerSet, MetadataStripper, StreamingNormalizer};
pub use timing::{Command, TimingEntry, TimingError};
pub use toc::{build_toc, TocBuilder, TocEntry};
