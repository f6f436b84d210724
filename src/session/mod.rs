//! Session content normalization.
//!
//! Raw captures of a terminal session carry two kinds of noise for a
//! replay: the recording utility's own header and footer lines, and
//! control sequences that wipe the screen (clears, alternate-screen
//! sessions). This module removes the first and neutralizes the second.
//!
//! # Module Structure
//!
//! - [`markers`] - Header and footer marker sets per recording dialect
//! - [`sequences`] - Stateless detectors for clear and alternate-screen sequences
//! - [`neutralize`] - Whole-buffer passes with offset tracking
//! - [`offset`] - Offset reprojection and mapper composition
//! - [`metadata`] - Header and footer stripping
//! - [`stream`] - Chunked normalization matching the batch output

pub mod markers;
pub mod metadata;
pub mod neutralize;
pub mod offset;
pub mod sequences;
pub mod stream;

pub use markers::MarkerSet;
pub use metadata::{MetadataStripper, DEFAULT_FOOTER_WINDOW, DEFAULT_HEADER_SCAN_LINES};
pub use neutralize::{
    neutralize_all, neutralize_all_mapped, neutralize_alt_screen, neutralize_alt_screen_mapped,
    neutralize_clears, neutralize_clears_mapped,
};
pub use offset::{Composed, MapOffset, OffsetMapper, Region};
pub use sequences::{
    AltScreenSequences, ClearSequences, SequenceDetector, ALT_SCREEN_SEPARATOR, CLEAR_SEPARATOR,
};
pub use stream::{normalize_chunks, AltScreenState, ClearState, StreamingNormalizer};
