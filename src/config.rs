//! User configuration, read from `<config dir>/replaykit/config.toml`.
//!
//! ```toml
//! [normalizer]
//! header_scan_lines = 5
//! footer_window = 512
//!
//! [markers]
//! header_prefixes = ["Script started on", "Command:"]
//! footer_markers = ["Script done on", "COMMAND_EXIT_STATUS=\""]
//!
//! [toc]
//! include_unterminated = false
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::session::{
    MarkerSet, MetadataStripper, DEFAULT_FOOTER_WINDOW, DEFAULT_HEADER_SCAN_LINES,
};
use crate::timing::ExtractOptions;
use crate::toc::TocBuilder;

/// Effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub normalizer: NormalizerConfig,
    pub markers: MarkerSet,
    pub toc: TocConfig,
}

/// `[normalizer]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Leading lines searched for header markers.
    pub header_scan_lines: usize,
    /// Trailing bytes searched for footer markers.
    pub footer_window: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            header_scan_lines: DEFAULT_HEADER_SCAN_LINES,
            footer_window: DEFAULT_FOOTER_WINDOW,
        }
    }
}

/// `[toc]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Keep a final command line that was typed but never submitted.
    pub include_unterminated: bool,
}

impl Config {
    /// Location of the user's config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("replaykit").join("config.toml"))
    }

    /// Load the user's config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Metadata stripper for the configured markers and limits.
    pub fn stripper(&self) -> MetadataStripper {
        let longest = self.markers.longest_footer_marker();
        if self.normalizer.footer_window < longest {
            warn!(
                footer_window = self.normalizer.footer_window,
                longest_marker = longest,
                "footer window is shorter than a footer marker; such footers are never found"
            );
        }
        MetadataStripper {
            markers: self.markers.clone(),
            header_scan_lines: self.normalizer.header_scan_lines,
            footer_window: self.normalizer.footer_window,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            include_unterminated: self.toc.include_unterminated,
        }
    }

    pub fn toc_builder(&self) -> TocBuilder {
        TocBuilder::new(self.stripper(), self.extract_options())
    }
}
