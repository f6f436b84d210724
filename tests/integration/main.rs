//! Integration tests for replaykit

mod helpers;

mod cli_test;
mod recording_test;
mod streaming_test;
mod toc_test;
