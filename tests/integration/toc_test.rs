//! Table of contents built from fixture recordings

use replaykit::session::MarkerSet;
use replaykit::timing::{self, extract_commands, EntryKind, ExtractOptions};
use replaykit::{build_toc, Config, MetadataStripper, Recording, TocBuilder, TocEntry};

use crate::helpers::{fixtures_dir, load_fixture};

fn labelled(entries: &[TocEntry]) -> Vec<(&str, u32)> {
    entries.iter().map(|e| (e.label.as_str(), e.line)).collect()
}

// ============================================================================
// Timing log
// ============================================================================

#[test]
fn fixture_timing_log_parses() {
    let entries = timing::parse(load_fixture("session.timing").as_slice()).unwrap();
    assert_eq!(entries.len(), 18);
    assert_eq!(entries[0].kind, EntryKind::Header);
    assert_eq!(entries[17].kind, EntryKind::Signal);

    let output: u32 = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Output)
        .map(|e| e.byte_count)
        .sum();
    let input: u32 = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Input)
        .map(|e| e.byte_count)
        .sum();
    assert_eq!(output, 118);
    assert_eq!(input, 34);
}

#[test]
fn fixture_commands_and_offsets() {
    let entries = timing::parse(load_fixture("session.timing").as_slice()).unwrap();
    let input = load_fixture("session.input");
    let keystrokes = MetadataStripper::default().strip_raw(&input);
    let commands = extract_commands(&entries, keystrokes, &ExtractOptions::default());

    let got: Vec<(&str, u64)> = commands
        .iter()
        .map(|c| (c.text.as_str(), c.output_byte_offset))
        .collect();
    assert_eq!(
        got,
        [
            ("ls", 2),
            ("clear", 22),
            ("vim notes", 38),
            ("echo done", 93),
            ("exit", 112),
        ]
    );
}

#[test]
fn broken_timing_log_reports_line() {
    let err = timing::parse(load_fixture("broken.timing").as_slice()).unwrap_err();
    assert_eq!(err.line(), Some(2));
}

// ============================================================================
// Navigation entries
// ============================================================================

#[test]
fn fixture_toc_points_into_rendered_content() {
    let toc = build_toc(
        load_fixture("session.timing").as_slice(),
        &load_fixture("session.input"),
        &load_fixture("session.log"),
    )
    .unwrap();

    // "vim notes" was typed after the clear that preceded the alternate
    // screen, so it lands right after the separator, with "echo done"
    assert_eq!(
        labelled(&toc),
        [
            ("ls", 0),
            ("clear", 2),
            ("vim notes", 7),
            ("echo done", 7),
            ("exit", 9),
        ]
    );
}

#[test]
fn toc_lines_exist_in_rendered_content() {
    let rendered = MetadataStripper::default().strip(&load_fixture("session.log"));
    let line_count = rendered.iter().filter(|&&b| b == b'\n').count() as u32;
    let toc = build_toc(
        load_fixture("session.timing").as_slice(),
        &load_fixture("session.input"),
        &load_fixture("session.log"),
    )
    .unwrap();
    assert!(toc.iter().all(|e| e.line <= line_count));
}

#[test]
fn recording_loads_companions_for_toc() {
    let recording = Recording::load(&fixtures_dir().join("session.log")).unwrap();
    assert!(recording.has_companions());
    let toc = recording.toc(&Config::default().toc_builder()).unwrap();
    assert_eq!(toc.len(), 5);
    assert_eq!(toc[0].label, "ls");
}

#[test]
fn broken_recording_has_no_toc() {
    let recording = Recording::load(&fixtures_dir().join("broken.log")).unwrap();
    assert!(recording.has_companions());
    assert_eq!(recording.toc(&TocBuilder::default()), None);
}

#[test]
fn recording_without_companions_has_no_toc() {
    let recording = Recording::load(&fixtures_dir().join("simple.log")).unwrap();
    assert!(!recording.has_companions());
    assert_eq!(recording.toc(&TocBuilder::default()), None);
}

#[test]
fn custom_markers_apply_to_keystroke_log() {
    let builder = TocBuilder::new(
        MetadataStripper::new(MarkerSet {
            header_prefixes: vec!["BEGIN".to_string()],
            footer_markers: vec!["END".to_string()],
        }),
        ExtractOptions::default(),
    );
    let toc = builder
        .build(
            "O 0.1 2\nI 0.1 3\nO 0.1 4\n".as_bytes(),
            b"BEGIN keys\nls\r\nEND keys\n",
            b"BEGIN out\n$ ls\r\nEND out\n",
        )
        .unwrap();
    assert_eq!(labelled(&toc), [("ls", 0)]);
}
