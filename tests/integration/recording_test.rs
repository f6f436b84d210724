//! Recording loading

use replaykit::files::companion_path;
use replaykit::Recording;

use crate::helpers::{fixtures_dir, load_fixture, temp_fixture};

#[test]
fn companion_paths_replace_log_extension() {
    let session = fixtures_dir().join("session.log");
    assert_eq!(
        companion_path(&session, ".timing"),
        fixtures_dir().join("session.timing")
    );
    assert_eq!(
        companion_path(&session, ".input"),
        fixtures_dir().join("session.input")
    );
}

#[test]
fn load_reads_all_three_files() {
    let recording = Recording::load(&fixtures_dir().join("session.log")).unwrap();
    assert_eq!(recording.session, load_fixture("session.log"));
    assert_eq!(recording.timing, Some(load_fixture("session.timing")));
    assert_eq!(recording.input, Some(load_fixture("session.input")));
}

#[test]
fn missing_companion_is_left_out() {
    let dir = temp_fixture(&["session.log", "session.timing"]);
    let recording = Recording::load(&dir.path().join("session.log")).unwrap();
    assert!(recording.timing.is_some());
    assert!(recording.input.is_none());
    assert!(!recording.has_companions());
}

#[test]
fn missing_session_is_an_error() {
    let dir = temp_fixture(&[]);
    let err = Recording::load(&dir.path().join("nothing.log")).unwrap_err();
    assert!(err.to_string().contains("nothing.log"));
}
