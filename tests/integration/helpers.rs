//! Shared fixtures and process helpers

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// `tests/fixtures` in the source tree.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn load_fixture(name: &str) -> Vec<u8> {
    let path = fixtures_dir().join(name);
    fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {}: {}", path.display(), e))
}

/// Copy fixtures into a fresh directory, so tests can add or remove
/// companion files without touching the originals.
pub fn temp_fixture(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(name), load_fixture(name)).unwrap();
    }
    dir
}

/// Run the binary with an isolated config directory.
///
/// Returns (stdout, stderr, exit code).
pub fn run_replaykit(args: &[&str]) -> (String, String, i32) {
    let config_home = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_replaykit"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("REPLAYKIT_LOG")
        .output()
        .expect("failed to run replaykit");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}
