//! Shared test utilities for the shrinkray test suite.
//!
//! Tests build raw trees in temp directories and steer the staleness
//! detector by pinning file modification times. Timestamps are set through
//! the filesystem (not mocked), so tests exercise the same stat calls the
//! build does.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Write `contents` to `root/rel`, creating parent directories. Returns the
/// full path.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Pin a file's modification time.
pub fn set_mtime(path: &Path, mtime: SystemTime) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

/// A timestamp `n` seconds in the past.
pub fn secs_ago(n: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(n)
}
