// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A fixed, second-aligned timestamp so equality comparisons are exact.
pub(crate) fn fixed_mtime() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// Write `contents` under `root/name`, creating parents, with a fixed mtime.
pub(crate) fn write_file(root: &Path, name: &str, contents: &[u8]) -> PathBuf {
    write_file_at(root, name, contents, fixed_mtime())
}

/// Write `contents` under `root/name`, creating parents, with `mtime`.
pub(crate) fn write_file_at(
    root: &Path,
    name: &str,
    contents: &[u8],
    mtime: SystemTime,
) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    set_mtime(&path, mtime);
    path
}

pub(crate) fn set_mtime(path: &Path, mtime: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

pub(crate) fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

pub(crate) fn mode(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}
