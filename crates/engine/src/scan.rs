// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path scanner: enumerate the logical names beneath a root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::EngineError;

/// Walk the subtree under `root` and return every descendant's path relative
/// to it, the root itself excluded.
///
/// The walk is depth-first and sorted by file name, so the order is
/// deterministic for a given filesystem state and directories appear before
/// their contents. Any error aborts the walk and discards partial results.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| EngineError::Enumerate(root.to_path_buf(), e))?;
        if entry.depth() == 0 {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            names.push(rel.to_path_buf());
        }
    }
    Ok(names)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
