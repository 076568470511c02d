// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-logical-name file metadata record.
//!
//! A logical name is a path relative to a root. Two files under different
//! roots with the same relative path are the same logical entity and share
//! one record in the buffer.

use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix permission bits relevant for mirroring (rwx plus setuid/setgid/sticky).
pub const MODE_MASK: u32 = 0o7777;

/// Descriptor for one logical name in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the originating copy — the one read when the file
    /// has to be rebuilt under another root.
    pub source: PathBuf,
    /// Roots currently known to contain this name. Ordered, duplicate-free.
    pub present_in: Vec<PathBuf>,
    /// Unix permission bits.
    pub mode: u32,
    /// Byte length.
    pub size: u64,
    /// Modification time.
    pub mtime: SystemTime,
    /// Directory flag. A directory is rebuilt by creating the node itself;
    /// its `source` carries no byte content.
    pub is_dir: bool,
}

impl FileRecord {
    /// Build a record from a stat observed under `root`, sourced from that
    /// root's copy.
    pub fn observed(root: &Path, name: &Path, meta: &Metadata) -> Self {
        Self {
            source: root.join(name),
            present_in: vec![root.to_path_buf()],
            mode: permission_bits(meta),
            size: meta.len(),
            mtime: mtime_of(meta),
            is_dir: meta.is_dir(),
        }
    }

    /// Whether `root` is in the presence set.
    pub fn held_by(&self, root: &Path) -> bool {
        self.present_in.iter().any(|r| r == root)
    }

    /// Whether a fresh stat of a non-directory disagrees with this record.
    ///
    /// Any mismatch in mtime, size, or permission bits counts. Directories
    /// never diverge by content; callers compare them by existence alone.
    pub fn differs_from(&self, meta: &Metadata) -> bool {
        self.mtime != mtime_of(meta)
            || self.size != meta.len()
            || self.mode != permission_bits(meta)
    }

    /// Whether an on-disk entry still looks like this record: size and
    /// permission bits always, mtime for non-directories only.
    pub fn matches(&self, meta: &Metadata) -> bool {
        self.size == meta.len()
            && self.mode == permission_bits(meta)
            && (meta.is_dir() || self.mtime == mtime_of(meta))
    }
}

/// Permission bits of a stat, masked to the mirrored range.
pub fn permission_bits(meta: &Metadata) -> u32 {
    meta.permissions().mode() & MODE_MASK
}

/// Modification time of a stat.
pub fn mtime_of(meta: &Metadata) -> SystemTime {
    meta.modified().unwrap_or(UNIX_EPOCH)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
