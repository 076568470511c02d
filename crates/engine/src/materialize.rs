// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build and remove primitives: turn a buffer record into an on-disk entry
//! under a root, or take one away.

use std::fs::Permissions;
use std::io::ErrorKind;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;

use tokio::io::AsyncWriteExt;

use lockstep_core::FileRecord;

use crate::error::EngineError;

/// Materialize `root/name` from `record`.
///
/// Directories are created (with missing parents) carrying the record's
/// mode. Files are copied byte-for-byte from the record's source, get the
/// record's mode, and keep its mtime — mtime preservation is what lets a
/// later pass recognize the copy as unchanged.
pub(crate) async fn build(
    root: &Path,
    name: &Path,
    record: &FileRecord,
) -> Result<(), EngineError> {
    let target = root.join(name);
    if record.is_dir {
        build_dir(&target, record.mode)
    } else {
        build_file(&target, record).await
    }
}

fn build_dir(target: &Path, mode: u32) -> Result<(), EngineError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true).mode(mode);
    builder
        .create(target)
        .map_err(|e| EngineError::CreateDir(target.to_path_buf(), e))?;
    // mkdir is subject to the umask; re-apply the exact bits afterwards.
    std::fs::set_permissions(target, Permissions::from_mode(mode))
        .map_err(|e| EngineError::CreateDir(target.to_path_buf(), e))
}

async fn build_file(target: &Path, record: &FileRecord) -> Result<(), EngineError> {
    let data = tokio::fs::read(&record.source)
        .await
        .map_err(|e| EngineError::Read(record.source.clone(), e))?;

    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| EngineError::Write(target.to_path_buf(), e))?;
    file.write_all(&data)
        .await
        .map_err(|e| EngineError::Write(target.to_path_buf(), e))?;
    file.flush()
        .await
        .map_err(|e| EngineError::Write(target.to_path_buf(), e))?;

    // Restore the mtime through the still-open handle; the mode may end up
    // read-only, which would make a reopen for writing fail.
    let file = file.into_std().await;
    file.set_modified(record.mtime)
        .map_err(|e| EngineError::SetModified(target.to_path_buf(), e))?;
    drop(file);

    tokio::fs::set_permissions(target, Permissions::from_mode(record.mode))
        .await
        .map_err(|e| EngineError::Write(target.to_path_buf(), e))
}

/// Remove `root/name`, files and directory trees alike. A name that is
/// already gone counts as removed.
pub(crate) async fn remove(root: &Path, name: &Path) -> Result<(), EngineError> {
    let target = root.join(name);
    let meta = match tokio::fs::symlink_metadata(&target).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(EngineError::Remove(target, e)),
    };
    let result = if meta.is_dir() {
        tokio::fs::remove_dir_all(&target).await
    } else {
        tokio::fs::remove_file(&target).await
    };
    result.map_err(|e| EngineError::Remove(target, e))
}

#[cfg(test)]
#[path = "materialize_tests.rs"]
mod tests;
