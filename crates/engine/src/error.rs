// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from enumeration and materialization.
///
/// All of these concern a single root or a single name; the reconciler logs
/// them and retries on a later tick. Nothing here terminates the process.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Walk failed under {0}: {1}")]
    Enumerate(PathBuf, walkdir::Error),

    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to create directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to restore mtime on {0}: {1}")]
    SetModified(PathBuf, std::io::Error),

    #[error("Failed to remove {0}: {1}")]
    Remove(PathBuf, std::io::Error),
}
