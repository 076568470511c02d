// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup seeding: build the initial buffer from every root.

use std::path::{Path, PathBuf};

use lockstep_core::{mtime_of, Buffer, FileRecord};

use crate::error::EngineError;
use crate::scan::enumerate;

/// Populate `buffer` from the contents of `roots`, in declared order.
///
/// Every root counts as an equally valid source at startup. A name seen for
/// the first time is inserted as-is; directories accumulate presence; a
/// non-directory that disagrees with its stored record replaces it only when
/// the stored record is the newer of the two by mtime. Running the pass
/// twice over an unchanged filesystem yields an identical buffer.
///
/// A root that cannot be enumerated fails the whole pass; a single name
/// whose stat races away is skipped.
pub fn seed(buffer: &Buffer, roots: &[PathBuf]) -> Result<(), EngineError> {
    for root in roots {
        let names = enumerate(root)?;
        for name in names {
            seed_name(buffer, root, &name);
        }
    }
    tracing::info!(roots = ?roots, "initial index seeded");
    Ok(())
}

fn seed_name(buffer: &Buffer, root: &Path, name: &Path) {
    let meta = match std::fs::metadata(root.join(name)) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(
                from = %root.display(),
                name = %name.display(),
                error = %e,
                "stat failed during seeding, name skipped"
            );
            return;
        }
    };

    let Some(record) = buffer.lookup(name) else {
        let record = FileRecord::observed(root, name, &meta);
        tracing::info!(
            from = %root.display(),
            name = %name.display(),
            size = record.size,
            "record inserted"
        );
        buffer.insert(name.to_path_buf(), record);
        return;
    };

    if record.is_dir {
        buffer.add_presence(root, name);
        return;
    }

    if record.differs_from(&meta) && record.mtime > mtime_of(&meta) {
        let record = FileRecord::observed(root, name, &meta);
        tracing::info!(
            from = %root.display(),
            name = %name.display(),
            size = record.size,
            "record inserted"
        );
        buffer.insert(name.to_path_buf(), record);
    }
}

#[cfg(test)]
#[path = "seed_tests.rs"]
mod tests;
