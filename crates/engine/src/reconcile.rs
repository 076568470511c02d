// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-root reconciler: the synchronization loop.
//!
//! Each pass absorbs the root's on-disk state into the shared buffer, then
//! materializes whatever the buffer says the root is missing. Local
//! observations always land in the buffer before any write is issued back,
//! so a creation seen by one worker becomes an outstanding build for every
//! other worker on its next tick. Deletions propagate through sticky
//! tombstones: once a name is scheduled for deletion it is never rebuilt,
//! only drained, until every root has let go of it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use lockstep_core::{Buffer, FileRecord};

use crate::error::EngineError;
use crate::materialize;
use crate::scan::enumerate;

/// Worker that keeps one root converging toward the shared buffer.
pub struct Reconciler {
    root: PathBuf,
    buffer: Arc<Buffer>,
    interval: Duration,
    cancel: CancellationToken,
}

impl Reconciler {
    pub fn new(
        root: PathBuf,
        buffer: Arc<Buffer>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self { root, buffer, interval, cancel }
    }

    /// Tick until cancelled. The cursor — the buffer mutation stamp as of
    /// this worker's last full pass — lives here on the stack; it is private
    /// to the worker and never enters the buffer.
    pub async fn run(self) {
        let mut cursor: Option<Instant> = None;
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.interval) => {}
            }
            if let Err(e) = self.reconcile(&mut cursor).await {
                tracing::warn!(root = %self.root.display(), error = %e, "tick skipped");
            }
        }
    }

    /// One reconciliation pass.
    pub(crate) async fn reconcile(
        &self,
        cursor: &mut Option<Instant>,
    ) -> Result<(), EngineError> {
        // Skip the pass entirely when neither the buffer nor the root moved
        // since this worker last looked.
        if let Some(seen) = cursor {
            if *seen == self.buffer.last_mutation() && self.root_unchanged() {
                return Ok(());
            }
        }

        let local = enumerate(&self.root)?;

        self.absorb(&local).await;

        let on_disk: HashSet<&PathBuf> = local.iter().collect();
        let mut missing: Vec<PathBuf> = self
            .buffer
            .names()
            .into_iter()
            .filter(|name| !on_disk.contains(name))
            .collect();
        // Lexicographic order puts parent directories before their children.
        missing.sort();
        self.propagate(&missing).await;

        *cursor = Some(self.buffer.last_mutation());
        Ok(())
    }

    /// Whether every entry under the root still looks like its buffer record
    /// and the entry count matches the index. Any walk error disqualifies
    /// the skip so the full pass can surface it.
    fn root_unchanged(&self) -> bool {
        let mut count = 0usize;
        for entry in WalkDir::new(&self.root) {
            let Ok(entry) = entry else { return false };
            if entry.depth() == 0 {
                continue;
            }
            let Ok(meta) = entry.metadata() else { return false };
            let Ok(name) = entry.path().strip_prefix(&self.root) else { return false };
            let Some(record) = self.buffer.lookup(name) else { return false };
            if !record.matches(&meta) {
                return false;
            }
            count += 1;
        }
        count == self.buffer.len()
    }

    /// Fold the root's on-disk state into the buffer.
    async fn absorb(&self, local: &[PathBuf]) {
        for name in local {
            self.absorb_name(name).await;
        }
    }

    async fn absorb_name(&self, name: &Path) {
        let meta = match tokio::fs::metadata(self.root.join(name)).await {
            Ok(meta) => meta,
            Err(_) => {
                // Vanished between the walk and the stat: a local deletion.
                if self.buffer.contains(name) {
                    self.buffer.drop_presence(&self.root, name);
                    self.buffer.mark_tombstone(name);
                    tracing::info!(
                        from = %self.root.display(),
                        name = %name.display(),
                        "local copy vanished, deletion scheduled"
                    );
                }
                return;
            }
        };

        let Some(record) = self.buffer.lookup(name) else {
            let record = FileRecord::observed(&self.root, name, &meta);
            tracing::info!(
                from = %self.root.display(),
                name = %name.display(),
                size = record.size,
                "record inserted"
            );
            self.buffer.insert(name.to_path_buf(), record);
            return;
        };

        if !record.is_dir && record.differs_from(&meta) {
            self.buffer.clear_tombstone(name);
            if record.held_by(&self.root) {
                // The local copy moved after we indexed it; the newer
                // observation wins and re-sources the record here.
                let fresh = FileRecord::observed(&self.root, name, &meta);
                tracing::info!(
                    from = %self.root.display(),
                    name = %name.display(),
                    size = fresh.size,
                    "record inserted"
                );
                self.buffer.insert(name.to_path_buf(), fresh);
            } else {
                // An unexpected extra that disagrees with the index: put the
                // recorded version back.
                self.rebuild_divergent(name, &record).await;
            }
            return;
        }

        if self.buffer.is_tombstoned(name) {
            self.drain_tombstone(name).await;
            return;
        }

        if !record.held_by(&self.root) {
            self.buffer.add_presence(&self.root, name);
        }
    }

    /// Replace a divergent local copy with the recorded version.
    async fn rebuild_divergent(&self, name: &Path, record: &FileRecord) {
        if let Err(e) = materialize::remove(&self.root, name).await {
            tracing::error!(
                path = %self.root.display(),
                name = %name.display(),
                error = %e,
                "remove failed"
            );
            return;
        }
        if let Err(e) = materialize::build(&self.root, name, record).await {
            tracing::error!(
                path = %self.root.display(),
                name = %name.display(),
                error = %e,
                "build failed"
            );
            return;
        }
        self.buffer.add_presence(&self.root, name);
        tracing::info!(
            path = %self.root.display(),
            name = %name.display(),
            size = record.size,
            "divergent file rebuilt"
        );
    }

    /// Delete the local copy of a tombstoned name. The filesystem goes
    /// first: a failed removal leaves the buffer untouched so the next tick
    /// retries, and only after a successful removal does presence drain —
    /// evicting the record once no root holds it anymore.
    async fn drain_tombstone(&self, name: &Path) {
        if let Err(e) = materialize::remove(&self.root, name).await {
            tracing::error!(
                path = %self.root.display(),
                name = %name.display(),
                error = %e,
                "remove failed"
            );
            return;
        }
        self.buffer.drop_presence(&self.root, name);
        tracing::info!(
            from = %self.root.display(),
            name = %name.display(),
            "file deleted"
        );
        if let Some(record) = self.buffer.lookup(name) {
            if record.present_in.is_empty() {
                self.buffer.evict(name);
                tracing::info!(name = %name.display(), "record evicted");
            }
        }
    }

    /// Materialize into the root whatever the buffer has that the walk did
    /// not see. `missing` must be sorted so parents are built before
    /// children.
    async fn propagate(&self, missing: &[PathBuf]) {
        for name in missing {
            self.propagate_name(name).await;
        }
    }

    async fn propagate_name(&self, name: &Path) {
        let Some(record) = self.buffer.lookup(name) else {
            // Evicted since the name snapshot was taken.
            return;
        };

        if self.buffer.is_tombstoned(name) {
            if record.present_in.is_empty() {
                self.buffer.evict(name);
                tracing::info!(name = %name.display(), "record evicted");
            } else if record.held_by(&self.root) {
                // Our copy is already gone; let the tombstone drain.
                self.buffer.drop_presence(&self.root, name);
            }
            // A name scheduled for deletion is never rebuilt.
            return;
        }

        if record.held_by(&self.root) {
            // The buffer believes this root has the name but the walk says
            // otherwise: it was deleted out-of-band here, so the deletion
            // propagates everywhere.
            self.buffer.drop_presence(&self.root, name);
            self.buffer.mark_tombstone(name);
            tracing::info!(
                from = %self.root.display(),
                name = %name.display(),
                "local delete observed, deletion scheduled"
            );
            return;
        }

        match materialize::build(&self.root, name, &record).await {
            Ok(()) => {
                self.buffer.add_presence(&self.root, name);
                tracing::info!(
                    to = %self.root.display(),
                    name = %name.display(),
                    size = record.size,
                    "file built"
                );
            }
            Err(e) => {
                tracing::error!(
                    path = %self.root.display(),
                    name = %name.display(),
                    error = %e,
                    "build failed"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
