// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared index of every logical name across all roots.
//!
//! One readers-writer lock guards the whole structure. Read-only inspections
//! take the read side; any structural change takes the write side and, where
//! the contract says so, refreshes the mutation clock in the same critical
//! section. Callers must never perform filesystem I/O while holding a
//! snapshot borrowed from the buffer — every operation here hands out copies.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::RwLock;

use crate::record::FileRecord;

/// The merged, in-memory picture of all roots under synchronization.
///
/// Entries map logical names to [`FileRecord`]s; tombstones mark names whose
/// deletion still has to propagate to every root that has them. The mutation
/// clock lets reconcilers skip work when nothing changed since their last
/// pass.
pub struct Buffer {
    state: RwLock<State>,
}

struct State {
    entries: HashMap<PathBuf, FileRecord>,
    tombstones: HashSet<PathBuf>,
    last_mutation: Instant,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                entries: HashMap::new(),
                tombstones: HashSet::new(),
                last_mutation: Instant::now(),
            }),
        }
    }

    /// Snapshot of the record for `name`, if any.
    pub fn lookup(&self, name: &Path) -> Option<FileRecord> {
        self.state.read().entries.get(name).cloned()
    }

    /// Whether a record exists for `name`.
    pub fn contains(&self, name: &Path) -> bool {
        self.state.read().entries.contains_key(name)
    }

    /// Snapshot of all logical names currently indexed.
    pub fn names(&self) -> Vec<PathBuf> {
        self.state.read().entries.keys().cloned().collect()
    }

    /// Number of logical names currently indexed.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Create or overwrite the record for `name` and refresh the mutation
    /// clock. The record's presence set restarts at its originating root.
    pub fn insert(&self, name: PathBuf, record: FileRecord) {
        let mut state = self.state.write();
        state.entries.insert(name, record);
        state.last_mutation = Instant::now();
    }

    /// Append `root` to the presence set of `name` unless already there.
    /// No-op when no record exists.
    pub fn add_presence(&self, root: &Path, name: &Path) {
        let mut state = self.state.write();
        if let Some(record) = state.entries.get_mut(name) {
            if !record.present_in.iter().any(|r| r == root) {
                record.present_in.push(root.to_path_buf());
            }
        }
    }

    /// Remove `root` from the presence set of `name`. No-op when no record
    /// exists or the root is not present.
    pub fn drop_presence(&self, root: &Path, name: &Path) {
        let mut state = self.state.write();
        if let Some(record) = state.entries.get_mut(name) {
            record.present_in.retain(|r| r != root);
        }
    }

    /// Schedule `name` for deletion across all roots and refresh the
    /// mutation clock. A tombstone without a record is meaningless, so this
    /// no-ops when no record exists.
    pub fn mark_tombstone(&self, name: &Path) {
        let mut state = self.state.write();
        if !state.entries.contains_key(name) {
            return;
        }
        state.tombstones.insert(name.to_path_buf());
        state.last_mutation = Instant::now();
    }

    /// Take `name` off the deletion schedule.
    pub fn clear_tombstone(&self, name: &Path) {
        self.state.write().tombstones.remove(name);
    }

    /// Whether `name` is scheduled for deletion. Only true while a record
    /// still exists for it.
    pub fn is_tombstoned(&self, name: &Path) -> bool {
        let state = self.state.read();
        state.entries.contains_key(name) && state.tombstones.contains(name)
    }

    /// Delete `name` from both the entries and the tombstone set.
    pub fn evict(&self, name: &Path) {
        let mut state = self.state.write();
        state.entries.remove(name);
        state.tombstones.remove(name);
    }

    /// Read the mutation clock.
    pub fn last_mutation(&self) -> Instant {
        self.state.read().last_mutation
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
