// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor: one reconciler task per root, one shared cancellation token.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use lockstep_core::Buffer;

use crate::reconcile::Reconciler;

/// Owns the reconciler tasks and the token that drains them.
pub struct Supervisor {
    cancel: CancellationToken,
    tasks: JoinSet<()>,
}

impl Supervisor {
    /// Spawn one reconciler per root, all sharing `buffer` and ticking at
    /// `interval`. A worker that returns for any reason cancels the token so
    /// its peers drain with it.
    pub fn launch(buffer: Arc<Buffer>, roots: &[PathBuf], interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();
        for root in roots {
            let worker = Reconciler::new(
                root.clone(),
                Arc::clone(&buffer),
                interval,
                cancel.clone(),
            );
            let guard = cancel.clone();
            tasks.spawn(async move {
                worker.run().await;
                guard.cancel();
            });
        }
        Self { cancel, tasks }
    }

    /// Cancel all workers and wait until every one of them has returned.
    /// In-flight filesystem work finishes first; workers observe the
    /// cancellation at their next tick boundary.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "reconciler task failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
