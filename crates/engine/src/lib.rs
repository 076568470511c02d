// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation engine for the lockstep directory mirror.
//!
//! One [`Reconciler`] per root drives its directory toward the shared
//! [`lockstep_core::Buffer`] while feeding local observations back into it.
//! The [`Supervisor`] owns the worker tasks and the cancellation token that
//! drains them; [`seed`] builds the initial index before any worker starts.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod materialize;
mod reconcile;
mod scan;
mod seed;
mod supervisor;
#[cfg(test)]
mod test_helpers;

pub use error::EngineError;
pub use reconcile::Reconciler;
pub use scan::enumerate;
pub use seed::seed;
pub use supervisor::Supervisor;
