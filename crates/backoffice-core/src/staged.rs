//! # Staged Change
//!
//! Optimistic updates capture a snapshot of the subtree they touch, apply
//! the change locally, and either commit (drop the snapshot) once the
//! backend confirms or roll back to the snapshot when it refuses.
//!
//! ```text
//!  cards = [A*, B]          stage: capture [A*, B], mark B active
//!       │                                 │
//!       ▼                                 ▼
//!  cards = [A, B*]  ──── request ────►  backend
//!       │                                 │
//!       ├── ok     → commit  → cards from response
//!       └── failed → rollback → cards = [A*, B]
//! ```

use crate::error::CoreResult;

/// A tentative mutation that still holds the value it replaced.
#[derive(Debug, Clone)]
#[must_use = "a staged change must be committed or rolled back"]
pub struct StagedChange<T> {
    snapshot: T,
}

impl<T: Clone> StagedChange<T> {
    /// Snapshots `target`, then applies `mutate` to it.
    ///
    /// If `mutate` fails the target is restored before the error is
    /// returned, so nothing is left half-applied.
    pub fn apply<F>(target: &mut T, mutate: F) -> CoreResult<Self>
    where
        F: FnOnce(&mut T) -> CoreResult<()>,
    {
        let snapshot = target.clone();
        if let Err(e) = mutate(target) {
            *target = snapshot;
            return Err(e);
        }
        Ok(StagedChange { snapshot })
    }

    /// The value as it was before the change.
    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    /// Accepts the change; the snapshot is discarded.
    pub fn commit(self) {}

    /// Restores the snapshot into `target`.
    pub fn rollback(self, target: &mut T) {
        *target = self.snapshot;
    }
}
