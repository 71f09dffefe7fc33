//! Single-flight gate for orchestration runs.
//!
//! At most one sync runs at a time. The gate hands out an RAII guard so
//! the `Running` flag is restored to `Idle` on every exit path, panics
//! included.

use std::sync::atomic::{AtomicBool, Ordering};

/// Idle/Running flag guarding the orchestrator.
#[derive(Debug, Default)]
pub struct SyncState {
    running: AtomicBool,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to move Idle -> Running. Returns `None` when a run is
    /// already in flight.
    pub fn try_acquire(&self) -> Option<SyncGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SyncGuard { state: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped.
pub struct SyncGuard<'a> {
    state: &'a SyncState,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
    }
}
