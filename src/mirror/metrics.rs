//! Anomaly counters for absorbed feed irregularities.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts events the mirror absorbed without raising.
///
/// Reconciliation never surfaces a malformed event as an error; these
/// counters, together with the `warn!` record at each absorption site, are
/// how a misbehaving feed gets noticed.
#[derive(Debug, Default)]
pub struct MirrorMetrics {
    duplicate_adds: AtomicU64,
    orphan_modifies: AtomicU64,
    orphan_removes: AtomicU64,
}

impl MirrorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Added events whose id was already present (applied as an upsert).
    pub fn duplicate_adds(&self) -> u64 {
        self.duplicate_adds.load(Ordering::Relaxed)
    }

    /// Modified events whose id matched no entry (dropped).
    pub fn orphan_modifies(&self) -> u64 {
        self.orphan_modifies.load(Ordering::Relaxed)
    }

    /// Removed events whose id matched no entry (no-op).
    pub fn orphan_removes(&self) -> u64 {
        self.orphan_removes.load(Ordering::Relaxed)
    }

    pub(crate) fn record_duplicate_add(&self) {
        self.duplicate_adds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_orphan_modify(&self) {
        self.orphan_modifies.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_orphan_remove(&self) {
        self.orphan_removes.fetch_add(1, Ordering::Relaxed);
    }
}
