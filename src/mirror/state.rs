//! Snapshot reconciliation against ordered change batches.

use crate::types::{ChangeEvent, Expense, ExpenseId};
use std::sync::Arc;
use tracing::warn;

use super::MirrorMetrics;

/// Apply a batch of change events to a snapshot, strictly in delivery order.
///
/// Total over any input: an unknown id on Modified/Removed, or a repeated id
/// on Added, is absorbed and counted rather than raised. Survivor order is
/// preserved; additions append at the end.
pub fn apply_batch(
    mut state: Vec<Expense>,
    events: impl IntoIterator<Item = ChangeEvent>,
    metrics: &MirrorMetrics,
) -> Vec<Expense> {
    for event in events {
        apply_event(&mut state, event, metrics);
    }
    state
}

/// Apply a single change event in place.
pub fn apply_event(state: &mut Vec<Expense>, event: ChangeEvent, metrics: &MirrorMetrics) {
    match event {
        ChangeEvent::Added { expense } => match position(state, &expense.id) {
            // The feed contract promises distinct ids on Added; when that is
            // violated we upsert in place instead of growing a duplicate
            // sector.
            Some(index) => {
                warn!(id = %expense.id, "duplicate added event, upserting in place");
                metrics.record_duplicate_add();
                state[index] = expense;
            }
            None => state.push(expense),
        },

        ChangeEvent::Modified { expense } => match position(state, &expense.id) {
            Some(index) => state[index] = expense,
            None => {
                warn!(id = %expense.id, "modified event for unknown id, dropped");
                metrics.record_orphan_modify();
            }
        },

        ChangeEvent::Removed { id } => {
            let before = state.len();
            state.retain(|e| e.id != id);
            if state.len() == before {
                warn!(id = %id, "removed event for unknown id, no-op");
                metrics.record_orphan_remove();
            }
        }
    }
}

fn position(state: &[Expense], id: &ExpenseId) -> Option<usize> {
    state.iter().position(|e| &e.id == id)
}

/// The local snapshot of the remote collection.
///
/// Owned by the driving loop and threaded through [`apply_batch`]; created
/// empty at session start, mutated only by batch application, never
/// persisted.
#[derive(Debug)]
pub struct LocalMirror {
    snapshot: Vec<Expense>,
    metrics: Arc<MirrorMetrics>,
}

impl LocalMirror {
    /// Create an empty mirror with its own metrics.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(MirrorMetrics::new()))
    }

    /// Create an empty mirror reporting into shared metrics.
    pub fn with_metrics(metrics: Arc<MirrorMetrics>) -> Self {
        Self {
            snapshot: Vec::new(),
            metrics,
        }
    }

    /// Apply a batch and return the updated snapshot.
    pub fn apply_batch(&mut self, events: impl IntoIterator<Item = ChangeEvent>) -> &[Expense] {
        let state = std::mem::take(&mut self.snapshot);
        self.snapshot = apply_batch(state, events, &self.metrics);
        &self.snapshot
    }

    /// The current snapshot, in stable legend order.
    pub fn snapshot(&self) -> &[Expense] {
        &self.snapshot
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.snapshot.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ExpenseId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Sum of all costs in the snapshot (the full pie).
    pub fn total_cost(&self) -> f64 {
        self.snapshot.iter().map(|e| e.cost).sum()
    }

    pub fn metrics(&self) -> &Arc<MirrorMetrics> {
        &self.metrics
    }
}

impl Default for LocalMirror {
    fn default() -> Self {
        Self::new()
    }
}
