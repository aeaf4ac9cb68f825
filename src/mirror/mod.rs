//! Local mirror of the remote expense collection.
//!
//! The mirror holds the latest known snapshot and reconciles it against
//! ordered batches of change events. It has exactly one state (the current
//! snapshot) and one transition (apply a batch); anything the feed sends
//! that cannot be applied is absorbed, counted, and logged rather than
//! surfaced as an error.
//!
//! # Example
//!
//! ```ignore
//! let mut mirror = LocalMirror::new();
//!
//! let snapshot = mirror.apply_batch(vec![
//!     ChangeEvent::Added { expense: Expense::new("a", "Rent", 1200.0) },
//!     ChangeEvent::Added { expense: Expense::new("b", "Food", 400.0) },
//! ]);
//! assert_eq!(snapshot.len(), 2);
//! ```

mod metrics;
mod state;

pub use metrics::MirrorMetrics;
pub use state::{apply_batch, apply_event, LocalMirror};
