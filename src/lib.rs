//! # Spendview
//!
//! A live local mirror of a remote expense collection, reconciled from a
//! change feed and handed to a renderer after every update.
//!
//! ## Core Concepts
//!
//! - **Expenses**: id/name/cost documents owned by a remote store
//! - **Change feed**: ordered batches of added/modified/removed events,
//!   pushed per collection
//! - **Mirror**: in-memory snapshot, reconciled batch by batch
//! - **Driver**: consumes the feed and hands each new snapshot to a
//!   renderer collaborator
//!
//! ## Example
//!
//! ```ignore
//! use spendview::{Expense, MemoryFeed, MirrorDriver, SubscriptionConfig};
//! use std::sync::Arc;
//!
//! let feed = Arc::new(MemoryFeed::new());
//! let mut driver = MirrorDriver::new(feed.clone(), "expenses", |snapshot: &[Expense]| {
//!     println!("{} sectors", snapshot.len());
//! });
//!
//! let subscription = driver.subscribe(SubscriptionConfig::default());
//! feed.set("expenses", Expense::new("doc-1", "Rent", 1200.0));
//!
//! driver.run(&subscription); // until unsubscribed
//! ```

pub mod driver;
pub mod error;
pub mod feed;
pub mod mirror;
pub mod render;
pub mod types;

// Re-exports
pub use driver::MirrorDriver;
pub use error::{FeedError, Result};
pub use feed::{
    ChangeFeedSource, DropReason, FeedEvent, FeedSubscription, MemoryFeed, SubscriptionConfig,
    SubscriptionId, Write,
};
pub use mirror::{apply_batch, apply_event, LocalMirror, MirrorMetrics};
pub use render::Renderer;
pub use types::*;
