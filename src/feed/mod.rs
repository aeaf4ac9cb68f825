//! Change-feed surface for live collection updates.
//!
//! This module is the seam to the remote document store:
//! - [`ChangeFeedSource`] — subscribe/unsubscribe/delete against a named
//!   collection
//! - [`FeedSubscription`] — bounded-buffer handle delivering [`FeedEvent`]s
//! - [`MemoryFeed`] — an in-process source for tests and embedded use
//!
//! Subscriptions replay the current collection contents as an opening batch
//! of added events, then stream live batches in commit order. Slow consumers
//! are dropped rather than buffered without bound.
//!
//! # Example
//!
//! ```ignore
//! let feed = MemoryFeed::new();
//! let sub = feed.subscribe("expenses", SubscriptionConfig::default());
//!
//! loop {
//!     match sub.recv() {
//!         Ok(FeedEvent::Batch { events }) => println!("{} changes", events.len()),
//!         Ok(FeedEvent::CaughtUp) => println!("now live"),
//!         Ok(FeedEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod memory;
mod source;
mod types;

pub use memory::{MemoryFeed, Write};
pub use source::ChangeFeedSource;
pub use types::{DropReason, FeedEvent, FeedSubscription, SubscriptionConfig, SubscriptionId};
