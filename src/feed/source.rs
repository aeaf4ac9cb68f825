//! The change-feed source seam.

use crate::error::Result;
use crate::types::ExpenseId;

use super::types::{FeedSubscription, SubscriptionConfig, SubscriptionId};

/// A remote document store that pushes ordered change batches per
/// collection.
///
/// The mirror never queries; it only reacts to pushed batches. Writes flow
/// the other way: an interaction on a rendered element (click-to-delete on
/// a chart sector) is issued against the source by id and comes back
/// through the feed as a removed event.
pub trait ChangeFeedSource {
    /// Open a live subscription to a collection.
    fn subscribe(&self, collection: &str, config: SubscriptionConfig) -> FeedSubscription;

    /// Cancel a subscription. The handle receives a final `Dropped` event.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Delete a document by id.
    fn delete(&self, collection: &str, id: &ExpenseId) -> Result<()>;
}
