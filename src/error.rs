//! Error types for the feed surface.
//!
//! Reconciliation itself is total and never fails; errors only arise from
//! operations against the remote source (write-through deletes, subscription
//! bookkeeping).

use crate::types::ExpenseId;
use thiserror::Error;

/// Main error type for feed-source operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(ExpenseId),

    #[error("Subscription was dropped")]
    SubscriptionDropped,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Serialization(e.to_string())
    }
}

/// Result type for feed-source operations.
pub type Result<T> = std::result::Result<T, FeedError>;
