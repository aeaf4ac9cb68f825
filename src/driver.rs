//! Driving loop tying feed, mirror, and renderer together.

use crate::error::Result;
use crate::feed::{ChangeFeedSource, FeedEvent, FeedSubscription, SubscriptionConfig};
use crate::mirror::{LocalMirror, MirrorMetrics};
use crate::render::Renderer;
use crate::types::{Expense, ExpenseId};
use std::sync::Arc;

/// Consumes feed events for one collection and keeps a renderer in sync
/// with the mirror.
///
/// Batches are processed to completion one at a time on the calling thread;
/// the renderer sees each new snapshot before the next batch is applied.
pub struct MirrorDriver<F, R> {
    source: Arc<F>,
    collection: String,
    mirror: LocalMirror,
    renderer: R,
}

impl<F: ChangeFeedSource, R: Renderer> MirrorDriver<F, R> {
    pub fn new(source: Arc<F>, collection: impl Into<String>, renderer: R) -> Self {
        Self::with_metrics(source, collection, renderer, Arc::new(MirrorMetrics::new()))
    }

    /// Create a driver whose mirror reports into shared metrics.
    pub fn with_metrics(
        source: Arc<F>,
        collection: impl Into<String>,
        renderer: R,
        metrics: Arc<MirrorMetrics>,
    ) -> Self {
        Self {
            source,
            collection: collection.into(),
            mirror: LocalMirror::with_metrics(metrics),
            renderer,
        }
    }

    /// Open a subscription to this driver's collection.
    pub fn subscribe(&self, config: SubscriptionConfig) -> FeedSubscription {
        self.source.subscribe(&self.collection, config)
    }

    /// Apply one feed event.
    ///
    /// Returns false once the subscription reports `Dropped`; the caller
    /// should stop consuming.
    pub fn handle_event(&mut self, event: FeedEvent) -> bool {
        match event {
            FeedEvent::Batch { events } => {
                let snapshot = self.mirror.apply_batch(events);
                self.renderer.render(snapshot);
                true
            }
            FeedEvent::CaughtUp => {
                tracing::debug!(collection = %self.collection, "caught up, streaming live");
                true
            }
            FeedEvent::Dropped { reason } => {
                tracing::info!(collection = %self.collection, ?reason, "subscription dropped");
                false
            }
        }
    }

    /// Block consuming events until the subscription is dropped or the
    /// source disconnects.
    ///
    /// Cancellation is external: `unsubscribe` on the source delivers a
    /// final `Dropped` event, which ends the loop.
    pub fn run(&mut self, subscription: &FeedSubscription) {
        while let Ok(event) = subscription.recv() {
            if !self.handle_event(event) {
                break;
            }
        }
    }

    /// Write-through deletion against the source.
    ///
    /// The mirror is not touched here; the deletion comes back through the
    /// feed as a removed event like any other change.
    pub fn request_delete(&self, id: &ExpenseId) -> Result<()> {
        self.source.delete(&self.collection, id)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    pub fn snapshot(&self) -> &[Expense] {
        self.mirror.snapshot()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consume the driver, handing back the renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
