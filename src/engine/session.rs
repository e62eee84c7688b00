use std::sync::{Arc, Mutex};

use super::Engine;

use crate::{
    distance::DistanceResolver,
    entities::{Quote, QuoteRequest},
};

/// Drives recomputation for one caller whose inputs change over time.
///
/// Each `recompute` supersedes the previous one: an older computation that
/// finishes late is dropped and never replaces the published quote.
pub struct QuoteSession {
    engine: Arc<Engine>,
    resolver: DistanceResolver,
    latest: Mutex<Option<Quote>>,
}

impl QuoteSession {
    pub fn new(engine: Arc<Engine>) -> Self {
        let resolver = engine.resolver();

        Self {
            engine,
            resolver,
            latest: Mutex::new(None),
        }
    }

    /// Prices the request and publishes the result if no newer request has
    /// started meanwhile. Returns the published quote, or `None` if this
    /// computation was superseded.
    #[tracing::instrument(skip(self, request))]
    pub async fn recompute(&self, request: QuoteRequest) -> Option<Quote> {
        let generation = self.resolver.begin();
        let quote = self.engine.price(&self.resolver, generation, &request).await?;

        let mut latest = self.latest.lock().ok()?;
        if !self.resolver.is_current(generation) {
            tracing::debug!(generation, "dropping superseded quote");
            return None;
        }

        *latest = Some(quote.clone());
        Some(quote)
    }

    pub fn latest(&self) -> Option<Quote> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }
}
