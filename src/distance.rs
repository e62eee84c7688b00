//! Route distance resolution with last-write-wins supersession.
//!
//! Every lookup runs under a generation number. Starting a new lookup bumps
//! the generation and aborts whatever was in flight; a result that comes back
//! for an older generation is discarded and reported as `Superseded`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{AbortHandle, Abortable};
use serde::{Deserialize, Serialize};

use crate::api::RoutingAPI;
use crate::entities::GeoPoint;

const CACHE_CAPACITY: usize = 512;
const COORDINATE_SCALE: f64 = 1e6;

pub type DynRouting = Arc<dyn RoutingAPI + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DistanceState {
    /// One of the points is missing or not a finite coordinate.
    Incomplete,
    Resolved(f64),
    /// The routing collaborator failed, timed out or answered with garbage.
    Unavailable(String),
    /// A newer lookup replaced this one before it finished.
    Superseded,
}

impl DistanceState {
    pub fn km(&self) -> f64 {
        match self {
            Self::Resolved(km) => *km,
            _ => 0.0,
        }
    }
}

type CacheKey = (i64, i64, i64, i64);

/// Advisory cache of resolved distances keyed by coordinates rounded to
/// 1e-6 degrees. Safe to clear at any time.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: Mutex<HashMap<CacheKey, f64>>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(origin: &GeoPoint, destination: &GeoPoint) -> CacheKey {
        let scaled = |value: f64| (value * COORDINATE_SCALE).round() as i64;
        (
            scaled(origin.lat),
            scaled(origin.lng),
            scaled(destination.lat),
            scaled(destination.lng),
        )
    }

    pub fn get(&self, origin: &GeoPoint, destination: &GeoPoint) -> Option<f64> {
        let entries = self.entries.lock().ok()?;
        entries.get(&Self::key(origin, destination)).copied()
    }

    pub fn insert(&self, origin: &GeoPoint, destination: &GeoPoint, km: f64) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= CACHE_CAPACITY {
                entries.clear();
            }
            entries.insert(Self::key(origin, destination), km);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

pub struct DistanceResolver {
    routing: DynRouting,
    cache: Arc<DistanceCache>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl DistanceResolver {
    pub fn new(routing: DynRouting, cache: Arc<DistanceCache>) -> Self {
        Self {
            routing,
            cache,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Starts a new generation, cancelling the lookup in flight, if any.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut slot) = self.in_flight.lock() {
            if let Some(previous) = slot.take() {
                tracing::debug!(generation, "aborting superseded distance lookup");
                previous.abort();
            }
        }

        generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn resolve(
        &self,
        origin: Option<&GeoPoint>,
        destination: Option<&GeoPoint>,
    ) -> DistanceState {
        let generation = self.begin();
        self.resolve_for(generation, origin, destination).await
    }

    #[tracing::instrument(skip(self, origin, destination))]
    pub async fn resolve_for(
        &self,
        generation: u64,
        origin: Option<&GeoPoint>,
        destination: Option<&GeoPoint>,
    ) -> DistanceState {
        let (origin, destination) = match (origin, destination) {
            (Some(origin), Some(destination)) if origin.is_routable() && destination.is_routable() => {
                (origin, destination)
            }
            _ => return DistanceState::Incomplete,
        };

        if let Some(km) = self.cache.get(origin, destination) {
            return self.settle(generation, DistanceState::Resolved(km));
        }

        let (handle, registration) = AbortHandle::new_pair();
        if let Ok(mut slot) = self.in_flight.lock() {
            if !self.is_current(generation) {
                return DistanceState::Superseded;
            }
            *slot = Some(handle);
        }

        let lookup = Abortable::new(
            self.routing.route_distance_meters(origin, destination),
            registration,
        );

        let state = match lookup.await {
            Err(_aborted) => DistanceState::Superseded,
            Ok(Ok(meters)) if meters.is_finite() && meters >= 0.0 => {
                let km = meters / 1000.0;
                self.cache.insert(origin, destination, km);
                DistanceState::Resolved(km)
            }
            Ok(Ok(meters)) => {
                tracing::warn!(meters, "routing returned an unusable distance");
                DistanceState::Unavailable("invalid route distance".into())
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "route distance lookup failed");
                DistanceState::Unavailable(err.message)
            }
        };

        self.settle(generation, state)
    }

    fn settle(&self, generation: u64, state: DistanceState) -> DistanceState {
        let mut slot = self.in_flight.lock().ok();

        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding stale distance result");
            return DistanceState::Superseded;
        }

        if let Some(slot) = slot.as_mut() {
            **slot = None;
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{timeout_error, Error};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Answers with the origin latitude in kilometers after a delay derived
    /// from the destination longitude (in milliseconds).
    struct SlowRouting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RoutingAPI for SlowRouting {
        async fn route_distance_meters(
            &self,
            origin: &GeoPoint,
            destination: &GeoPoint,
        ) -> Result<f64, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(destination.lng as u64)).await;
            Ok(origin.lat * 1000.0)
        }
    }

    struct FailingRouting;

    #[async_trait]
    impl RoutingAPI for FailingRouting {
        async fn route_distance_meters(&self, _: &GeoPoint, _: &GeoPoint) -> Result<f64, Error> {
            Err(timeout_error())
        }
    }

    fn resolver(routing: DynRouting) -> DistanceResolver {
        DistanceResolver::new(routing, Arc::new(DistanceCache::new()))
    }

    fn slow() -> Arc<SlowRouting> {
        Arc::new(SlowRouting {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn missing_points_skip_the_collaborator() {
        let routing = slow();
        let resolver = resolver(routing.clone());
        let point = GeoPoint::new(12.4, 0.0);

        assert_eq!(resolver.resolve(Some(&point), None).await, DistanceState::Incomplete);
        assert_eq!(
            resolver
                .resolve(Some(&point), Some(&GeoPoint::new(f64::NAN, 0.0)))
                .await,
            DistanceState::Incomplete
        );
        assert_eq!(routing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn converts_meters_to_kilometers_and_caches() {
        let routing = slow();
        let resolver = resolver(routing.clone());
        let origin = GeoPoint::new(12.4, 0.0);
        let destination = GeoPoint::new(0.0, 1.0);

        assert_eq!(
            resolver.resolve(Some(&origin), Some(&destination)).await,
            DistanceState::Resolved(12.4)
        );
        assert_eq!(
            resolver.resolve(Some(&origin), Some(&destination)).await,
            DistanceState::Resolved(12.4)
        );
        assert_eq!(routing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_unavailable_not_zero() {
        let resolver = resolver(Arc::new(FailingRouting));
        let point = GeoPoint::new(41.0, 29.0);

        let state = resolver.resolve(Some(&point), Some(&point)).await;
        assert!(matches!(state, DistanceState::Unavailable(_)));
        assert_eq!(state.km(), 0.0);
    }

    #[tokio::test]
    async fn newer_lookup_supersedes_older_one() {
        let resolver = Arc::new(resolver(slow()));

        let stale_origin = GeoPoint::new(99.0, 0.0);
        let stale_destination = GeoPoint::new(0.0, 200.0);
        let fresh_origin = GeoPoint::new(12.4, 0.0);
        let fresh_destination = GeoPoint::new(0.0, 5.0);

        let first = {
            let resolver = resolver.clone();
            tokio::spawn(async move {
                resolver
                    .resolve(Some(&stale_origin), Some(&stale_destination))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = resolver
            .resolve(Some(&fresh_origin), Some(&fresh_destination))
            .await;

        assert_eq!(second, DistanceState::Resolved(12.4));
        assert_eq!(first.await.unwrap(), DistanceState::Superseded);
    }

    #[tokio::test]
    async fn late_result_of_old_generation_is_discarded() {
        let resolver = resolver(slow());
        let origin = GeoPoint::new(5.0, 0.0);
        let destination = GeoPoint::new(0.0, 1.0);

        let stale = resolver.begin();
        let _fresh = resolver.begin();

        assert_eq!(
            resolver
                .resolve_for(stale, Some(&origin), Some(&destination))
                .await,
            DistanceState::Superseded
        );
    }

    #[test]
    fn cache_is_bounded() {
        let cache = DistanceCache::new();
        for i in 0..(CACHE_CAPACITY + 10) {
            let point = GeoPoint::new(i as f64 * 0.001, 0.0);
            cache.insert(&point, &point, 1.0);
        }

        assert!(cache.len() <= CACHE_CAPACITY);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
