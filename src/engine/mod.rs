mod catalog_api;
mod quote_api;
mod resource;
mod session;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::{CommissionAPI, ExtrasAPI, RateAPI, VehicleAPI, API},
    distance::{DistanceCache, DynRouting},
    entities::{CommissionRate, VehicleProduct, VehicleSelection},
    pricing::{ExtrasCatalog, RateTable},
};

pub use resource::{CatalogStatus, Resource, ResourceStatus};
pub use session::QuoteSession;

/// The collaborators the engine prices against.
#[derive(Clone)]
pub struct Sources {
    pub rates: Arc<dyn RateAPI + Send + Sync>,
    pub extras: Arc<dyn ExtrasAPI + Send + Sync>,
    pub vehicles: Arc<dyn VehicleAPI + Send + Sync>,
    pub commission: Arc<dyn CommissionAPI + Send + Sync>,
    pub routing: DynRouting,
}

pub struct Engine {
    sources: Sources,
    distance_cache: Arc<DistanceCache>,
    rates: RwLock<Resource<RateTable>>,
    extras: RwLock<Resource<ExtrasCatalog>>,
    vehicles: RwLock<Resource<Vec<VehicleProduct>>>,
    commission: RwLock<Resource<Option<CommissionRate>>>,
}

impl Engine {
    /// Creates an engine whose catalogs are still loading. Call [`Engine::load`]
    /// before quoting.
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            distance_cache: Arc::new(DistanceCache::new()),
            rates: RwLock::new(Resource::Loading),
            extras: RwLock::new(Resource::Loading),
            vehicles: RwLock::new(Resource::Loading),
            commission: RwLock::new(Resource::Loading),
        }
    }

    /// Fetches the rate table, extras, vehicle products and commission
    /// concurrently.
    /// A failing source leaves its resource `Failed`; the others still load.
    #[tracing::instrument(name = "Engine::load", skip_all)]
    pub async fn load(&self) -> CatalogStatus {
        let (rates, extras, vehicles, commission) = tokio::join!(
            self.sources.rates.fetch_region_rates(),
            self.sources.extras.fetch_extra_services(),
            self.sources.vehicles.fetch_vehicle_products(),
            self.sources.commission.fetch_commission(),
        );

        match &rates {
            Ok(rows) => tracing::info!("loaded {} region rates", rows.len()),
            Err(err) => tracing::warn!(error = %err, "failed to load region rates"),
        }
        match &extras {
            Ok(offers) => tracing::info!("loaded {} extra services", offers.len()),
            Err(err) => tracing::warn!(error = %err, "failed to load extra services"),
        }
        match &vehicles {
            Ok(products) => tracing::info!("loaded {} vehicle products", products.len()),
            Err(err) => tracing::warn!(error = %err, "failed to load vehicle products"),
        }
        match &commission {
            Ok(Some(rate)) => tracing::info!("loaded commission rate {}%", rate.percent),
            Ok(None) => tracing::info!("no commission configured"),
            Err(err) => tracing::warn!(error = %err, "failed to load commission"),
        }

        *self.rates.write().await = Resource::from_result(rates.map(RateTable::new));
        *self.extras.write().await = Resource::from_result(extras.map(ExtrasCatalog::new));
        *self.vehicles.write().await = Resource::from_result(vehicles);
        *self.commission.write().await = Resource::from_result(commission);

        self.status().await
    }

    /// Marks every catalog as loading, drops cached distances and loads again.
    pub async fn reload(&self) -> CatalogStatus {
        *self.rates.write().await = Resource::Loading;
        *self.extras.write().await = Resource::Loading;
        *self.vehicles.write().await = Resource::Loading;
        *self.commission.write().await = Resource::Loading;
        self.distance_cache.clear();

        self.load().await
    }

    pub async fn status(&self) -> CatalogStatus {
        CatalogStatus {
            rates: self.rates.read().await.status(),
            extras: self.extras.read().await.status(),
            vehicles: self.vehicles.read().await.status(),
            commission: self.commission.read().await.status(),
        }
    }

    /// Applies the vehicle product catalog to a selection. While the catalog
    /// is not ready the selection is priced as sent.
    pub(crate) async fn resolve_vehicle(&self, selection: &VehicleSelection) -> VehicleSelection {
        match self.vehicles.read().await.ready() {
            Some(products) => selection.resolve_product(products),
            None => selection.clone(),
        }
    }

    /// Starts a recompute session that shares this engine's catalogs.
    pub fn session(self: &Arc<Self>) -> QuoteSession {
        QuoteSession::new(self.clone())
    }
}

impl API for Engine {}
