use async_trait::async_trait;

use crate::engine::CatalogStatus;
use crate::entities::{
    CommissionRate, ExtraServiceOffer, GeoPoint, Quote, QuoteRequest, RegionRate,
    VehicleProduct, VehicleSelection,
};
use crate::error::Error;

/// Source of per-region, per-vehicle unit rates.
#[async_trait]
pub trait RateAPI {
    async fn fetch_region_rates(&self) -> Result<Vec<RegionRate>, Error>;
}

/// Source of optional add-on services.
#[async_trait]
pub trait ExtrasAPI {
    async fn fetch_extra_services(&self) -> Result<Vec<ExtraServiceOffer>, Error>;
}

/// Source of the dealer's active vehicle products.
#[async_trait]
pub trait VehicleAPI {
    async fn fetch_vehicle_products(&self) -> Result<Vec<VehicleProduct>, Error>;
}

/// Source of the current dealer's commission. `None` means nothing is configured.
#[async_trait]
pub trait CommissionAPI {
    async fn fetch_commission(&self) -> Result<Option<CommissionRate>, Error>;
}

/// Driving-route length between two coordinates, in meters.
#[async_trait]
pub trait RoutingAPI {
    async fn route_distance_meters(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<f64, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    async fn create_quote(&self, request: QuoteRequest) -> Result<Quote, Error>;
}

#[async_trait]
pub trait CatalogAPI {
    async fn list_rates(&self) -> Result<Vec<RegionRate>, Error>;
    async fn list_extras(
        &self,
        vehicle: Option<VehicleSelection>,
    ) -> Result<Vec<ExtraServiceOffer>, Error>;
    async fn list_vehicles(&self) -> Result<Vec<VehicleProduct>, Error>;
    async fn find_commission(&self) -> Result<Option<CommissionRate>, Error>;
    async fn reload_catalogs(&self) -> Result<CatalogStatus, Error>;
}

pub trait API: QuoteAPI + CatalogAPI {}
