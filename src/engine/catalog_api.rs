use super::{CatalogStatus, Engine, Resource};

use async_trait::async_trait;

use crate::{
    api::CatalogAPI,
    entities::{CommissionRate, ExtraServiceOffer, RegionRate, VehicleProduct, VehicleSelection},
    error::{catalog_not_ready_error, upstream_message_error, Error},
};

fn unavailable<T>(resource: &Resource<T>) -> Error {
    match resource {
        Resource::Failed(reason) => upstream_message_error(reason.clone()),
        _ => catalog_not_ready_error(),
    }
}

#[async_trait]
impl CatalogAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_rates(&self) -> Result<Vec<RegionRate>, Error> {
        let rates = self.rates.read().await;
        let table = rates.ready().ok_or_else(|| unavailable(&*rates))?;

        Ok(table.rows().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn list_extras(
        &self,
        vehicle: Option<VehicleSelection>,
    ) -> Result<Vec<ExtraServiceOffer>, Error> {
        let vehicle = match vehicle {
            Some(selection) => Some(self.resolve_vehicle(&selection).await),
            None => None,
        };

        let extras = self.extras.read().await;
        let catalog = extras.ready().ok_or_else(|| unavailable(&*extras))?;

        let offers = match vehicle {
            Some(selection) => catalog.for_vehicle(&selection).into_iter().cloned().collect(),
            None => catalog.offers().to_vec(),
        };

        Ok(offers)
    }

    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<VehicleProduct>, Error> {
        let vehicles = self.vehicles.read().await;
        let products = vehicles.ready().ok_or_else(|| unavailable(&*vehicles))?;

        Ok(products.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn find_commission(&self) -> Result<Option<CommissionRate>, Error> {
        let commission = self.commission.read().await;
        let rate = commission.ready().ok_or_else(|| unavailable(&*commission))?;

        Ok(rate.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn reload_catalogs(&self) -> Result<CatalogStatus, Error> {
        Ok(self.reload().await)
    }
}
