use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::engine::CatalogStatus;
use crate::entities::{
    CarrierType, CommissionRate, ExtraServiceOffer, RegionRate, VehicleProduct, VehicleSelection,
};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasParams {
    carrier_type: Option<CarrierType>,
    vehicle_template: Option<String>,
    vehicle_product_id: Option<String>,
}

pub async fn rates(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<RegionRate>>, Error> {
    let rates = api.list_rates().await?;

    Ok(rates.into())
}

pub async fn extras(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ExtrasParams>,
) -> Result<Json<Vec<ExtraServiceOffer>>, Error> {
    let vehicle = match params {
        ExtrasParams {
            carrier_type: None,
            vehicle_template: None,
            vehicle_product_id: None,
        } => None,
        ExtrasParams {
            carrier_type,
            vehicle_template,
            vehicle_product_id,
        } => Some(VehicleSelection {
            carrier_type: carrier_type.unwrap_or_default(),
            vehicle_template,
            vehicle_product_id,
        }),
    };

    let offers = api.list_extras(vehicle).await?;

    Ok(offers.into())
}

pub async fn vehicles(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Vec<VehicleProduct>>, Error> {
    let vehicles = api.list_vehicles().await?;

    Ok(vehicles.into())
}

pub async fn commission(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Option<CommissionRate>>, Error> {
    let commission = api.find_commission().await?;

    Ok(commission.into())
}

pub async fn reload(Extension(api): Extension<DynAPI>) -> Result<Json<CatalogStatus>, Error> {
    let status = api.reload_catalogs().await?;

    Ok(status.into())
}
