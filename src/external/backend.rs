//! Client for the dealer backend: city prices, extra services, vehicle
//! products, commission and the geo name lookups used to label city-price
//! rows.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{CommissionAPI, ExtrasAPI, RateAPI, VehicleAPI},
    config::Config,
    entities::{
        CommissionRate, ExtraServiceOffer, Money, RegionRate, VehicleClass, VehicleProduct,
    },
    error::{
        invalid_input_error, malformed_response_error, upstream_error, upstream_message_error,
        Error,
    },
};

/// Only dealer endpoints carry the bearer token; geo lookups are public.
const ADMIN_PREFIX: &str = "/admin/";
const STATES_PAGE_LIMIT: &str = "500";
const CITIES_PAGE_LIMIT: &str = "1000";

#[derive(Clone, Debug, Deserialize)]
struct CityPriceDto {
    id: Value,
    #[serde(default)]
    route_name: Option<String>,
    #[serde(default)]
    country_id: Value,
    #[serde(default)]
    state_id: Value,
    #[serde(default)]
    city_id: Value,
    #[serde(default)]
    courier_price: Value,
    #[serde(default)]
    minivan_price: Value,
    #[serde(default)]
    panelvan_price: Value,
    #[serde(default)]
    kamyonet_price: Value,
    #[serde(default)]
    kamyon_price: Value,
}

#[derive(Clone, Debug, Deserialize)]
struct ExtraServiceDto {
    id: Value,
    service_name: String,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    carrier_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleProductDto {
    id: Value,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    product_code: Option<String>,
    #[serde(default)]
    product_template: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommissionDto {
    #[serde(default)]
    commission_rate: Value,
    #[serde(default)]
    commission_description: Value,
}

#[derive(Clone, Debug, Deserialize)]
struct NamedDto {
    id: Value,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    api_base: String,
    api_token: Option<String>,
}

impl BackendClient {
    pub fn new(api_base: &str, api_token: Option<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            &config.api_base,
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    #[tracing::instrument(skip(self, query))]
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        let mut req = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .header("Accept", "application/json")
            .query(query);

        if let Some(token) = self.api_token.as_ref().filter(|_| sends_token(path)) {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        let status_code = res.status().as_u16();
        let body: Value = res.json().await.unwrap_or(Value::Null);

        if let Some(message) = failure_message(&body) {
            return Err(upstream_message_error(message));
        }

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if !(200..300).contains(&status_code) {
            return Err(upstream_error());
        }

        Ok(body)
    }

    async fn get_list<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let body = self.get_json(path, query).await?;
        let items = unwrap_list(body)?;
        Ok(serde_json::from_value(items)?)
    }

    /// Id to name map for a geo endpoint. Failed lookups only leave names
    /// blank, they never fail the caller.
    async fn names(&self, path: &str, key: &str, ids: BTreeSet<i64>, limit: &str) -> HashMap<i64, String> {
        let lookups = ids.into_iter().map(|id| {
            let query = vec![
                (key, id.to_string()),
                ("limit", limit.to_string()),
                ("offset", "0".to_string()),
            ];
            async move { self.get_list::<NamedDto>(path, &query).await }
        });

        let mut names = HashMap::new();
        for result in join_all(lookups).await {
            match result {
                Ok(items) => {
                    for item in items {
                        if let (Some(id), Some(name)) = (as_i64(&item.id), item.name) {
                            if !name.is_empty() {
                                names.insert(id, name);
                            }
                        }
                    }
                }
                Err(err) => tracing::warn!(error = %err, path, "geo name lookup failed"),
            }
        }

        names
    }
}

#[async_trait]
impl RateAPI for BackendClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_region_rates(&self) -> Result<Vec<RegionRate>, Error> {
        let rows: Vec<CityPriceDto> = self.get_list("/admin/city-prices", &[]).await?;

        let country_ids: BTreeSet<i64> = rows.iter().filter_map(|row| as_i64(&row.country_id)).collect();
        let state_ids: BTreeSet<i64> = rows.iter().filter_map(|row| as_i64(&row.state_id)).collect();

        let (state_names, city_names) = tokio::join!(
            self.names("/geo/states", "country_id", country_ids, STATES_PAGE_LIMIT),
            self.names("/geo/cities", "state_id", state_ids, CITIES_PAGE_LIMIT),
        );

        Ok(rows
            .into_iter()
            .map(|row| region_rate_from(row, &state_names, &city_names))
            .collect())
    }
}

#[async_trait]
impl ExtrasAPI for BackendClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_extra_services(&self) -> Result<Vec<ExtraServiceOffer>, Error> {
        let rows: Vec<ExtraServiceDto> = self.get_list("/admin/extra-services", &[]).await?;

        Ok(rows
            .into_iter()
            .map(|row| ExtraServiceOffer {
                id: as_text(&row.id),
                label: row.service_name,
                price: Money::from_decimal(as_f64(&row.price).unwrap_or(0.0)),
                applicable_vehicle_tag: row.carrier_type.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl VehicleAPI for BackendClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_vehicle_products(&self) -> Result<Vec<VehicleProduct>, Error> {
        let rows: Vec<VehicleProductDto> = self.get_list("/admin/vehicles", &[]).await?;
        Ok(active_products(rows))
    }
}

#[async_trait]
impl CommissionAPI for BackendClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_commission(&self) -> Result<Option<CommissionRate>, Error> {
        let body = self.get_json("/admin/users/commission/", &[]).await?;
        commission_from(body)
    }
}

fn sends_token(path: &str) -> bool {
    path.starts_with(ADMIN_PREFIX)
}

/// Drops products explicitly marked inactive; a missing flag means active.
fn active_products(rows: Vec<VehicleProductDto>) -> Vec<VehicleProduct> {
    rows.into_iter()
        .filter(|row| row.is_active != Some(false))
        .map(|row| VehicleProduct {
            id: as_text(&row.id),
            name: row.product_name.unwrap_or_default(),
            code: row.product_code.unwrap_or_default(),
            template: row.product_template.unwrap_or_default(),
        })
        .collect()
}

fn commission_from(body: Value) -> Result<Option<CommissionRate>, Error> {
    let data = match body.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => return Err(upstream_message_error("commission information not found".into())),
    };

    let dto: CommissionDto = serde_json::from_value(data)?;
    let rate = CommissionRate {
        percent: as_f64(&dto.commission_rate).unwrap_or(0.0),
        description: match dto.commission_description {
            Value::Null => None,
            other => Some(as_text(&other)),
        },
    };

    Ok(Some(rate).filter(CommissionRate::is_configured))
}

fn region_rate_from(
    row: CityPriceDto,
    state_names: &HashMap<i64, String>,
    city_names: &HashMap<i64, String>,
) -> RegionRate {
    let state_id = as_i64(&row.state_id).unwrap_or_default();
    let city_id = as_i64(&row.city_id).unwrap_or_default();

    let columns = [
        (VehicleClass::Courier, &row.courier_price),
        (VehicleClass::Minivan, &row.minivan_price),
        (VehicleClass::Panelvan, &row.panelvan_price),
        (VehicleClass::Kamyonet, &row.kamyonet_price),
        (VehicleClass::Kamyon, &row.kamyon_price),
    ];

    RegionRate {
        id: as_text(&row.id),
        route_label: row.route_name.clone().unwrap_or_default(),
        country_id: as_i64(&row.country_id).unwrap_or_default(),
        state_id,
        city_id,
        state_name: state_names.get(&state_id).cloned().unwrap_or_default(),
        city_name: city_names.get(&city_id).cloned().unwrap_or_default(),
        unit_price_by_vehicle_class: columns
            .iter()
            .map(|(class, value)| (*class, as_f64(value).unwrap_or(0.0)))
            .collect(),
    }
}

/// The backend answers either with a bare array or with
/// `{ success, message, data: [...] }`.
fn unwrap_list(body: Value) -> Result<Value, Error> {
    match body {
        Value::Array(_) => Ok(body),
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => Ok(data),
            _ => Err(malformed_response_error("expected a list")),
        },
        _ => Err(malformed_response_error("expected a list")),
    }
}

fn failure_message(body: &Value) -> Option<String> {
    if body.get("success") != Some(&Value::Bool(false)) {
        return None;
    }

    let message = ["message", "detail", "title"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or("request rejected by backend");

    Some(message.to_string())
}

fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse().ok(),
        _ => None,
    };

    number.filter(|n| n.is_finite())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_bare_and_enveloped_lists() {
        assert_eq!(unwrap_list(json!([1, 2])).unwrap(), json!([1, 2]));
        assert_eq!(
            unwrap_list(json!({"success": true, "data": [3]})).unwrap(),
            json!([3])
        );
        assert!(unwrap_list(json!({"success": true, "data": {"id": 1}})).is_err());
        assert!(unwrap_list(Value::Null).is_err());
    }

    #[test]
    fn rejected_envelope_carries_backend_message() {
        let body = json!({"success": false, "message": "token expired"});
        assert_eq!(failure_message(&body).as_deref(), Some("token expired"));
        assert_eq!(failure_message(&json!({"success": true})), None);
    }

    #[test]
    fn city_price_rows_join_geo_names() {
        let row: CityPriceDto = serde_json::from_value(json!({
            "id": "a1",
            "route_name": "İstanbul içi",
            "country_id": 90,
            "state_id": "34",
            "city_id": 3401,
            "courier_price": 10,
            "minivan_price": "17,5",
            "panelvan_price": null,
            "kamyonet_price": 0
        }))
        .unwrap();

        let states = [(34, "İstanbul".to_string())].into_iter().collect();
        let cities = HashMap::new();
        let rate = region_rate_from(row, &states, &cities);

        assert_eq!(rate.id, "a1");
        assert_eq!(rate.state_name, "İstanbul");
        assert_eq!(rate.city_name, "");
        assert_eq!(rate.unit_price(VehicleClass::Courier), 10.0);
        assert_eq!(rate.unit_price(VehicleClass::Minivan), 17.5);
        assert_eq!(rate.unit_price(VehicleClass::Panelvan), 0.0);
        assert_eq!(rate.unit_price(VehicleClass::Kamyon), 0.0);
    }

    #[test]
    fn inactive_vehicle_products_are_dropped() {
        let rows: Vec<VehicleProductDto> = serde_json::from_value(json!([
            {"id": 7, "productName": "Kamyon 10t", "productCode": "KMY10", "productTemplate": "kamyon", "isActive": true},
            {"id": "8", "productName": "Eski Panelvan", "productTemplate": "panelvan", "isActive": false},
            {"id": "9", "productName": "Minivan", "productTemplate": "minivan"}
        ]))
        .unwrap();

        let products = active_products(rows);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "7");
        assert_eq!(products[0].template, "kamyon");
        assert_eq!(products[0].code, "KMY10");
        assert_eq!(products[1].id, "9");
        assert_eq!(products[1].code, "");
    }

    #[test]
    fn token_is_only_sent_to_dealer_endpoints() {
        assert!(sends_token("/admin/city-prices"));
        assert!(sends_token("/admin/vehicles"));
        assert!(!sends_token("/geo/states"));
        assert!(!sends_token("/geo/cities"));
    }

    #[test]
    fn zero_commission_means_not_configured() {
        let configured = commission_from(json!({"data": {"commissionRate": 15, "commissionDescription": "bayi"}}))
            .unwrap()
            .unwrap();
        assert_eq!(configured.percent, 15.0);
        assert_eq!(configured.description.as_deref(), Some("bayi"));

        assert_eq!(commission_from(json!({"data": {"commissionRate": 0}})).unwrap(), None);
        assert_eq!(commission_from(json!({"data": {"commissionRate": null}})).unwrap(), None);
        assert!(commission_from(json!({"success": true})).is_err());
    }
}
