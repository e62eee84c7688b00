use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    api::RoutingAPI,
    entities::GeoPoint,
    error::{invalid_input_error, malformed_response_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouteSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RouteSummary {
    distance: Option<f64>,
}

/// Driving distances from an OSRM `route` service.
#[derive(Clone, Debug)]
pub struct OsrmClient {
    client: reqwest::Client,
    api_base: String,
}

impl OsrmClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.api_base, origin.lng, origin.lat, destination.lng, destination.lat
        )
    }
}

#[async_trait]
impl RoutingAPI for OsrmClient {
    #[tracing::instrument(skip(self))]
    async fn route_distance_meters(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<f64, Error> {
        let res = self
            .client
            .get(self.route_url(origin, destination))
            .query(&[("overview", "false")])
            .query(&[("alternatives", "false")])
            .query(&[("steps", "false")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: RouteResponse = res.json().await?;
        distance_from(data)
    }
}

fn distance_from(data: RouteResponse) -> Result<f64, Error> {
    if data.code != "Ok" {
        return Err(upstream_error());
    }

    data.routes
        .first()
        .and_then(|route| route.distance)
        .ok_or_else(|| malformed_response_error("route response missing distance"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_puts_longitude_first() {
        let client = OsrmClient::new("https://router.example.org/", Duration::from_secs(1)).unwrap();
        let url = client.route_url(&GeoPoint::new(41.0, 29.0), &GeoPoint::new(39.9, 32.8));

        assert_eq!(url, "https://router.example.org/route/v1/driving/29,41;32.8,39.9");
    }

    #[test]
    fn reads_first_route_distance() {
        let data: RouteResponse = serde_json::from_str(
            r#"{"code":"Ok","routes":[{"distance":12400.0,"duration":900.1},{"distance":15000.0}]}"#,
        )
        .unwrap();

        assert_eq!(distance_from(data).unwrap(), 12400.0);
    }

    #[test]
    fn missing_distance_is_malformed() {
        let data: RouteResponse = serde_json::from_str(r#"{"code":"Ok","routes":[]}"#).unwrap();
        assert_eq!(distance_from(data).unwrap_err().code, 5);

        let data: RouteResponse = serde_json::from_str(r#"{"code":"NoRoute"}"#).unwrap();
        assert_eq!(distance_from(data).unwrap_err().code, 4);
    }
}
