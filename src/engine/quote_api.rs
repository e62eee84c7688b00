use super::{Engine, Resource};

use async_trait::async_trait;

use crate::{
    api::QuoteAPI,
    distance::{DistanceResolver, DistanceState},
    entities::{
        Diagnostic, IssueKind, Quote, QuoteRequest, Readiness, Region, VehicleSelection,
    },
    error::{unexpected_error, Error},
    pricing::{
        assess, compute_price, with_commission, ExtrasCatalog, PricingInputs, RateMatch,
        RateOutcome, RateTable,
    },
};

impl Engine {
    pub(crate) fn resolver(&self) -> DistanceResolver {
        DistanceResolver::new(self.sources.routing.clone(), self.distance_cache.clone())
    }

    /// Prices a request under the given distance generation. Returns `None`
    /// when a newer generation replaced this one before the distance resolved.
    #[tracing::instrument(skip(self, resolver, request))]
    pub(crate) async fn price(
        &self,
        resolver: &DistanceResolver,
        generation: u64,
        request: &QuoteRequest,
    ) -> Option<Quote> {
        let region = Region::for_shipment(request.pickup.as_ref(), request.dropoff.as_ref());

        let distance = resolver
            .resolve_for(generation, request.pickup.as_ref(), request.dropoff.as_ref())
            .await;
        if distance == DistanceState::Superseded {
            return None;
        }

        let vehicle = self.resolve_vehicle(&request.vehicle).await;
        let (unit_rate, rate) = match &*self.rates.read().await {
            Resource::Ready(table) => rate_for(table, &region, &vehicle),
            Resource::Loading => (0.0, RateOutcome::CatalogLoading),
            Resource::Failed(reason) => (0.0, RateOutcome::CatalogUnavailable(reason.clone())),
        };

        let extras = self.extras.read().await;
        let empty = ExtrasCatalog::default();
        let catalog = extras.ready().unwrap_or(&empty);

        let commission_percent = self
            .commission
            .read()
            .await
            .ready()
            .and_then(|rate| rate.as_ref())
            .filter(|rate| rate.is_configured())
            .map(|rate| rate.percent);

        let breakdown = with_commission(
            compute_price(distance.km(), unit_rate, catalog, &request.extra_service_ids),
            commission_percent,
        );

        let mut readiness = assess(PricingInputs {
            breakdown: &breakdown,
            distance: &distance,
            rate: &rate,
        });

        // selected extras cannot be priced without their catalog
        if readiness.is_ready() && !request.extra_service_ids.is_empty() {
            let reason = match &*extras {
                Resource::Ready(_) => None,
                Resource::Loading => Some("still loading".to_string()),
                Resource::Failed(reason) => Some(reason.clone()),
            };

            if let Some(reason) = reason {
                readiness = Readiness::Blocked {
                    diagnostic: Diagnostic {
                        kind: IssueKind::LookupUnavailable,
                        cause: None,
                        message: format!("Extra services could not be loaded ({}). Try again.", reason),
                    },
                };
            }
        }

        tracing::info!(
            distance_km = breakdown.distance_km,
            unit_rate = breakdown.unit_rate,
            grand_total = %breakdown.grand_total,
            ready = readiness.is_ready(),
            "priced shipment"
        );

        Some(Quote::new(region, breakdown, readiness))
    }
}

fn rate_for(table: &RateTable, region: &Region, vehicle: &VehicleSelection) -> (f64, RateOutcome) {
    if !region.is_known() {
        return (0.0, RateOutcome::RegionUnknown);
    }

    let row = match table.lookup(region.city_name.as_deref(), region.state_name.as_deref()) {
        RateMatch::City(row) | RateMatch::State(row) => row,
        RateMatch::None => return (0.0, RateOutcome::NoMatchingRow),
    };

    match row.unit_price_for(vehicle) {
        price if price > 0.0 => (price, RateOutcome::Matched),
        _ => (0.0, RateOutcome::ZeroColumn),
    }
}

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_quote(&self, request: QuoteRequest) -> Result<Quote, Error> {
        // a lone request has nothing to supersede it, so a fresh resolver
        // always yields a quote
        let resolver = self.resolver();
        let generation = resolver.begin();

        self.price(&resolver, generation, &request)
            .await
            .ok_or_else(unexpected_error)
    }
}
