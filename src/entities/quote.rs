use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    normalize_address, CommissionSplit, GeoPoint, Money, Region, VehicleSelection,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub pickup: Option<GeoPoint>,
    #[serde(default)]
    pub dropoff: Option<GeoPoint>,
    #[serde(default)]
    pub vehicle: VehicleSelection,
    #[serde(default)]
    pub extra_service_ids: BTreeSet<String>,
}

impl QuoteRequest {
    /// Cuts geocoder addresses down to what a dispatcher needs to read.
    pub fn with_normalized_addresses(mut self) -> Self {
        for point in [&mut self.pickup, &mut self.dropoff].into_iter().flatten() {
            if let Some(address) = point.address.as_mut() {
                let normalized = normalize_address(address);
                *address = normalized;
            }
        }

        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub distance_km: f64,
    pub unit_rate: f64,
    pub base_price: Money,
    pub extras_total: Money,
    pub grand_total: Money,
    pub commission: CommissionSplit,
}

impl PriceBreakdown {
    pub fn commission_amount(&self) -> Option<Money> {
        self.commission.commission_amount()
    }

    pub fn carrier_payout(&self) -> Option<Money> {
        self.commission.carrier_payout()
    }

    pub fn is_priced(&self) -> bool {
        self.base_price.is_positive()
    }

    /// Which input kept the base price at zero, if any.
    pub fn unpriced_cause(&self) -> Option<UnpricedCause> {
        if self.is_priced() {
            return None;
        }

        let no_distance = !(self.distance_km > 0.0);
        let no_rate = !(self.unit_rate > 0.0);

        match (no_distance, no_rate) {
            (true, true) => Some(UnpricedCause::Both),
            (true, false) => Some(UnpricedCause::Distance),
            (false, true) => Some(UnpricedCause::Rate),
            // both present but the product rounds to zero: the route is too short
            (false, false) => Some(UnpricedCause::Distance),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnpricedCause {
    Distance,
    Rate,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Coordinates, region or form fields are missing; nothing has failed.
    InputIncomplete,
    /// A collaborator failed or answered with malformed data; retryable.
    LookupUnavailable,
    /// The region is known but no rate row prices it.
    NoMatchingRate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: IssueKind,
    pub cause: Option<UnpricedCause>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: IssueKind, cause: Option<UnpricedCause>, message: &str) -> Self {
        Self {
            kind,
            cause,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind == IssueKind::LookupUnavailable
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Blocked { diagnostic: Diagnostic },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Ready => None,
            Self::Blocked { diagnostic } => Some(diagnostic),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    pub region: Region,
    pub breakdown: PriceBreakdown,
    pub readiness: Readiness,
}

impl Quote {
    pub fn new(region: Region, breakdown: PriceBreakdown, readiness: Readiness) -> Self {
        Self {
            token: Uuid::new_v4(),
            created_at: Utc::now(),
            region,
            breakdown,
            readiness,
        }
    }
}
