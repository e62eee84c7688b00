use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceState;
use crate::entities::{Diagnostic, IssueKind, PriceBreakdown, Quote, Readiness, UnpricedCause};

/// How the unit rate for a submission was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateOutcome {
    Matched,
    /// A row matched the region but its column for the vehicle is `0`.
    ZeroColumn,
    NoMatchingRow,
    RegionUnknown,
    CatalogLoading,
    CatalogUnavailable(String),
}

pub struct PricingInputs<'a> {
    pub breakdown: &'a PriceBreakdown,
    pub distance: &'a DistanceState,
    pub rate: &'a RateOutcome,
}

/// Decides whether a breakdown may be submitted. Only a positive base price
/// is ready; otherwise the diagnostic names what kept it unpriced.
pub fn assess(inputs: PricingInputs<'_>) -> Readiness {
    let cause = match inputs.breakdown.unpriced_cause() {
        None => return Readiness::Ready,
        Some(cause) => cause,
    };

    let distance_blamed = matches!(cause, UnpricedCause::Distance | UnpricedCause::Both);
    let rate_blamed = matches!(cause, UnpricedCause::Rate | UnpricedCause::Both);

    let diagnostic = if let (true, DistanceState::Unavailable(reason)) = (distance_blamed, inputs.distance) {
        Diagnostic {
            kind: IssueKind::LookupUnavailable,
            cause: Some(cause),
            message: format!(
                "Route distance could not be computed ({}). Check the locations and try again.",
                reason
            ),
        }
    } else if let (true, RateOutcome::CatalogUnavailable(reason)) = (rate_blamed, inputs.rate) {
        Diagnostic {
            kind: IssueKind::LookupUnavailable,
            cause: Some(cause),
            message: format!("Region prices could not be loaded ({}). Try again.", reason),
        }
    } else if distance_blamed && !matches!(inputs.distance, DistanceState::Resolved(_)) {
        Diagnostic::new(
            IssueKind::InputIncomplete,
            Some(cause),
            "Pick both the pickup and drop-off locations.",
        )
    } else if distance_blamed && !rate_blamed {
        Diagnostic::new(
            IssueKind::InputIncomplete,
            Some(cause),
            "The route is too short to be priced.",
        )
    } else {
        rate_diagnostic(cause, inputs.rate)
    };

    Readiness::Blocked { diagnostic }
}

fn rate_diagnostic(cause: UnpricedCause, rate: &RateOutcome) -> Diagnostic {
    match rate {
        RateOutcome::RegionUnknown => Diagnostic::new(
            IssueKind::InputIncomplete,
            Some(cause),
            "The city and state of the locations are not known yet.",
        ),
        RateOutcome::CatalogLoading => Diagnostic::new(
            IssueKind::InputIncomplete,
            Some(cause),
            "Region prices are still loading.",
        ),
        RateOutcome::CatalogUnavailable(reason) => Diagnostic {
            kind: IssueKind::LookupUnavailable,
            cause: Some(cause),
            message: format!("Region prices could not be loaded ({}). Try again.", reason),
        },
        RateOutcome::NoMatchingRow | RateOutcome::ZeroColumn | RateOutcome::Matched => {
            Diagnostic::new(
                IssueKind::NoMatchingRate,
                Some(cause),
                "No price is defined for this region and vehicle. Define a city price for it first.",
            )
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    #[default]
    Immediate,
    Scheduled,
}

/// Form-level presence checks that wrap the pricing gate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub dropoff_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    /// Only read for scheduled deliveries.
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_time: Option<NaiveTime>,
}

impl SubmissionForm {
    pub fn check(&self, quote: &Quote) -> Readiness {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if blank(&self.pickup_address) || blank(&self.dropoff_address) {
            return Readiness::Blocked {
                diagnostic: Diagnostic::new(
                    IssueKind::InputIncomplete,
                    None,
                    "Enter the pickup and drop-off addresses.",
                ),
            };
        }

        if self.payment_method.is_none() {
            return Readiness::Blocked {
                diagnostic: Diagnostic::new(
                    IssueKind::InputIncomplete,
                    None,
                    "Select a payment method.",
                ),
            };
        }

        let unscheduled = self.delivery_date.is_none() || self.delivery_time.is_none();
        if self.delivery_type == DeliveryType::Scheduled && unscheduled {
            return Readiness::Blocked {
                diagnostic: Diagnostic::new(
                    IssueKind::InputIncomplete,
                    None,
                    "A scheduled delivery needs both a date and a time.",
                ),
            };
        }

        quote.readiness.clone()
    }
}
