use std::collections::BTreeSet;

use crate::entities::{CommissionSplit, Money, PriceBreakdown};
use crate::pricing::{commission, ExtrasCatalog};

/// Base price, extras and grand total for one submission.
///
/// `base_price = round_half_up(distance_km * unit_rate)` in whole currency
/// units, and exactly zero when either input is zero (or not a usable
/// number). A product above [`Money::MAX`] leaves the shipment unpriced with
/// the rate blamed. The commission is left `NotApplicable`; see [`with_commission`].
pub fn compute_price(
    distance_km: f64,
    unit_rate: f64,
    extras: &ExtrasCatalog,
    selected_extra_ids: &BTreeSet<String>,
) -> PriceBreakdown {
    let distance_km = usable(distance_km);
    let mut unit_rate = usable(unit_rate);

    let base_price = if distance_km == 0.0 || unit_rate == 0.0 {
        Money::ZERO
    } else {
        match Money::checked_round_to_units(distance_km * unit_rate) {
            Some(price) => price,
            // a rate that prices past Money::MAX is not a usable rate
            None => {
                unit_rate = 0.0;
                Money::ZERO
            }
        }
    };

    let extras_total = extras.total(selected_extra_ids);

    PriceBreakdown {
        distance_km,
        unit_rate,
        base_price,
        extras_total,
        grand_total: base_price + extras_total,
        commission: CommissionSplit::NotApplicable,
    }
}

/// Attaches the commission split for the breakdown's grand total.
pub fn with_commission(breakdown: PriceBreakdown, commission_percent: Option<f64>) -> PriceBreakdown {
    PriceBreakdown {
        commission: commission::split(breakdown.grand_total, commission_percent),
        ..breakdown
    }
}

fn usable(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ExtraServiceOffer, UnpricedCause};

    fn extras() -> ExtrasCatalog {
        ExtrasCatalog::new(vec![
            ExtraServiceOffer::new("fragile", "Fragile handling", Money::from_units(100), ""),
            ExtraServiceOffer::new("stairs", "Stairs", Money::from_units(50), ""),
        ])
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn istanbul_courier_scenario() {
        let breakdown = compute_price(12.4, 10.0, &extras(), &ids(&[]));

        assert_eq!(breakdown.base_price, Money::from_units(124));
        assert_eq!(breakdown.extras_total, Money::ZERO);
        assert_eq!(breakdown.grand_total, Money::from_units(124));
        assert!(breakdown.is_priced());
    }

    #[test]
    fn scenario_with_extras_and_commission() {
        let breakdown = compute_price(12.4, 10.0, &extras(), &ids(&["fragile", "stairs"]));
        assert_eq!(breakdown.extras_total, Money::from_units(150));
        assert_eq!(breakdown.grand_total, Money::from_units(274));

        let breakdown = with_commission(breakdown, Some(15.0));
        assert_eq!(breakdown.commission_amount(), Some(Money::from_units(41)));
        assert_eq!(breakdown.carrier_payout(), Some(Money::from_units(233)));
    }

    #[test]
    fn zero_inputs_give_zero_base_price() {
        let catalog = extras();
        let none = ids(&[]);

        let no_distance = compute_price(0.0, 10.0, &catalog, &none);
        assert_eq!(no_distance.base_price, Money::ZERO);
        assert_eq!(no_distance.unpriced_cause(), Some(UnpricedCause::Distance));

        let no_rate = compute_price(12.4, 0.0, &catalog, &none);
        assert_eq!(no_rate.base_price, Money::ZERO);
        assert_eq!(no_rate.unpriced_cause(), Some(UnpricedCause::Rate));

        let neither = compute_price(0.0, 0.0, &catalog, &none);
        assert_eq!(neither.unpriced_cause(), Some(UnpricedCause::Both));
    }

    #[test]
    fn non_finite_inputs_are_treated_as_zero() {
        let breakdown = compute_price(f64::NAN, 10.0, &extras(), &ids(&[]));
        assert_eq!(breakdown.distance_km, 0.0);
        assert_eq!(breakdown.base_price, Money::ZERO);
    }

    #[test]
    fn base_price_matches_rounded_product() {
        let catalog = extras();
        let none = ids(&[]);

        for distance_step in 0..60 {
            for rate_step in 0..40 {
                let distance_km = distance_step as f64 * 0.37;
                let unit_rate = rate_step as f64 * 1.25;
                let breakdown = compute_price(distance_km, unit_rate, &catalog, &none);

                let expected = (distance_km * unit_rate + 0.5).floor() as i64;
                assert_eq!(breakdown.base_price, Money::from_units(expected));
                assert!(breakdown.base_price.minor() >= 0);
                assert_eq!(
                    breakdown.grand_total,
                    breakdown.base_price + breakdown.extras_total
                );
            }
        }
    }

    #[test]
    fn extras_count_even_when_unpriced() {
        let breakdown = compute_price(0.0, 10.0, &extras(), &ids(&["fragile"]));

        assert_eq!(breakdown.base_price, Money::ZERO);
        assert_eq!(breakdown.grand_total, Money::from_units(100));
        assert!(!breakdown.is_priced());
    }

    #[test]
    fn out_of_range_rate_is_unpriced_not_negative() {
        let catalog = ExtrasCatalog::new(vec![
            ExtraServiceOffer::new("crane", "Crane", Money::from_decimal(1e300), ""),
            ExtraServiceOffer::new("barge", "Barge", Money::from_decimal(9e18), ""),
        ]);

        let breakdown = compute_price(1000.0, 1e15, &catalog, &ids(&["crane", "barge"]));

        assert_eq!(breakdown.base_price, Money::ZERO);
        assert_eq!(breakdown.unit_rate, 0.0);
        assert_eq!(breakdown.unpriced_cause(), Some(UnpricedCause::Rate));
        assert_eq!(breakdown.extras_total, Money::MAX + Money::MAX);
        assert!(breakdown.grand_total.is_positive());

        let split = with_commission(breakdown, Some(15.0));
        let payout = split.carrier_payout().unwrap();
        assert!(payout.minor() >= 0);
        assert_eq!(split.commission_amount().unwrap() + payout, split.grand_total);
    }
}
