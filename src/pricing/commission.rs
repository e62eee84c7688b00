use crate::entities::{CommissionSplit, Money};

/// Splits a grand total between platform commission and carrier payout.
///
/// The commission is rounded half-up to whole currency units and the payout
/// is derived by subtraction, so the two always add up to the total.
pub fn split(grand_total: Money, commission_percent: Option<f64>) -> CommissionSplit {
    let percent = match commission_percent {
        Some(percent) if percent.is_finite() && percent > 0.0 => percent,
        _ => return CommissionSplit::NotApplicable,
    };

    if !grand_total.is_positive() {
        return CommissionSplit::NotApplicable;
    }

    // rounding up past a fractional total must not leave a negative payout
    let commission_amount =
        Money::round_to_units(grand_total.as_decimal() * percent / 100.0).min(grand_total);
    let carrier_payout = grand_total - commission_amount;

    debug_assert_eq!(commission_amount + carrier_payout, grand_total);

    CommissionSplit::Applied {
        commission_amount,
        carrier_payout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fifteen_percent_of_274() {
        let result = split(Money::from_units(274), Some(15.0));

        assert_eq!(result.commission_amount(), Some(Money::from_units(41)));
        assert_eq!(result.carrier_payout(), Some(Money::from_units(233)));
    }

    #[test]
    fn missing_or_non_positive_percent_is_not_applicable() {
        let total = Money::from_units(274);

        assert_eq!(split(total, None), CommissionSplit::NotApplicable);
        assert_eq!(split(total, Some(0.0)), CommissionSplit::NotApplicable);
        assert_eq!(split(total, Some(-5.0)), CommissionSplit::NotApplicable);
        assert_eq!(split(total, Some(f64::NAN)), CommissionSplit::NotApplicable);
    }

    #[test]
    fn zero_total_is_not_applicable() {
        assert_eq!(split(Money::ZERO, Some(15.0)), CommissionSplit::NotApplicable);
    }

    #[test]
    fn commission_and_payout_always_sum_to_total() {
        let totals = [1, 3, 7, 99, 124, 274, 1001, 12_345, 999_999];
        let fractional = [Money::from_minor(27450), Money::from_minor(1), Money::from_minor(15099)];

        let all_totals = totals
            .iter()
            .map(|&units| Money::from_units(units))
            .chain(fractional.iter().cloned());

        for total in all_totals {
            for step in 1..=400 {
                let percent = step as f64 * 0.25;
                match split(total, Some(percent)) {
                    CommissionSplit::Applied {
                        commission_amount,
                        carrier_payout,
                    } => {
                        assert_eq!(
                            commission_amount + carrier_payout,
                            total,
                            "rounding drift at total {} percent {}",
                            total,
                            percent
                        );
                        assert!(commission_amount.minor() >= 0);
                        assert!(carrier_payout.minor() >= 0);
                    }
                    CommissionSplit::NotApplicable => panic!("expected a split for {}", total),
                }
            }
        }
    }

    #[test]
    fn full_commission_leaves_no_payout() {
        let result = split(Money::from_units(500), Some(100.0));
        assert_eq!(result.carrier_payout(), Some(Money::ZERO));
    }
}
