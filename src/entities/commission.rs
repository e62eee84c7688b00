use serde::{Deserialize, Serialize};

use crate::entities::Money;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRate {
    pub percent: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl CommissionRate {
    pub fn new(percent: f64) -> Self {
        Self {
            percent,
            description: None,
        }
    }

    /// A zero, negative or non-finite percent means no commission is configured.
    pub fn is_configured(&self) -> bool {
        self.percent.is_finite() && self.percent > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommissionSplit {
    NotApplicable,
    #[serde(rename_all = "camelCase")]
    Applied {
        commission_amount: Money,
        carrier_payout: Money,
    },
}

impl CommissionSplit {
    pub fn commission_amount(&self) -> Option<Money> {
        match self {
            Self::Applied {
                commission_amount, ..
            } => Some(*commission_amount),
            Self::NotApplicable => None,
        }
    }

    pub fn carrier_payout(&self) -> Option<Money> {
        match self {
            Self::Applied { carrier_payout, .. } => Some(*carrier_payout),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
