use serde::{Deserialize, Serialize};

use crate::entities::Money;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraServiceOffer {
    pub id: String,
    pub label: String,
    pub price: Money,
    pub applicable_vehicle_tag: String,
}

impl ExtraServiceOffer {
    pub fn new(id: &str, label: &str, price: Money, applicable_vehicle_tag: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            price,
            applicable_vehicle_tag: applicable_vehicle_tag.into(),
        }
    }

    /// Offers without a tag apply to every vehicle.
    pub fn applies_to(&self, vehicle_tag: &str) -> bool {
        let tag = self.applicable_vehicle_tag.trim();
        tag.is_empty() || tag.eq_ignore_ascii_case(vehicle_tag)
    }
}
