use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Courier,
    Minivan,
    Panelvan,
    Kamyonet,
    Kamyon,
}

impl VehicleClass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Courier => "courier",
            Self::Minivan => "minivan",
            Self::Panelvan => "panelvan",
            Self::Kamyonet => "kamyonet",
            Self::Kamyon => "kamyon",
        }
    }
}

/// Coarse transport category picked by the shipper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierType {
    #[default]
    Courier,
    Minivan,
    Panelvan,
    Truck,
}

impl CarrierType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Courier => "courier",
            Self::Minivan => "minivan",
            Self::Panelvan => "panelvan",
            Self::Truck => "truck",
        }
    }
}

/// Fine-grained vehicle class tied to a vehicle product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTemplate {
    Motorcycle,
    Minivan,
    Panelvan,
    Kamyonet,
    Kamyon,
}

impl VehicleTemplate {
    /// Unknown templates yield `None` so pricing falls back to the carrier type.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "motorcycle" => Some(Self::Motorcycle),
            "minivan" => Some(Self::Minivan),
            "panelvan" => Some(Self::Panelvan),
            "kamyonet" => Some(Self::Kamyonet),
            "kamyon" => Some(Self::Kamyon),
            _ => None,
        }
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        match self {
            Self::Motorcycle => VehicleClass::Courier,
            Self::Minivan => VehicleClass::Minivan,
            Self::Panelvan => VehicleClass::Panelvan,
            Self::Kamyonet => VehicleClass::Kamyonet,
            Self::Kamyon => VehicleClass::Kamyon,
        }
    }
}

/// An active vehicle product from the dealer catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProduct {
    pub id: String,
    pub name: String,
    pub code: String,
    /// Pricing template, e.g. `kamyonet`.
    pub template: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSelection {
    pub carrier_type: CarrierType,
    /// Raw product template as sent by the caller.
    #[serde(default)]
    pub vehicle_template: Option<String>,
    /// Catalog product whose template overrides `vehicle_template`.
    #[serde(default)]
    pub vehicle_product_id: Option<String>,
}

impl VehicleSelection {
    pub fn carrier(carrier_type: CarrierType) -> Self {
        Self {
            carrier_type,
            ..Default::default()
        }
    }

    pub fn template(template: &str, carrier_type: CarrierType) -> Self {
        Self {
            carrier_type,
            vehicle_template: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn product(product_id: &str, carrier_type: CarrierType) -> Self {
        Self {
            carrier_type,
            vehicle_product_id: Some(product_id.into()),
            ..Default::default()
        }
    }

    /// Replaces the template with the selected product's, when the product is
    /// in the catalog and has one. Otherwise the selection is kept as sent.
    pub fn resolve_product(&self, products: &[VehicleProduct]) -> VehicleSelection {
        let template = self
            .vehicle_product_id
            .as_deref()
            .and_then(|id| products.iter().find(|product| product.id == id))
            .map(|product| product.template.trim())
            .filter(|template| !template.is_empty());

        match template {
            Some(template) => VehicleSelection {
                vehicle_template: Some(template.to_string()),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    pub fn parsed_template(&self) -> Option<VehicleTemplate> {
        self.vehicle_template
            .as_deref()
            .and_then(VehicleTemplate::parse)
    }

    /// Tags an extra service may be offered under for this vehicle: the
    /// template's class, if any, and the carrier type.
    pub fn vehicle_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::with_capacity(2);
        if let Some(template) = self.parsed_template() {
            tags.push(template.vehicle_class().name());
        }
        if !tags.contains(&self.carrier_type.name()) {
            tags.push(self.carrier_type.name());
        }
        tags
    }
}

/// Per-region unit prices (currency per kilometer) by vehicle class.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRate {
    pub id: String,
    pub route_label: String,
    pub country_id: i64,
    pub state_id: i64,
    pub city_id: i64,
    pub state_name: String,
    pub city_name: String,
    pub unit_price_by_vehicle_class: HashMap<VehicleClass, f64>,
}

impl RegionRate {
    /// Unit price for a class; absent, negative or non-finite columns read as
    /// `0`, which means unpriced.
    pub fn unit_price(&self, class: VehicleClass) -> f64 {
        match self.unit_price_by_vehicle_class.get(&class) {
            Some(price) if price.is_finite() && *price > 0.0 => *price,
            _ => 0.0,
        }
    }

    /// Resolves the unit price for a vehicle selection. An explicit template
    /// wins; otherwise the carrier type is used, where a truck prefers the
    /// `kamyonet` column and falls back to `kamyon`.
    pub fn unit_price_for(&self, selection: &VehicleSelection) -> f64 {
        if let Some(template) = selection.parsed_template() {
            return self.unit_price(template.vehicle_class());
        }

        match selection.carrier_type {
            CarrierType::Courier => self.unit_price(VehicleClass::Courier),
            CarrierType::Minivan => self.unit_price(VehicleClass::Minivan),
            CarrierType::Panelvan => self.unit_price(VehicleClass::Panelvan),
            CarrierType::Truck => {
                let kamyonet = self.unit_price(VehicleClass::Kamyonet);
                if kamyonet > 0.0 {
                    kamyonet
                } else {
                    self.unit_price(VehicleClass::Kamyon)
                }
            }
        }
    }
}
