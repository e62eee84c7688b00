use std::collections::{BTreeSet, HashMap};

use crate::entities::{ExtraServiceOffer, Money, VehicleSelection};

/// Optional flat-priced add-on services, keyed by offer id.
#[derive(Clone, Debug, Default)]
pub struct ExtrasCatalog {
    offers: Vec<ExtraServiceOffer>,
    index: HashMap<String, usize>,
}

impl ExtrasCatalog {
    pub fn new(offers: Vec<ExtraServiceOffer>) -> Self {
        let mut index = HashMap::with_capacity(offers.len());
        for (position, offer) in offers.iter().enumerate() {
            // first occurrence of an id wins
            index.entry(offer.id.clone()).or_insert(position);
        }

        Self { offers, index }
    }

    pub fn offers(&self) -> &[ExtraServiceOffer] {
        &self.offers
    }

    pub fn get(&self, id: &str) -> Option<&ExtraServiceOffer> {
        self.index.get(id).map(|&position| &self.offers[position])
    }

    pub fn for_vehicle(&self, selection: &VehicleSelection) -> Vec<&ExtraServiceOffer> {
        let tags = selection.vehicle_tags();
        self.offers
            .iter()
            .filter(|offer| tags.iter().any(|tag| offer.applies_to(tag)))
            .collect()
    }

    /// Offers for the selected ids, in selection order. Unknown ids are skipped.
    pub fn selected<'a>(&'a self, ids: &'a BTreeSet<String>) -> impl Iterator<Item = &'a ExtraServiceOffer> {
        ids.iter().filter_map(move |id| self.get(id))
    }

    pub fn total(&self, ids: &BTreeSet<String>) -> Money {
        self.selected(ids).map(|offer| offer.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CarrierType;

    fn catalog() -> ExtrasCatalog {
        ExtrasCatalog::new(vec![
            ExtraServiceOffer::new("fragile", "Kırılabilir eşya", Money::from_units(100), "courier"),
            ExtraServiceOffer::new("stairs", "Kat taşıma", Money::from_units(50), ""),
            ExtraServiceOffer::new("crane", "Vinç", Money::from_units(900), "truck"),
        ])
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn total_sums_selected_offers() {
        let catalog = catalog();
        assert_eq!(catalog.total(&ids(&["fragile", "stairs"])), Money::from_units(150));
        assert_eq!(catalog.total(&ids(&[])), Money::ZERO);
    }

    #[test]
    fn total_ignores_order_and_repeats() {
        let catalog = catalog();
        let forward: BTreeSet<String> = vec!["stairs".to_string(), "fragile".to_string()]
            .into_iter()
            .collect();
        let repeated: BTreeSet<String> = vec!["fragile", "stairs", "fragile", "stairs"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(catalog.total(&forward), catalog.total(&repeated));
    }

    #[test]
    fn unknown_ids_contribute_nothing() {
        let catalog = catalog();
        assert_eq!(catalog.total(&ids(&["crane", "teleport"])), Money::from_units(900));
    }

    #[test]
    fn filters_offers_by_vehicle() {
        let catalog = catalog();
        let courier = VehicleSelection::carrier(CarrierType::Courier);
        let labels: Vec<&str> = catalog
            .for_vehicle(&courier)
            .into_iter()
            .map(|offer| offer.id.as_str())
            .collect();

        assert_eq!(labels, vec!["fragile", "stairs"]);
    }
}
