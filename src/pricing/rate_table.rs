use crate::entities::{RegionRate, VehicleSelection};

/// Which matching rule selected a rate row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateMatch<'a> {
    City(&'a RegionRate),
    State(&'a RegionRate),
    None,
}

impl<'a> RateMatch<'a> {
    pub fn row(&self) -> Option<&'a RegionRate> {
        match self {
            Self::City(row) | Self::State(row) => Some(row),
            Self::None => None,
        }
    }
}

/// Per-region rate rows, loaded once and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct RateTable {
    rows: Vec<RegionRate>,
}

impl RateTable {
    pub fn new(rows: Vec<RegionRate>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RegionRate] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Matching policy, first hit wins:
    /// 1. city and state both equal (trimmed, case-insensitive),
    /// 2. state alone, first row in load order,
    /// 3. nothing.
    ///
    /// A blank state never matches.
    pub fn lookup(&self, city_name: Option<&str>, state_name: Option<&str>) -> RateMatch<'_> {
        let state = match state_name.map(normalize).filter(|s| !s.is_empty()) {
            Some(state) => state,
            None => return RateMatch::None,
        };
        let city = city_name.map(normalize).filter(|c| !c.is_empty());

        if let Some(city) = city {
            let exact = self
                .rows
                .iter()
                .find(|row| normalize(&row.city_name) == city && normalize(&row.state_name) == state);
            if let Some(row) = exact {
                return RateMatch::City(row);
            }
        }

        match self
            .rows
            .iter()
            .find(|row| normalize(&row.state_name) == state)
        {
            Some(row) => RateMatch::State(row),
            None => RateMatch::None,
        }
    }

    /// Unit rate for the region and vehicle; `0` means unpriced.
    pub fn find_rate(
        &self,
        city_name: Option<&str>,
        state_name: Option<&str>,
        selection: &VehicleSelection,
    ) -> f64 {
        self.lookup(city_name, state_name)
            .row()
            .map(|row| row.unit_price_for(selection))
            .unwrap_or(0.0)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CarrierType, VehicleClass};

    fn row(id: &str, city: &str, state: &str, courier: f64) -> RegionRate {
        RegionRate {
            id: id.into(),
            city_name: city.into(),
            state_name: state.into(),
            unit_price_by_vehicle_class: [(VehicleClass::Courier, courier)].into_iter().collect(),
            ..Default::default()
        }
    }

    fn table() -> RateTable {
        RateTable::new(vec![
            row("state-first", "Kadıköy", "İstanbul", 8.0),
            row("exact", "İstanbul", "İstanbul", 10.0),
            row("other", "Çankaya", "Ankara", 7.0),
        ])
    }

    #[test]
    fn exact_city_match_beats_state_match() {
        let table = table();
        let courier = VehicleSelection::carrier(CarrierType::Courier);

        let matched = table.lookup(Some("İstanbul"), Some("İstanbul"));
        assert!(matches!(matched, RateMatch::City(row) if row.id == "exact"));
        assert_eq!(table.find_rate(Some("İstanbul"), Some("İstanbul"), &courier), 10.0);
    }

    #[test]
    fn matching_trims_and_ignores_case() {
        let table = table();
        let matched = table.lookup(Some("  çankaya "), Some("ANKARA"));
        assert!(matches!(matched, RateMatch::City(row) if row.id == "other"));
    }

    #[test]
    fn falls_back_to_first_state_row() {
        let table = table();
        let matched = table.lookup(Some("Üsküdar"), Some("İstanbul"));
        assert!(matches!(matched, RateMatch::State(row) if row.id == "state-first"));

        let matched = table.lookup(None, Some("İstanbul"));
        assert!(matches!(matched, RateMatch::State(row) if row.id == "state-first"));
    }

    #[test]
    fn unknown_region_is_unpriced() {
        let table = table();
        let courier = VehicleSelection::carrier(CarrierType::Courier);

        assert_eq!(table.lookup(Some("Konak"), Some("İzmir")), RateMatch::None);
        assert_eq!(table.find_rate(Some("Konak"), Some("İzmir"), &courier), 0.0);
        assert_eq!(table.lookup(Some("Kadıköy"), Some(" ")), RateMatch::None);
        assert_eq!(table.lookup(Some("Kadıköy"), None), RateMatch::None);
    }

    #[test]
    fn empty_table_is_unpriced() {
        let table = RateTable::default();
        let courier = VehicleSelection::carrier(CarrierType::Courier);

        assert!(table.is_empty());
        assert_eq!(table.find_rate(Some("Kadıköy"), Some("İstanbul"), &courier), 0.0);
    }
}
