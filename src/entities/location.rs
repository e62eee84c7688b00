use serde::{Deserialize, Serialize};

const COUNTRY_MARKERS: [&str; 2] = ["türkiye", "turkey"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub state_name: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            ..Default::default()
        }
    }

    pub fn with_region(mut self, city_name: &str, state_name: &str) -> Self {
        self.city_name = Some(city_name.into());
        self.state_name = Some(state_name.into());
        self
    }

    pub fn is_routable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn city(&self) -> Option<&str> {
        non_blank(self.city_name.as_deref())
    }

    pub fn state(&self) -> Option<&str> {
        non_blank(self.state_name.as_deref())
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The region a shipment is priced in: drop-off names, each falling back to
/// the pickup's when the drop-off one is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub city_name: Option<String>,
    pub state_name: Option<String>,
}

impl Region {
    pub fn for_shipment(pickup: Option<&GeoPoint>, dropoff: Option<&GeoPoint>) -> Self {
        let city_name = dropoff
            .and_then(GeoPoint::city)
            .or_else(|| pickup.and_then(GeoPoint::city));
        let state_name = dropoff
            .and_then(GeoPoint::state)
            .or_else(|| pickup.and_then(GeoPoint::state));

        Self {
            city_name: city_name.map(Into::into),
            state_name: state_name.map(Into::into),
        }
    }

    pub fn is_known(&self) -> bool {
        self.state_name.is_some()
    }
}

/// Cuts a geocoded address right after the country name and tidies the
/// whitespace in front of commas.
pub fn normalize_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }

    let truncated = match find_country_marker(address) {
        Some(end) => &address[..end],
        None => address,
    };

    let mut out = String::with_capacity(truncated.len());
    for ch in truncated.chars() {
        if ch == ',' {
            while out.ends_with(char::is_whitespace) {
                out.pop();
            }
        }
        out.push(ch);
    }

    out.trim().to_string()
}

/// Byte offset just past the earliest case-insensitive country marker.
fn find_country_marker(address: &str) -> Option<usize> {
    for (start, _) in address.char_indices() {
        let rest = &address[start..];
        for marker in COUNTRY_MARKERS {
            if let Some(len) = prefix_len_ignore_case(rest, marker) {
                return Some(start + len);
            }
        }
    }

    None
}

fn prefix_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut wanted = needle.chars();
    let mut consumed = 0;

    for ch in haystack.chars() {
        for lower in ch.to_lowercase() {
            if wanted.next() != Some(lower) {
                return None;
            }
        }
        consumed += ch.len_utf8();

        if wanted.as_str().is_empty() {
            return Some(consumed);
        }
    }

    None
}
