mod commission;
mod extra;
mod location;
mod money;
mod quote;
mod rate;

pub use commission::{CommissionRate, CommissionSplit};
pub use extra::ExtraServiceOffer;
pub use location::{normalize_address, GeoPoint, Region};
pub use money::{round_half_up, Money};
pub use quote::{
    Diagnostic, IssueKind, PriceBreakdown, Quote, QuoteRequest, Readiness, UnpricedCause,
};
pub use rate::{
    CarrierType, RegionRate, VehicleClass, VehicleProduct, VehicleSelection, VehicleTemplate,
};
