//! Pure pricing core: rate matching, extras, base price and commission split.
//! Nothing in here performs I/O.

pub mod commission;
mod extras;
mod gate;
mod price;
mod rate_table;

pub use extras::ExtrasCatalog;
pub use gate::{assess, DeliveryType, PaymentMethod, PricingInputs, RateOutcome, SubmissionForm};
pub use price::{compute_price, with_commission};
pub use rate_table::{RateMatch, RateTable};
