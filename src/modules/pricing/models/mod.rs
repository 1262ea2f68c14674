pub mod breakdown;
pub mod discount;
pub mod line_item;
pub mod scope;

pub use breakdown::{PricingBreakdown, TotalSource};
pub use discount::{clamp_discount, parse_authoritative_total, parse_decimal, Discount, DiscountSpec};
pub use line_item::{LineItem, MAX_AMOUNT};
pub use scope::Scope;
