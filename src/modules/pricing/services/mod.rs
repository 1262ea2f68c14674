pub mod reconciler;

pub use reconciler::{validate_breakdown, PricingPolicy, PricingReconciler};
