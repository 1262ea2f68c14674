// Pricing module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Discount, DiscountSpec, LineItem, PricingBreakdown, Scope, TotalSource};
pub use services::{PricingPolicy, PricingReconciler};
