//! Statement-of-Work document service library
//!
//! Reconciles proposal pricing into one consistent breakdown and assembles it,
//! together with free-form or structured scope content, into documents for
//! PDF and spreadsheet renderers.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::documents;
pub use modules::pricing;
pub use modules::rendering;
