pub mod documents;
pub mod health;
pub mod pricing;
pub mod rendering;
