use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;
use crate::core::{Currency, Result};

/// A block of work within a statement of work. Scope order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl Scope {
    /// Validates every line item in the scope
    pub fn validate(&self) -> Result<()> {
        self.items.iter().try_for_each(LineItem::validate)
    }

    pub fn total_hours(&self) -> Decimal {
        self.items.iter().map(LineItem::billable_hours).sum()
    }

    /// Sum of line item costs for this scope
    pub fn subtotal(&self, currency: Currency) -> Decimal {
        self.items.iter().map(|item| item.cost(currency)).sum()
    }
}
