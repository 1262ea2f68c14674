// A line item is one billable role on a scope. Its cost is either supplied
// pre-computed (`cost`) or derived from hours x unit cost; both shapes arrive
// from the proposal editor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result};

/// Upper bound for any single monetary or hour figure. Anything larger is
/// clamped so downstream arithmetic cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0); // 1e15

/// Represents a single billable entry in a scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Description of the work
    pub description: String,

    /// Role performing the work
    pub role: String,

    /// Billable hours
    #[serde(default)]
    pub hours: Decimal,

    /// Hourly rate
    #[serde(default, alias = "rate")]
    pub unit_cost: Option<Decimal>,

    /// Pre-computed line total, takes precedence over hours x unit cost
    #[serde(default)]
    pub cost: Option<Decimal>,
}

impl LineItem {
    /// Line item priced by the hour
    pub fn hourly(
        description: impl Into<String>,
        role: impl Into<String>,
        hours: Decimal,
        unit_cost: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            role: role.into(),
            hours,
            unit_cost: Some(unit_cost),
            cost: None,
        }
    }

    /// Line item with a pre-computed cost
    pub fn fixed(
        description: impl Into<String>,
        role: impl Into<String>,
        hours: Decimal,
        cost: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            role: role.into(),
            hours,
            unit_cost: None,
            cost: Some(cost),
        }
    }

    /// Structural check: an item must carry a cost or a rate to be priced.
    pub fn validate(&self) -> Result<()> {
        if self.cost.is_none() && self.unit_cost.is_none() {
            return Err(AppError::validation(format!(
                "Line item '{}' must have either a cost or a unit cost",
                self.description
            )));
        }

        Ok(())
    }

    /// Hours with out-of-range values recovered
    pub fn billable_hours(&self) -> Decimal {
        clamp_amount(self.hours, "hours")
    }

    /// Hourly rate shown in tables. For pre-computed items it is derived
    /// from cost / hours.
    pub fn rate(&self, currency: Currency) -> Decimal {
        match self.unit_cost {
            Some(rate) => currency.round(clamp_amount(rate, "unit cost")),
            None => {
                let hours = self.billable_hours();
                if hours.is_zero() {
                    Decimal::ZERO
                } else {
                    currency.round(self.cost(currency) / hours)
                }
            }
        }
    }

    /// Line total, rounded to the currency scale and never negative
    pub fn cost(&self, currency: Currency) -> Decimal {
        let raw = match (self.cost, self.unit_cost) {
            (Some(cost), _) => clamp_amount(cost, "cost"),
            (None, Some(rate)) => self
                .billable_hours()
                .checked_mul(clamp_amount(rate, "unit cost"))
                .map(|cost| cost.min(MAX_AMOUNT))
                .unwrap_or(MAX_AMOUNT),
            (None, None) => Decimal::ZERO,
        };

        currency.round(raw)
    }
}

/// Recovers a negative or oversized figure instead of rejecting the request.
fn clamp_amount(value: Decimal, field: &str) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        tracing::warn!(field, value = %value, "Negative line item value, using 0");
        return Decimal::ZERO;
    }

    if value > MAX_AMOUNT {
        tracing::warn!(field, value = %value, "Line item value out of range, capping");
        return MAX_AMOUNT;
    }

    value
}
