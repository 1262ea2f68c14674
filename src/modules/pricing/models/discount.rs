// Discounts arrive untyped from the proposal editor: a JSON number, a numeric
// string ("12.5", "15%"), a `{ "type": "percentage" | "fixed", "value": .. }`
// object, null, or garbage. None of these fail the request; anything unusable
// becomes a 0% discount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::line_item::MAX_AMOUNT;

/// A parsed discount, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discount {
    /// Percentage of the subtotal
    Percentage(Decimal),
    /// Currency amount taken off the subtotal
    Fixed(Decimal),
}

impl Discount {
    /// Percentage of `subtotal` this discount represents, unclamped. A fixed
    /// amount on an empty subtotal is 0%.
    pub fn percent_of(&self, subtotal: Decimal) -> Decimal {
        match *self {
            Discount::Percentage(percent) => percent,
            Discount::Fixed(_) if subtotal.is_zero() => Decimal::ZERO,
            Discount::Fixed(amount) => amount
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|scaled| scaled.checked_div(subtotal))
                .unwrap_or(Decimal::ONE_HUNDRED),
        }
    }
}

/// Raw, untrusted discount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountSpec {
    raw: Value,
}

impl DiscountSpec {
    pub fn from_raw(raw: Value) -> Self {
        Self { raw }
    }

    /// No discount
    pub fn none() -> Self {
        Self::default()
    }

    pub fn percent(percent: Decimal) -> Self {
        Self {
            raw: Value::String(percent.to_string()),
        }
    }

    /// Fixed currency amount
    pub fn fixed(amount: Decimal) -> Self {
        Self {
            raw: serde_json::json!({ "type": "fixed", "value": amount.to_string() }),
        }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Parses the raw value. `None` when missing or malformed.
    pub fn parse(&self) -> Option<Discount> {
        parse_value(&self.raw)
    }

    /// Parsed discount as a percentage of `subtotal`, clamped into
    /// `[0, max_percent]`. Fixed amounts are converted before clamping.
    pub fn validated_percent(&self, subtotal: Decimal, max_percent: Decimal) -> Decimal {
        let parsed = match self.parse() {
            Some(discount) => discount.percent_of(subtotal),
            None => {
                if !self.raw.is_null() {
                    tracing::warn!(raw = %self.raw, "Invalid discount format, using 0%");
                }
                Decimal::ZERO
            }
        };

        let clamped = clamp_discount(parsed, max_percent);
        if clamped != parsed {
            tracing::warn!(
                requested = %parsed,
                applied = %clamped,
                "Discount out of range, adjusted"
            );
        }

        clamped
    }
}

impl From<Decimal> for DiscountSpec {
    fn from(percent: Decimal) -> Self {
        Self::percent(percent)
    }
}

/// Clamps a discount percentage into `[0, max_percent]`.
///
/// - below 0 becomes 0
/// - 100 or more is rejected to 0 (a discount eating the whole subtotal is
///   never applied)
/// - above `max_percent` is capped at `max_percent`
///
/// Idempotent: `clamp_discount(clamp_discount(p, m), m) == clamp_discount(p, m)`.
pub fn clamp_discount(percent: Decimal, max_percent: Decimal) -> Decimal {
    if percent.is_sign_negative() || percent >= Decimal::ONE_HUNDRED {
        Decimal::ZERO
    } else if percent > max_percent {
        max_percent
    } else {
        percent
    }
}

fn parse_value(raw: &Value) -> Option<Discount> {
    match raw {
        Value::Object(map) => {
            let value = map.get("value").and_then(parse_number)?;
            match map.get("type").and_then(Value::as_str) {
                None => Some(Discount::Percentage(value)),
                Some(kind) if kind.eq_ignore_ascii_case("percentage") => {
                    Some(Discount::Percentage(value))
                }
                Some(kind) if kind.eq_ignore_ascii_case("fixed") => Some(Discount::Fixed(value)),
                Some(_) => None,
            }
        }
        other => parse_number(other).map(Discount::Percentage),
    }
}

fn parse_number(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim().trim_end_matches('%').trim_end()),
        _ => None,
    }
}

/// Locale-agnostic decimal parsing: plain (`1100.50`) or scientific (`1.1e3`).
/// Thousands separators are not accepted.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Lenient parse of a caller-supplied, tax-inclusive total: a JSON number or
/// plain decimal text with an optional leading `$`. Missing, unparseable,
/// negative or oversized values count as absent and are logged.
pub fn parse_authoritative_total(raw: &Value) -> Option<Decimal> {
    let parsed = match raw {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => {
            let text = text.trim();
            parse_decimal(text.strip_prefix('$').unwrap_or(text))
        }
        _ => None,
    };

    let Some(total) = parsed else {
        tracing::warn!(raw = %raw, "Unparseable authoritative total, ignoring");
        return None;
    };

    if (total.is_sign_negative() && !total.is_zero()) || total > MAX_AMOUNT {
        tracing::warn!(total = %total, "Authoritative total out of range, ignoring");
        return None;
    }

    Some(total)
}
