use rust_decimal::Decimal;
use serde::Serialize;

/// Where the grand total of a breakdown came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Summed from line items
    BottomUp,
    /// Caller-supplied total, consistent with the line items
    Authoritative,
    /// Caller-supplied total was inconsistent and replaced by the bottom-up figure
    AuthoritativeRejected,
}

impl TotalSource {
    pub fn is_authoritative(&self) -> bool {
        matches!(self, TotalSource::Authoritative)
    }
}

/// Reconciled financial figures for one document.
///
/// Only the reconciler builds these, so every instance satisfies
/// `subtotal - discount_amount == subtotal_after_discount` and
/// `subtotal_after_discount + tax_amount == grand_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    subtotal: Decimal,
    discount_percent: Decimal,
    discount_amount: Decimal,
    subtotal_after_discount: Decimal,
    tax_amount: Decimal,
    grand_total: Decimal,
    total_source: TotalSource,
}

impl PricingBreakdown {
    pub(crate) fn new(
        subtotal: Decimal,
        discount_percent: Decimal,
        discount_amount: Decimal,
        subtotal_after_discount: Decimal,
        tax_amount: Decimal,
        grand_total: Decimal,
        total_source: TotalSource,
    ) -> Self {
        Self {
            subtotal,
            discount_percent,
            discount_amount,
            subtotal_after_discount,
            tax_amount,
            grand_total,
            total_source,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount_amount
    }

    pub fn subtotal_after_discount(&self) -> Decimal {
        self.subtotal_after_discount
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    pub fn total_source(&self) -> TotalSource {
        self.total_source
    }

    pub fn has_discount(&self) -> bool {
        !self.discount_amount.is_zero()
    }

    /// True when every figure is non-negative, the discount fits inside the
    /// subtotal and both arithmetic identities hold.
    pub fn is_consistent(&self) -> bool {
        let figures = [
            self.subtotal,
            self.discount_percent,
            self.discount_amount,
            self.subtotal_after_discount,
            self.tax_amount,
            self.grand_total,
        ];

        figures.iter().all(|figure| !figure.is_sign_negative() || figure.is_zero())
            && self.discount_amount <= self.subtotal
            && self.subtotal - self.discount_amount == self.subtotal_after_discount
            && self.subtotal_after_discount + self.tax_amount == self.grand_total
    }
}
