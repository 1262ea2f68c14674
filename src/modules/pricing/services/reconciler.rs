use rust_decimal::Decimal;

use crate::core::{AppError, Currency, Result};
use crate::modules::pricing::models::{
    DiscountSpec, LineItem, PricingBreakdown, Scope, TotalSource, MAX_AMOUNT,
};

/// Tax and discount rules applied by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// GST rate in percent, e.g. 10
    pub tax_rate_percent: Decimal,
    /// Largest discount ever applied, in percent
    pub max_discount_percent: Decimal,
    pub currency: Currency,
}

impl PricingPolicy {
    pub fn new(
        tax_rate_percent: Decimal,
        max_discount_percent: Decimal,
        currency: Currency,
    ) -> Result<Self> {
        if tax_rate_percent.is_sign_negative() || tax_rate_percent > Decimal::ONE_HUNDRED {
            return Err(AppError::Configuration(format!(
                "Tax rate must be between 0 and 100 percent, got {}",
                tax_rate_percent
            )));
        }

        if max_discount_percent <= Decimal::ZERO || max_discount_percent >= Decimal::ONE_HUNDRED {
            return Err(AppError::Configuration(format!(
                "Maximum discount must be above 0 and below 100 percent, got {}",
                max_discount_percent
            )));
        }

        Ok(Self {
            tax_rate_percent,
            max_discount_percent,
            currency,
        })
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_percent: Decimal::TEN,
            max_discount_percent: Decimal::from(50),
            currency: Currency::AUD,
        }
    }
}

/// Derives one consistent set of figures from line items, a discount and an
/// optional caller-supplied grand total.
///
/// Pure: no I/O, no shared state. Every path ends in [`validate_breakdown`],
/// so whatever the inputs the result is consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingReconciler {
    policy: PricingPolicy,
}

impl PricingReconciler {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Sum of line item costs in encountered order
    pub fn subtotal<'a>(&self, items: impl IntoIterator<Item = &'a LineItem>) -> Decimal {
        items
            .into_iter()
            .map(|item| item.cost(self.policy.currency))
            .sum()
    }

    /// Reconciles every item across `scopes`
    pub fn reconcile_scopes(
        &self,
        scopes: &[Scope],
        discount: &DiscountSpec,
        authoritative_total: Option<Decimal>,
    ) -> PricingBreakdown {
        self.reconcile(
            scopes.iter().flat_map(|scope| scope.items.iter()),
            discount,
            authoritative_total,
        )
    }

    pub fn reconcile<'a>(
        &self,
        items: impl IntoIterator<Item = &'a LineItem>,
        discount: &DiscountSpec,
        authoritative_total: Option<Decimal>,
    ) -> PricingBreakdown {
        let subtotal = self.subtotal(items);

        let Some(total) = authoritative_total else {
            return self.bottom_up(subtotal, discount, TotalSource::BottomUp);
        };

        match self.from_authoritative(subtotal, total) {
            Some(breakdown) => {
                tracing::debug!(
                    authoritative_total = %total,
                    subtotal = %subtotal,
                    implied_discount = %breakdown.discount_amount(),
                    "Using authoritative total"
                );
                breakdown
            }
            None => {
                tracing::warn!(
                    authoritative_total = %total,
                    subtotal = %subtotal,
                    "Authoritative total inconsistent with line items, using calculated totals"
                );
                self.bottom_up(subtotal, discount, TotalSource::AuthoritativeRejected)
            }
        }
    }

    fn bottom_up(
        &self,
        subtotal: Decimal,
        discount: &DiscountSpec,
        source: TotalSource,
    ) -> PricingBreakdown {
        let percent = discount.validated_percent(subtotal, self.policy.max_discount_percent);
        let breakdown = compute(&self.policy, subtotal, percent, source);
        validate_breakdown(&self.policy, breakdown)
    }

    /// Back-computes the figures from a tax-inclusive total. `None` when the
    /// total cannot be explained by a permitted discount on the subtotal.
    fn from_authoritative(&self, subtotal: Decimal, total: Decimal) -> Option<PricingBreakdown> {
        let currency = self.policy.currency;
        if total.is_sign_negative() || total > MAX_AMOUNT {
            return None;
        }

        let total = currency.round(total);
        let subtotal_after_discount = currency.round(
            total * Decimal::ONE_HUNDRED / (Decimal::ONE_HUNDRED + self.policy.tax_rate_percent),
        );
        let tax_amount = total - subtotal_after_discount;
        let discount_amount = subtotal - subtotal_after_discount;

        if discount_amount.is_sign_negative() && !discount_amount.is_zero() {
            return None;
        }
        if discount_amount > subtotal {
            return None;
        }

        let implied_percent = if subtotal.is_zero() {
            Decimal::ZERO
        } else {
            discount_amount * Decimal::ONE_HUNDRED / subtotal
        };
        if implied_percent > self.policy.max_discount_percent {
            return None;
        }
        let discount_percent = display_percent(implied_percent);

        let breakdown = PricingBreakdown::new(
            subtotal,
            discount_percent,
            discount_amount,
            subtotal_after_discount,
            tax_amount,
            total,
            TotalSource::Authoritative,
        );

        breakdown.is_consistent().then_some(breakdown)
    }
}

/// Steps 3 to 6 of the bottom-up calculation for an already clamped percent.
fn compute(
    policy: &PricingPolicy,
    subtotal: Decimal,
    percent: Decimal,
    source: TotalSource,
) -> PricingBreakdown {
    let currency = policy.currency;
    let mut percent = percent;
    let mut discount_amount = currency.round(subtotal * percent / Decimal::ONE_HUNDRED);

    if discount_amount > subtotal || discount_amount.is_sign_negative() {
        tracing::warn!(
            discount_amount = %discount_amount,
            subtotal = %subtotal,
            "Discount amount outside subtotal, removing discount"
        );
        discount_amount = Decimal::ZERO;
        percent = Decimal::ZERO;
    }

    let mut subtotal_after_discount = subtotal - discount_amount;
    if subtotal_after_discount.is_sign_negative() && !subtotal_after_discount.is_zero() {
        tracing::warn!("Negative subtotal after discount, removing discount");
        discount_amount = Decimal::ZERO;
        percent = Decimal::ZERO;
        subtotal_after_discount = subtotal;
    }

    let tax_amount =
        currency.round(subtotal_after_discount * policy.tax_rate_percent / Decimal::ONE_HUNDRED);
    let grand_total = subtotal_after_discount + tax_amount;

    PricingBreakdown::new(
        subtotal,
        display_percent(percent),
        discount_amount,
        subtotal_after_discount,
        tax_amount,
        grand_total,
        source,
    )
}

/// Percentage as shown on documents: 2 dp, or two significant digits when a
/// non-zero percentage would otherwise show as 0.
fn display_percent(percent: Decimal) -> Decimal {
    let rounded = percent.round_dp(2);
    if rounded.is_zero() && !percent.is_zero() {
        percent.round_sf(2).unwrap_or(percent).normalize()
    } else {
        rounded
    }
}

/// Returns `breakdown` unchanged when it is consistent, otherwise the same
/// subtotal recomputed with no discount. Idempotent.
pub fn validate_breakdown(policy: &PricingPolicy, breakdown: PricingBreakdown) -> PricingBreakdown {
    if breakdown.is_consistent() {
        return breakdown;
    }

    tracing::warn!(
        subtotal = %breakdown.subtotal(),
        discount_amount = %breakdown.discount_amount(),
        grand_total = %breakdown.grand_total(),
        "Inconsistent pricing figures, resetting to no discount"
    );

    let subtotal = breakdown.subtotal().max(Decimal::ZERO);
    compute(policy, subtotal, Decimal::ZERO, breakdown.total_source())
}
