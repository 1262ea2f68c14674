// Property-based tests for pricing reconciliation
//
// For any line items, discount and authoritative total the reconciler must
// return figures where
//   subtotal - discount_amount == subtotal_after_discount
//   subtotal_after_discount + tax_amount == grand_total
//   0 <= discount_amount <= subtotal
// and nothing is negative.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use sowgen::pricing::services::validate_breakdown;
use sowgen::pricing::{DiscountSpec, LineItem, PricingPolicy, PricingReconciler, TotalSource};

fn item_strategy() -> impl Strategy<Value = LineItem> {
    prop_oneof![
        (0i64..500_000i64, 0i64..50_000i64).prop_map(|(hours, rate)| {
            LineItem::hourly(
                "Work",
                "Developer",
                Decimal::new(hours, 2),
                Decimal::new(rate, 2),
            )
        }),
        (0i64..1_000i64, -10_000i64..100_000_000i64).prop_map(|(hours, cost)| {
            LineItem::fixed("Work", "Producer", Decimal::from(hours), Decimal::new(cost, 2))
        }),
    ]
}

fn discount_strategy() -> impl Strategy<Value = DiscountSpec> {
    prop_oneof![
        Just(DiscountSpec::none()),
        (-10_000i64..20_000i64).prop_map(|cents| DiscountSpec::percent(Decimal::new(cents, 2))),
        (-10_000i64..100_000_000i64).prop_map(|cents| DiscountSpec::fixed(Decimal::new(cents, 2))),
        "[0-9a-df-z%. -]{0,6}".prop_map(|text| DiscountSpec::from_raw(Value::String(text))),
    ]
}

fn authoritative_strategy() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        (-100_000i64..10_000_000_000i64).prop_map(|cents| Some(Decimal::new(cents, 2))),
    ]
}

fn assert_invariants(breakdown: &sowgen::pricing::PricingBreakdown) -> Result<(), TestCaseError> {
    prop_assert_eq!(
        breakdown.subtotal() - breakdown.discount_amount(),
        breakdown.subtotal_after_discount()
    );
    prop_assert_eq!(
        breakdown.subtotal_after_discount() + breakdown.tax_amount(),
        breakdown.grand_total()
    );
    prop_assert!(breakdown.discount_amount() >= Decimal::ZERO);
    prop_assert!(breakdown.discount_amount() <= breakdown.subtotal());
    prop_assert!(breakdown.tax_amount() >= Decimal::ZERO);
    prop_assert!(breakdown.grand_total() >= Decimal::ZERO);
    prop_assert!(breakdown.is_consistent());
    Ok(())
}

proptest! {
    #[test]
    fn test_breakdown_is_always_consistent(
        items in prop::collection::vec(item_strategy(), 0..12),
        discount in discount_strategy(),
        authoritative in authoritative_strategy(),
    ) {
        let reconciler = PricingReconciler::default();
        let breakdown = reconciler.reconcile(&items, &discount, authoritative);

        assert_invariants(&breakdown)?;
    }

    #[test]
    fn test_bottom_up_discount_never_exceeds_max(
        items in prop::collection::vec(item_strategy(), 1..8),
        discount in discount_strategy(),
    ) {
        let reconciler = PricingReconciler::default();
        let breakdown = reconciler.reconcile(&items, &discount, None);

        prop_assert_eq!(breakdown.total_source(), TotalSource::BottomUp);
        prop_assert!(breakdown.discount_percent() >= Decimal::ZERO);
        prop_assert!(breakdown.discount_percent() <= dec!(50));
    }

    #[test]
    fn test_accepted_authoritative_total_is_kept(
        items in prop::collection::vec(item_strategy(), 1..8),
        authoritative in authoritative_strategy(),
    ) {
        let reconciler = PricingReconciler::default();
        let breakdown = reconciler.reconcile(&items, &DiscountSpec::none(), authoritative);

        match (authoritative, breakdown.total_source()) {
            (Some(total), TotalSource::Authoritative) => {
                prop_assert_eq!(breakdown.grand_total(), total.round_dp(2));
            }
            (Some(_), TotalSource::AuthoritativeRejected) => {
                let bottom_up = reconciler.reconcile(&items, &DiscountSpec::none(), None);
                prop_assert_eq!(breakdown.grand_total(), bottom_up.grand_total());
            }
            (None, source) => prop_assert_eq!(source, TotalSource::BottomUp),
            (Some(_), source) => prop_assert!(false, "unexpected source {:?}", source),
        }
    }

    #[test]
    fn test_reconcile_is_deterministic(
        items in prop::collection::vec(item_strategy(), 0..8),
        discount in discount_strategy(),
        authoritative in authoritative_strategy(),
    ) {
        let reconciler = PricingReconciler::default();
        let first = reconciler.reconcile(&items, &discount, authoritative);
        let second = reconciler.reconcile(&items, &discount, authoritative);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_validate_breakdown_is_idempotent(
        items in prop::collection::vec(item_strategy(), 0..8),
        discount in discount_strategy(),
    ) {
        let policy = PricingPolicy::default();
        let breakdown = PricingReconciler::new(policy).reconcile(&items, &discount, None);

        let once = validate_breakdown(&policy, breakdown);
        let twice = validate_breakdown(&policy, once);
        prop_assert_eq!(once, twice);
        prop_assert_eq!(once, breakdown);
    }

    #[test]
    fn test_other_tax_rates_keep_invariants(
        items in prop::collection::vec(item_strategy(), 1..6),
        tax_percent in 0u8..=100u8,
        discount in discount_strategy(),
    ) {
        let policy = PricingPolicy::new(
            Decimal::from(tax_percent),
            dec!(50),
            sowgen::core::Currency::NZD,
        )
        .unwrap();
        let breakdown = PricingReconciler::new(policy).reconcile(&items, &discount, None);

        assert_invariants(&breakdown)?;
    }
}
