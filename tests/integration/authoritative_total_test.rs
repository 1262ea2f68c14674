// Integration tests for caller-supplied (authoritative) totals
//
// A total consistent with the line items is honoured and the discount is
// back-computed from it. An inconsistent one is rejected and the document
// falls back to the bottom-up figures.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sowgen::documents::services::workbook_assembler::{SUBTOTAL_LABEL, TOTAL_LABEL};
use sowgen::documents::services::AUTHORITATIVE_DISCLAIMER;
use sowgen::documents::{DocumentService, DocumentTemplate, StructuredDocument};
use sowgen::pricing::{PricingReconciler, TotalSource};
use sowgen::rendering::{ArtifactStore, HtmlPassthroughRenderer, JsonWorkbookWriter};

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 14).unwrap()
}

fn service(root: &std::path::Path) -> DocumentService {
    DocumentService::new(
        PricingReconciler::default(),
        Arc::new(DocumentTemplate::default()),
        Arc::new(HtmlPassthroughRenderer),
        Arc::new(JsonWorkbookWriter),
        ArtifactStore::new(root),
    )
}

/// Two scopes whose line items sum to $1,000.00
fn document(discount: Value, authoritative_total: Value) -> StructuredDocument {
    serde_json::from_value(json!({
        "projectTitle": "Brand Refresh",
        "clientName": "Harbour Homes",
        "scopes": [
            {
                "id": 1,
                "title": "Strategy",
                "items": [
                    {"description": "Workshops", "role": "Strategist", "hours": 4, "unitCost": 150}
                ]
            },
            {
                "id": 2,
                "title": "Design",
                "items": [
                    {"description": "Concepts", "role": "Designer", "hours": 2, "rate": 125},
                    {"description": "Artwork", "role": "Designer", "hours": 1, "cost": 150}
                ]
            }
        ],
        "discount": discount,
        "authoritativeTotal": authoritative_total
    }))
    .unwrap()
}

#[test]
fn test_consistent_total_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let breakdown = service
        .price(&document(Value::Null, json!(1100)))
        .unwrap();

    assert_eq!(breakdown.subtotal(), dec!(1000));
    assert_eq!(breakdown.discount_amount(), dec!(0));
    assert_eq!(breakdown.subtotal_after_discount(), dec!(1000));
    assert_eq!(breakdown.tax_amount(), dec!(100));
    assert_eq!(breakdown.grand_total(), dec!(1100));
    assert_eq!(breakdown.total_source(), TotalSource::Authoritative);
}

#[test]
fn test_discount_is_back_computed_from_total() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let breakdown = service
        .price(&document(json!(25), json!("990")))
        .unwrap();

    assert_eq!(breakdown.subtotal(), dec!(1000));
    assert_eq!(breakdown.discount_amount(), dec!(100));
    assert_eq!(breakdown.discount_percent(), dec!(10));
    assert_eq!(breakdown.subtotal_after_discount(), dec!(900));
    assert_eq!(breakdown.tax_amount(), dec!(90));
    assert_eq!(breakdown.grand_total(), dec!(990));
    assert_eq!(breakdown.total_source(), TotalSource::Authoritative);
}

#[test]
fn test_implausible_total_falls_back_to_bottom_up() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let breakdown = service
        .price(&document(json!(10), json!(50)))
        .unwrap();

    assert_eq!(breakdown.subtotal(), dec!(1000));
    assert_eq!(breakdown.discount_amount(), dec!(100));
    assert_eq!(breakdown.subtotal_after_discount(), dec!(900));
    assert_eq!(breakdown.tax_amount(), dec!(90));
    assert_eq!(breakdown.grand_total(), dec!(990));
    assert_eq!(breakdown.total_source(), TotalSource::AuthoritativeRejected);
}

#[test]
fn test_total_above_line_items_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let breakdown = service
        .price(&document(Value::Null, json!(5000)))
        .unwrap();

    assert_eq!(breakdown.grand_total(), dec!(1100));
    assert_eq!(breakdown.total_source(), TotalSource::AuthoritativeRejected);
}

#[test]
fn test_negative_total_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    let breakdown = service
        .price(&document(Value::Null, json!(-1100)))
        .unwrap();

    assert_eq!(breakdown.grand_total(), dec!(1100));
    assert_eq!(breakdown.total_source(), TotalSource::AuthoritativeRejected);
}

#[test]
fn test_honoured_total_appears_in_both_outputs_with_disclaimer() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(Value::Null, json!(1100));

    let rendered = service
        .assemble_structured(&document, generated_on())
        .unwrap();
    assert!(rendered.html.contains("$1,100.00"));
    assert!(rendered.html.contains(AUTHORITATIVE_DISCLAIMER));

    let workbook = service.assemble_workbook(&document, generated_on()).unwrap();
    let pricing = workbook.sheet("Pricing").unwrap();
    assert_eq!(pricing.value_for(SUBTOTAL_LABEL), Some(dec!(1000)));
    assert_eq!(pricing.value_for(TOTAL_LABEL), Some(dec!(1100)));
    assert!(pricing
        .rows
        .iter()
        .any(|row| row.has_label(AUTHORITATIVE_DISCLAIMER)));
}

#[test]
fn test_rejected_total_has_no_disclaimer() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(Value::Null, json!(50));

    let rendered = service
        .assemble_structured(&document, generated_on())
        .unwrap();
    assert!(!rendered.html.contains(AUTHORITATIVE_DISCLAIMER));
    assert!(!rendered.html.contains("$50.00"));
    assert!(rendered.html.contains("$1,100.00"));

    let workbook = service.assemble_workbook(&document, generated_on()).unwrap();
    let pricing = workbook.sheet("Pricing").unwrap();
    assert_eq!(pricing.value_for(TOTAL_LABEL), Some(dec!(1100)));
    assert!(!pricing
        .rows
        .iter()
        .any(|row| row.has_label(AUTHORITATIVE_DISCLAIMER)));
}

#[test]
fn test_sub_cent_percentage_discount_is_labelled() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(Value::Null, json!("1099.99"));

    let breakdown = service.price(&document).unwrap();
    assert_eq!(breakdown.total_source(), TotalSource::Authoritative);
    assert_eq!(breakdown.discount_amount(), dec!(0.01));

    let rendered = service
        .assemble_structured(&document, generated_on())
        .unwrap();
    assert!(rendered.html.contains("Discount (0.001%)"));
    assert!(!rendered.html.contains("Discount (0%)"));
    assert!(rendered.html.contains("-$0.01"));
    assert!(rendered.html.contains("$1,099.99"));
}

#[test]
fn test_unparseable_total_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());

    for total in [json!("abc"), json!("$1,100"), json!("-990")] {
        let document = document(json!(10), total);
        assert_eq!(document.authoritative_total(), None);

        let breakdown = service.price(&document).unwrap();
        assert_eq!(breakdown.total_source(), TotalSource::BottomUp);
        assert_eq!(breakdown.grand_total(), dec!(990));
    }
}

#[test]
fn test_fixed_discount_prices_both_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(json!({"type": "fixed", "value": 150}), Value::Null);

    let breakdown = service.price(&document).unwrap();
    assert_eq!(breakdown.discount_amount(), dec!(150));
    assert_eq!(breakdown.discount_percent(), dec!(15));
    assert_eq!(breakdown.grand_total(), dec!(935));

    let rendered = service
        .assemble_structured(&document, generated_on())
        .unwrap();
    assert!(rendered.html.contains("Discount (15%)"));
    assert!(rendered.html.contains("-$150.00"));

    let workbook = service.assemble_workbook(&document, generated_on()).unwrap();
    let pricing = workbook.sheet("Pricing").unwrap();
    assert_eq!(pricing.value_for(TOTAL_LABEL), Some(dec!(935)));
}

#[test]
fn test_reconciler_is_independent_of_scope_grouping() {
    let document = document(json!(10), Value::Null);
    let reconciler = PricingReconciler::default();

    let by_scope = reconciler.reconcile_scopes(&document.scopes, &document.discount, None);
    let flat: Vec<_> = document
        .scopes
        .iter()
        .flat_map(|scope| scope.items.clone())
        .collect();
    let flattened = reconciler.reconcile(&flat, &document.discount, None);

    assert_eq!(by_scope, flattened);
    assert_eq!(by_scope.grand_total(), dec!(990));
    assert_eq!(by_scope.tax_amount() / by_scope.subtotal_after_discount(), Decimal::new(1, 1));
}
