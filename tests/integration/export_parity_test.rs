// Integration tests for PDF / spreadsheet parity
//
// The PDF and the spreadsheet export of the same structured document are
// priced by one reconciliation, so every figure they show must match.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sowgen::core::Currency;
use sowgen::documents::services::workbook_assembler::{
    AFTER_DISCOUNT_LABEL, SUBTOTAL_LABEL, TOTAL_LABEL,
};
use sowgen::documents::{DocumentService, DocumentTemplate, StructuredDocument};
use sowgen::pricing::{DiscountSpec, LineItem, PricingReconciler, Scope};
use sowgen::rendering::{ArtifactStore, HtmlPassthroughRenderer, JsonWorkbookWriter};

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
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

fn document(scopes: Vec<Scope>, discount: DiscountSpec) -> StructuredDocument {
    StructuredDocument {
        project_title: "Retail Launch".to_string(),
        scopes,
        discount,
        client_name: Some("Northwind".to_string()),
        company: None,
        budget_notes: None,
        authoritative_total: None,
    }
}

fn scope(id: i64, title: &str, items: Vec<LineItem>) -> Scope {
    Scope {
        id,
        title: title.to_string(),
        description: String::new(),
        items,
        deliverables: vec![format!("{} handover", title)],
        assumptions: Vec::new(),
    }
}

/// Asserts every breakdown figure is shown identically in both outputs
fn assert_parity(service: &DocumentService, document: &StructuredDocument) {
    let currency = Currency::AUD;
    let breakdown = service.price(document).unwrap();
    let html = service
        .assemble_structured(document, generated_on())
        .unwrap()
        .html;
    let workbook = service.assemble_workbook(document, generated_on()).unwrap();
    let pricing = workbook.sheet("Pricing").unwrap();

    assert_eq!(pricing.value_for(SUBTOTAL_LABEL), Some(breakdown.subtotal()));
    assert_eq!(
        pricing.value_for(AFTER_DISCOUNT_LABEL),
        Some(breakdown.subtotal_after_discount())
    );
    assert_eq!(pricing.value_for(TOTAL_LABEL), Some(breakdown.grand_total()));

    for figure in [
        breakdown.subtotal(),
        breakdown.tax_amount(),
        breakdown.grand_total(),
    ] {
        assert!(
            html.contains(&currency.format_amount(figure)),
            "PDF is missing {}",
            currency.format_amount(figure)
        );
    }
    if breakdown.has_discount() {
        assert!(html.contains(&currency.format_amount(breakdown.discount_amount())));
        assert!(html.contains(&currency.format_amount(breakdown.subtotal_after_discount())));
    }
}

#[test]
fn test_discounted_document_matches() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(
        vec![
            scope(
                1,
                "Discovery",
                vec![
                    LineItem::hourly("Research", "Strategist", dec!(7.5), dec!(180)),
                    LineItem::hourly("Workshops", "Account Director", dec!(3), dec!(210)),
                ],
            ),
            scope(
                2,
                "Build",
                vec![LineItem::fixed("Landing page", "Developer", dec!(20), dec!(3333.33))],
            ),
        ],
        DiscountSpec::from_raw(json!("12.5%")),
    );

    assert_parity(&service, &document);

    let breakdown = service.price(&document).unwrap();
    assert_eq!(breakdown.subtotal(), dec!(5313.33));
    assert_eq!(breakdown.discount_amount(), dec!(664.17));
    assert_eq!(breakdown.subtotal_after_discount(), dec!(4649.16));
    assert_eq!(breakdown.tax_amount(), dec!(464.92));
    assert_eq!(breakdown.grand_total(), dec!(5114.08));
}

#[test]
fn test_undiscounted_document_matches() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(
        vec![scope(
            1,
            "Content",
            vec![LineItem::hourly("Copywriting", "Writer", dec!(12), dec!(95))],
        )],
        DiscountSpec::none(),
    );

    assert_parity(&service, &document);

    let workbook = service.assemble_workbook(&document, generated_on()).unwrap();
    let pricing = workbook.sheet("Pricing").unwrap();
    assert_eq!(pricing.value_for("Total Hours"), Some(dec!(12)));
    assert!(workbook.sheet("Deliverables").is_some());
    assert!(workbook.sheet("Assumptions").is_none());
}

#[tokio::test]
async fn test_generated_files_carry_the_same_total() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path());
    let document = document(
        vec![scope(
            1,
            "Paid Social",
            vec![
                LineItem::hourly("Campaign setup", "Specialist", dec!(10), dec!(160)),
                LineItem::fixed("Reporting", "Analyst", dec!(4), dec!(400)),
            ],
        )],
        DiscountSpec::percent(dec!(10)),
    );
    let breakdown = service.price(&document).unwrap();
    assert_eq!(breakdown.grand_total(), dec!(1980));

    let pdf = service
        .generate_structured(&document, generated_on())
        .await
        .unwrap();
    let sheet = service
        .export_workbook(&document, generated_on())
        .await
        .unwrap();

    assert_eq!(pdf.download_name, "Retail-Launch-Professional.html");
    assert_eq!(sheet.download_name, "Retail-Launch-Professional.json");

    let html = String::from_utf8(pdf.bytes).unwrap();
    assert!(html.contains("$1,980.00"));

    let workbook: Value = serde_json::from_slice(&sheet.bytes).unwrap();
    let pricing = workbook["sheets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|sheet| sheet["name"] == "Pricing")
        .unwrap();
    let total_row = pricing["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| {
            row["cells"]
                .as_array()
                .unwrap()
                .iter()
                .any(|cell| cell["value"] == TOTAL_LABEL)
        })
        .unwrap();
    let total = total_row["cells"][3]["value"].to_string();
    assert_eq!(
        Decimal::from_str(total.trim_matches('"')).unwrap(),
        dec!(1980)
    );

    let stored = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(stored, 2);
}

fn item_strategy() -> impl Strategy<Value = LineItem> {
    prop_oneof![
        (1i64..4_000i64, 1i64..40_000i64).prop_map(|(hours, rate)| {
            LineItem::hourly("Task", "Producer", Decimal::new(hours, 1), Decimal::new(rate, 2))
        }),
        (1i64..200i64, 1i64..10_000_000i64).prop_map(|(hours, cost)| {
            LineItem::fixed("Task", "Designer", Decimal::from(hours), Decimal::new(cost, 2))
        }),
    ]
}

proptest! {
    #[test]
    fn test_outputs_agree_for_any_document(
        first in prop::collection::vec(item_strategy(), 1..5),
        second in prop::collection::vec(item_strategy(), 0..5),
        discount in 0i64..6_000i64,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let document = document(
            vec![scope(1, "First", first), scope(2, "Second", second)],
            DiscountSpec::percent(Decimal::new(discount, 2)),
        );

        assert_parity(&service, &document);
    }
}
