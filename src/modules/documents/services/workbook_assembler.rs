use rust_decimal::Decimal;

use crate::modules::documents::models::{
    AssembleOptions, Cell, Row, RowStyle, Sheet, StructuredDocument, Workbook,
};
use crate::modules::documents::services::html_assembler::AUTHORITATIVE_DISCLAIMER;
use crate::modules::pricing::models::{PricingBreakdown, Scope};

pub const SUBTOTAL_LABEL: &str = "Sub-Total (excl. GST)";
pub const AFTER_DISCOUNT_LABEL: &str = "Grand Total (excl. GST)";
pub const TOTAL_LABEL: &str = "Total Inc. GST";

/// Label of the discount row, e.g. `Discount (10%)`
pub fn discount_label(breakdown: &PricingBreakdown) -> String {
    format!("Discount ({}%)", breakdown.discount_percent().normalize())
}

/// Label of the tax row, e.g. `GST (10%)`
pub fn tax_label(options: &AssembleOptions) -> String {
    format!("GST ({}%)", options.tax_rate_percent.normalize())
}

/// Builds the spreadsheet export of a structured document. The totals rows
/// come from the same breakdown the PDF uses.
pub fn assemble_workbook(
    document: &StructuredDocument,
    breakdown: &PricingBreakdown,
    options: &AssembleOptions,
) -> Workbook {
    let mut sheets = vec![
        overview_sheet(document, options),
        pricing_sheet(document, breakdown, options),
    ];

    let deliverables = list_sheet(document, "Deliverables", |scope| &scope.deliverables);
    let assumptions = list_sheet(document, "Assumptions", |scope| &scope.assumptions);
    sheets.extend(deliverables);
    sheets.extend(assumptions);

    Workbook { sheets }
}

fn overview_sheet(document: &StructuredDocument, options: &AssembleOptions) -> Sheet {
    let mut sheet = Sheet::new("Overview");
    sheet.push(RowStyle::Header, vec!["Statement of Work".into()]);
    sheet.push(
        RowStyle::Normal,
        vec![
            "Client".into(),
            document.client_name.as_deref().unwrap_or("N/A").into(),
        ],
    );
    sheet.push(
        RowStyle::Normal,
        vec!["Title".into(), document.project_title.as_str().into()],
    );
    if let Some(company) = &document.company {
        sheet.push(
            RowStyle::Normal,
            vec!["Prepared by".into(), company.as_str().into()],
        );
    }
    sheet.push(
        RowStyle::Normal,
        vec![
            "Date".into(),
            options.generated_on.format("%Y-%m-%d").to_string().into(),
        ],
    );
    sheet
}

fn pricing_sheet(
    document: &StructuredDocument,
    breakdown: &PricingBreakdown,
    options: &AssembleOptions,
) -> Sheet {
    let currency = options.currency;
    let mut sheet = Sheet::new("Pricing");

    sheet.push(
        RowStyle::Header,
        vec![
            "Role".into(),
            "Hours".into(),
            format!("Rate ({})", currency).into(),
            format!("Total ({})", currency).into(),
        ],
    );

    for scope in &document.scopes {
        sheet.push(RowStyle::Section, vec![scope.title.as_str().into()]);
        for item in &scope.items {
            sheet.push(
                RowStyle::Normal,
                vec![
                    item.role.as_str().into(),
                    item.billable_hours().into(),
                    item.rate(currency).into(),
                    item.cost(currency).into(),
                ],
            );
        }
    }

    sheet.rows.push(Row::blank());
    sheet.push(
        RowStyle::Total,
        vec!["Total Hours".into(), document.total_hours().into()],
    );

    let mut total_row = |label: String, value: Decimal| {
        sheet.push(
            RowStyle::Total,
            vec![Cell::Empty, Cell::Empty, label.into(), value.into()],
        );
    };

    total_row(SUBTOTAL_LABEL.to_string(), breakdown.subtotal());
    if breakdown.has_discount() {
        total_row(discount_label(breakdown), breakdown.discount_amount());
    }
    total_row(
        AFTER_DISCOUNT_LABEL.to_string(),
        breakdown.subtotal_after_discount(),
    );
    total_row(tax_label(options), breakdown.tax_amount());
    total_row(TOTAL_LABEL.to_string(), breakdown.grand_total());

    if breakdown.total_source().is_authoritative() {
        sheet.push(RowStyle::Normal, vec![AUTHORITATIVE_DISCLAIMER.into()]);
    }

    sheet
}

fn list_sheet(
    document: &StructuredDocument,
    name: &str,
    entries: impl Fn(&Scope) -> &Vec<String>,
) -> Option<Sheet> {
    if document.scopes.iter().all(|scope| entries(scope).is_empty()) {
        return None;
    }

    let mut sheet = Sheet::new(name);
    sheet.push(RowStyle::Header, vec!["Scope".into(), name.into()]);
    for scope in &document.scopes {
        for entry in entries(scope) {
            sheet.push(
                RowStyle::Normal,
                vec![scope.title.as_str().into(), entry.as_str().into()],
            );
        }
    }
    Some(sheet)
}
