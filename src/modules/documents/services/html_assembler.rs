use std::fmt::Write;

use rust_decimal::Decimal;

use crate::core::Currency;
use crate::modules::documents::models::{
    AssembleOptions, BodyContent, DocumentTemplate, FreeformDocument, RenderableDocument,
    StructuredDocument,
};
use crate::modules::pricing::models::PricingBreakdown;

/// Shown under a total that came from the caller rather than the line items
pub const AUTHORITATIVE_DISCLAIMER: &str =
    "This final project value is authoritative and supersedes any computed totals.";

/// Builds the HTML handed to the PDF engine. Pure: output depends only on
/// the arguments.
pub struct HtmlAssembler<'a> {
    template: &'a DocumentTemplate,
}

impl<'a> HtmlAssembler<'a> {
    pub fn new(template: &'a DocumentTemplate) -> Self {
        Self { template }
    }

    /// Free-form body with the pricing summary rules applied:
    ///
    /// - authoritative total given: embedded Summary sections are replaced by
    ///   exactly one canonical block showing that total, whether or not the
    ///   computed summary is shown
    /// - summary hidden: any embedded Summary section is removed
    /// - otherwise the body is passed through untouched
    pub fn freeform_body(
        &self,
        document: &FreeformDocument,
        authoritative_total: Option<Decimal>,
        options: &AssembleOptions,
    ) -> String {
        if let Some(total) = authoritative_total {
            let mut body = BodyContent::parse(&document.html_content);
            let removed = body.strip_summary();
            tracing::debug!(removed, "Replaced computed summary with authoritative total");

            body.append(&authoritative_summary(total, options.currency));
            return body.to_string();
        }

        if !document.show_pricing_summary {
            let mut body = BodyContent::parse(&document.html_content);
            let removed = body.strip_summary();
            tracing::debug!(removed, "Pricing summary hidden");
            return body.to_string();
        }

        document.html_content.clone()
    }

    pub fn assemble_freeform(
        &self,
        document: &FreeformDocument,
        authoritative_total: Option<Decimal>,
        options: &AssembleOptions,
    ) -> RenderableDocument {
        let body = self.freeform_body(document, authoritative_total, options);
        RenderableDocument {
            title: document.filename.clone(),
            html: self.wrap(&document.filename, &body),
        }
    }

    pub fn assemble_structured(
        &self,
        document: &StructuredDocument,
        breakdown: &PricingBreakdown,
        options: &AssembleOptions,
    ) -> RenderableDocument {
        let currency = options.currency;
        let company = document
            .company
            .as_deref()
            .unwrap_or(&self.template.company_name);
        let mut body = String::new();

        let _ = writeln!(body, "<h1>{}</h1>", escape(&document.project_title));
        if let Some(client) = &document.client_name {
            let _ = writeln!(
                body,
                "<p class=\"sow-meta\"><strong>Client:</strong> {}</p>",
                escape(client)
            );
        }
        let _ = writeln!(
            body,
            "<p class=\"sow-meta\"><strong>Prepared by:</strong> {}</p>",
            escape(company)
        );
        let _ = writeln!(
            body,
            "<p class=\"sow-meta\"><strong>Date:</strong> {}</p>",
            options.generated_on.format("%-d %B %Y")
        );

        for (position, scope) in document.scopes.iter().enumerate() {
            let _ = writeln!(body, "<section class=\"sow-scope\">");
            let _ = writeln!(
                body,
                "<h2>Scope {}: {}</h2>",
                position + 1,
                escape(&scope.title)
            );
            if !scope.description.trim().is_empty() {
                let _ = writeln!(body, "<p>{}</p>", escape(&scope.description));
            }

            let _ = writeln!(
                body,
                "<table class=\"pricing-table\">\n<thead><tr><th>Role</th><th>Description</th>\
                 <th class=\"num\">Hours</th><th class=\"num\">Rate</th><th class=\"num\">Cost</th></tr></thead>\n<tbody>"
            );
            for item in &scope.items {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                    escape(&item.role),
                    escape(&item.description),
                    item.billable_hours().normalize(),
                    currency.format_amount(item.rate(currency)),
                    currency.format_amount(item.cost(currency)),
                );
            }
            let _ = writeln!(
                body,
                "</tbody>\n<tfoot><tr><td colspan=\"2\"><strong>Scope Total</strong></td>\
                 <td class=\"num\">{}</td><td></td><td class=\"num\"><strong>{}</strong></td></tr></tfoot>\n</table>",
                scope.total_hours().normalize(),
                currency.format_amount(scope.subtotal(currency)),
            );

            write_list(&mut body, "Deliverables", &scope.deliverables);
            write_list(&mut body, "Assumptions", &scope.assumptions);
            let _ = writeln!(body, "</section>");
        }

        body.push_str(&totals_summary(breakdown, options));

        if let Some(notes) = document
            .budget_notes
            .as_deref()
            .filter(|notes| !notes.trim().is_empty())
        {
            let _ = writeln!(body, "<h3>Budget Notes</h3>\n<p>{}</p>", escape(notes));
        }

        RenderableDocument {
            title: document.project_title.clone(),
            html: self.wrap(&document.project_title, &body),
        }
    }

    /// Places content inside the branded page shell
    fn wrap(&self, title: &str, content: &str) -> String {
        let mut html = String::with_capacity(content.len() + self.template.css.len() + 1024);

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"sow-document\">\n<div class=\"sow-header\">\n",
            escape(title),
            self.template.css,
        );
        if let Some(logo) = &self.template.logo_base64 {
            let _ = writeln!(
                html,
                "<img src=\"data:image/png;base64,{}\" alt=\"{} logo\" class=\"sow-logo\">",
                logo,
                escape(&self.template.company_name)
            );
        }
        let _ = write!(html, "</div>\n<div class=\"sow-content\">\n{}\n</div>\n", content);

        html.push_str("<div class=\"sow-footer\">\n<hr>\n");
        for (index, line) in self.template.footer_lines.iter().enumerate() {
            if index == 0 {
                let _ = writeln!(html, "<p><strong>{}</strong></p>", escape(line));
            } else {
                let _ = writeln!(html, "<p>{}</p>", escape(line));
            }
        }
        html.push_str("</div>\n</div>\n</body>\n</html>\n");

        html
    }
}

/// Canonical summary for a free-form document with an authoritative total
fn authoritative_summary(total: Decimal, currency: Currency) -> String {
    format!(
        "\n<h4>Summary</h4>\n<table class=\"summary-table\">\n<tr><td><strong>Final Project Value:</strong></td>\
         <td class=\"num\"><strong>{}</strong></td></tr>\n</table>\n<p class=\"sow-disclaimer\">{}</p>\n",
        currency.format_amount(total),
        AUTHORITATIVE_DISCLAIMER
    )
}

/// Document-level totals for a structured document
fn totals_summary(breakdown: &PricingBreakdown, options: &AssembleOptions) -> String {
    let currency = options.currency;
    let mut html = String::from("<h4>Summary</h4>\n<table class=\"summary-table\">\n");

    let mut row = |label: String, value: String| {
        let _ = writeln!(
            html,
            "<tr><td><strong>{}</strong></td><td class=\"num\">{}</td></tr>",
            label, value
        );
    };

    row(
        "Subtotal (excl. GST)".to_string(),
        currency.format_amount(breakdown.subtotal()),
    );
    if breakdown.has_discount() {
        row(
            format!("Discount ({}%)", breakdown.discount_percent().normalize()),
            format!("-{}", currency.format_amount(breakdown.discount_amount())),
        );
        row(
            "Subtotal after discount".to_string(),
            currency.format_amount(breakdown.subtotal_after_discount()),
        );
    }
    row(
        format!("GST ({}%)", options.tax_rate_percent.normalize()),
        currency.format_amount(breakdown.tax_amount()),
    );
    row(
        "Total (incl. GST)".to_string(),
        format!("<strong>{}</strong>", currency.format_amount(breakdown.grand_total())),
    );

    html.push_str("</table>\n");
    if breakdown.total_source().is_authoritative() {
        let _ = writeln!(html, "<p class=\"sow-disclaimer\">{}</p>", AUTHORITATIVE_DISCLAIMER);
    }

    html
}

fn write_list(body: &mut String, heading: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }

    let _ = writeln!(body, "<h3>{}</h3>\n<ul>", heading);
    for entry in entries {
        let _ = writeln!(body, "<li>{}</li>", escape(entry));
    }
    body.push_str("</ul>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
