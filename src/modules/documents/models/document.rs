use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::core::{AppError, Currency, Result};
use crate::modules::pricing::models::{parse_authoritative_total, DiscountSpec, Scope};
use crate::modules::pricing::services::PricingPolicy;

fn default_filename() -> String {
    "document".to_string()
}

fn default_true() -> bool {
    true
}

/// Free-form body markup produced by the proposal editor
#[derive(Debug, Clone, Deserialize)]
pub struct FreeformDocument {
    pub html_content: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_true")]
    pub show_pricing_summary: bool,
    /// Authoritative tax-inclusive total, as text or number
    #[serde(default)]
    pub final_investment_target_text: Option<Value>,
}

impl FreeformDocument {
    /// The authoritative total, if one was supplied and parses as a plain
    /// non-negative decimal. A leading `$` is tolerated. Anything else counts
    /// as absent.
    pub fn authoritative_total(&self) -> Option<Decimal> {
        self.final_investment_target_text
            .as_ref()
            .and_then(parse_authoritative_total)
    }
}

/// Multi-scope statement of work
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument {
    pub project_title: String,
    pub scopes: Vec<Scope>,
    #[serde(default)]
    pub discount: DiscountSpec,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub budget_notes: Option<String>,
    /// Authoritative tax-inclusive total, as text or number
    #[serde(default)]
    pub authoritative_total: Option<Value>,
}

impl StructuredDocument {
    /// Structural checks, run before any pricing
    pub fn validate(&self) -> Result<()> {
        if self.project_title.trim().is_empty() {
            return Err(AppError::validation("Project title cannot be empty"));
        }

        if self.scopes.is_empty() {
            return Err(AppError::validation(
                "Document must contain at least one scope",
            ));
        }

        self.scopes.iter().try_for_each(Scope::validate)
    }

    /// The authoritative total if it parses, see [`parse_authoritative_total`]
    pub fn authoritative_total(&self) -> Option<Decimal> {
        self.authoritative_total
            .as_ref()
            .and_then(parse_authoritative_total)
    }

    pub fn total_hours(&self) -> Decimal {
        self.scopes.iter().map(Scope::total_hours).sum()
    }

    /// File name stem, e.g. `Website Rebuild` -> `Website-Rebuild-Professional`
    pub fn file_stem(&self) -> String {
        format!("{}-Professional", self.project_title.trim().replace(' ', "-"))
    }
}

/// Inputs to assembly that are not part of the document itself. The
/// generation date is the only time-dependent value the assembler sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    pub generated_on: NaiveDate,
    pub currency: Currency,
    pub tax_rate_percent: Decimal,
}

impl AssembleOptions {
    pub fn new(policy: &PricingPolicy, generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            currency: policy.currency,
            tax_rate_percent: policy.tax_rate_percent,
        }
    }
}

/// A complete, self-contained HTML document ready for a PDF engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableDocument {
    pub title: String,
    pub html: String,
}
