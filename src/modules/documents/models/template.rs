/// Stylesheet used when no custom CSS is configured
pub const DEFAULT_CSS: &str = r#"
body { font-family: 'Plus Jakarta Sans', Arial, sans-serif; font-size: 11pt; color: #1f2937; line-height: 1.5; }
.sow-document { max-width: 100%; }
.sow-header { text-align: left; margin-bottom: 24px; }
.sow-logo { max-height: 60px; }
h1, h2, h3, h4, h5, h6 { color: #0e2e33; margin: 18px 0 8px; }
table { width: 100%; border-collapse: collapse; margin: 12px 0; }
th { background: #0e2e33; color: #ffffff; text-align: left; padding: 6px 8px; }
td { border-bottom: 1px solid #e5e7eb; padding: 6px 8px; }
td.num, th.num { text-align: right; }
.summary-table td { border: none; }
.sow-disclaimer { color: #6b7280; font-size: 0.85em; margin-top: 4px; }
.sow-footer { margin-top: 32px; font-size: 9pt; color: #6b7280; text-align: center; }
"#;

/// Branding and layout shared by every generated document.
///
/// Built once from configuration and passed to the assembler explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub company_name: String,
    pub css: String,
    pub footer_lines: Vec<String>,
    /// Base64-encoded PNG logo
    pub logo_base64: Option<String>,
}

impl DocumentTemplate {
    pub fn new(company_name: impl Into<String>) -> Self {
        let company_name = company_name.into();
        Self {
            footer_lines: vec![
                format!("{} Pty Ltd", company_name),
                "This document is confidential and intended solely for the addressee.".to_string(),
            ],
            company_name,
            css: DEFAULT_CSS.to_string(),
            logo_base64: None,
        }
    }

    pub fn with_logo(mut self, logo_base64: impl Into<String>) -> Self {
        self.logo_base64 = Some(logo_base64.into());
        self
    }

    pub fn with_footer_lines(mut self, footer_lines: Vec<String>) -> Self {
        self.footer_lines = footer_lines;
        self
    }
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self::new("Social Garden")
    }
}
