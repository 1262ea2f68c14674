use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::error::AppError;
use crate::modules::documents::models::{
    AssembleOptions, DocumentTemplate, FreeformDocument, RenderableDocument, StructuredDocument,
    Workbook,
};
use crate::modules::documents::services::html_assembler::HtmlAssembler;
use crate::modules::documents::services::workbook_assembler::assemble_workbook;
use crate::modules::pricing::models::PricingBreakdown;
use crate::modules::pricing::services::PricingReconciler;
use crate::modules::rendering::{ArtifactStore, PdfRenderer, SpreadsheetWriter};

/// A generated file ready to send back to the caller
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub download_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Service for document generation: validate, reconcile, assemble, render,
/// store
pub struct DocumentService {
    reconciler: PricingReconciler,
    template: Arc<DocumentTemplate>,
    pdf_renderer: Arc<dyn PdfRenderer>,
    spreadsheet_writer: Arc<dyn SpreadsheetWriter>,
    store: ArtifactStore,
}

impl DocumentService {
    pub fn new(
        reconciler: PricingReconciler,
        template: Arc<DocumentTemplate>,
        pdf_renderer: Arc<dyn PdfRenderer>,
        spreadsheet_writer: Arc<dyn SpreadsheetWriter>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            reconciler,
            template,
            pdf_renderer,
            spreadsheet_writer,
            store,
        }
    }

    pub fn reconciler(&self) -> &PricingReconciler {
        &self.reconciler
    }

    fn options(&self, generated_on: NaiveDate) -> AssembleOptions {
        AssembleOptions::new(self.reconciler.policy(), generated_on)
    }

    /// Validates a structured document and reconciles its pricing
    pub fn price(&self, document: &StructuredDocument) -> Result<PricingBreakdown, AppError> {
        document.validate()?;

        let breakdown = self.reconciler.reconcile_scopes(
            &document.scopes,
            &document.discount,
            document.authoritative_total(),
        );

        tracing::info!(
            project = %document.project_title,
            scopes = document.scopes.len(),
            subtotal = %breakdown.subtotal(),
            discount = %breakdown.discount_amount(),
            tax = %breakdown.tax_amount(),
            total = %breakdown.grand_total(),
            source = ?breakdown.total_source(),
            "Pricing reconciled"
        );

        Ok(breakdown)
    }

    pub fn assemble_freeform(
        &self,
        document: &FreeformDocument,
        generated_on: NaiveDate,
    ) -> RenderableDocument {
        let authoritative_total = document.authoritative_total();
        HtmlAssembler::new(&self.template).assemble_freeform(
            document,
            authoritative_total,
            &self.options(generated_on),
        )
    }

    pub fn assemble_structured(
        &self,
        document: &StructuredDocument,
        generated_on: NaiveDate,
    ) -> Result<RenderableDocument, AppError> {
        let breakdown = self.price(document)?;
        Ok(HtmlAssembler::new(&self.template).assemble_structured(
            document,
            &breakdown,
            &self.options(generated_on),
        ))
    }

    pub fn assemble_workbook(
        &self,
        document: &StructuredDocument,
        generated_on: NaiveDate,
    ) -> Result<Workbook, AppError> {
        let breakdown = self.price(document)?;
        Ok(assemble_workbook(
            document,
            &breakdown,
            &self.options(generated_on),
        ))
    }

    /// POST /generate-pdf
    pub async fn generate_freeform(
        &self,
        document: &FreeformDocument,
        generated_on: NaiveDate,
    ) -> Result<GeneratedFile, AppError> {
        tracing::info!(
            filename = %document.filename,
            show_pricing_summary = document.show_pricing_summary,
            html_length = document.html_content.len(),
            "Generating free-form document"
        );

        let assembled = self.assemble_freeform(document, generated_on);
        self.render_document(&document.filename, &assembled).await
    }

    /// POST /generate-professional-pdf
    pub async fn generate_structured(
        &self,
        document: &StructuredDocument,
        generated_on: NaiveDate,
    ) -> Result<GeneratedFile, AppError> {
        let assembled = self.assemble_structured(document, generated_on)?;
        self.render_document(&document.file_stem(), &assembled).await
    }

    /// POST /export-excel
    pub async fn export_workbook(
        &self,
        document: &StructuredDocument,
        generated_on: NaiveDate,
    ) -> Result<GeneratedFile, AppError> {
        let workbook = self.assemble_workbook(document, generated_on)?;
        let artifact = self.spreadsheet_writer.write(&workbook)?;
        let stored = self.store.store(&document.file_stem(), &artifact).await?;

        Ok(GeneratedFile {
            download_name: stored.download_name,
            content_type: artifact.content_type,
            bytes: artifact.bytes,
        })
    }

    async fn render_document(
        &self,
        stem: &str,
        assembled: &RenderableDocument,
    ) -> Result<GeneratedFile, AppError> {
        let artifact = self.pdf_renderer.render(assembled)?;
        let stored = self.store.store(stem, &artifact).await?;

        tracing::info!(file = %stored.path.display(), "Document generated");

        Ok(GeneratedFile {
            download_name: stored.download_name,
            content_type: artifact.content_type,
            bytes: artifact.bytes,
        })
    }
}
