//! Seams to the binary renderers.
//!
//! Rasterizing HTML to PDF and encoding XLSX belong to external engines. The
//! service only depends on these traits; the pass-through implementations let
//! it run without a native engine and are what the tests use.

use crate::core::{AppError, Result};
use crate::modules::documents::models::{RenderableDocument, Workbook};

/// Bytes produced by a renderer plus how to serve them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Turns an assembled HTML document into a printable artifact
pub trait PdfRenderer: Send + Sync {
    fn render(&self, document: &RenderableDocument) -> Result<RenderedArtifact>;
}

/// Turns an assembled workbook into a spreadsheet artifact
pub trait SpreadsheetWriter: Send + Sync {
    fn write(&self, workbook: &Workbook) -> Result<RenderedArtifact>;
}

/// Hands the assembled HTML through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPassthroughRenderer;

impl PdfRenderer for HtmlPassthroughRenderer {
    fn render(&self, document: &RenderableDocument) -> Result<RenderedArtifact> {
        if document.html.is_empty() {
            return Err(AppError::render("Assembled document is empty"));
        }

        Ok(RenderedArtifact {
            bytes: document.html.as_bytes().to_vec(),
            content_type: "text/html; charset=utf-8",
            extension: "html",
        })
    }
}

/// Serializes the workbook rows as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWorkbookWriter;

impl SpreadsheetWriter for JsonWorkbookWriter {
    fn write(&self, workbook: &Workbook) -> Result<RenderedArtifact> {
        let bytes = serde_json::to_vec_pretty(workbook)
            .map_err(|e| AppError::render(format!("Workbook serialization failed: {}", e)))?;

        Ok(RenderedArtifact {
            bytes,
            content_type: "application/json",
            extension: "json",
        })
    }
}
