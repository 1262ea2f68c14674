// Documents module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{
    BodyContent, DocumentTemplate, FreeformDocument, RenderableDocument, StructuredDocument,
    Workbook,
};
pub use services::{DocumentService, HtmlAssembler};
