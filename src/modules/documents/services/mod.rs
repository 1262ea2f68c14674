pub mod document_service;
pub mod html_assembler;
pub mod workbook_assembler;

pub use document_service::{DocumentService, GeneratedFile};
pub use html_assembler::{HtmlAssembler, AUTHORITATIVE_DISCLAIMER};
pub use workbook_assembler::assemble_workbook;
