// Rendering module: external renderer seams and scratch storage

pub mod artifact_store;
pub mod renderer;

pub use artifact_store::{ArtifactStore, StoredArtifact};
pub use renderer::{
    HtmlPassthroughRenderer, JsonWorkbookWriter, PdfRenderer, RenderedArtifact, SpreadsheetWriter,
};
