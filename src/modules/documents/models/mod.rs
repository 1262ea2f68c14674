pub mod block;
pub mod document;
pub mod template;
pub mod workbook;

pub use block::{Block, BlockKind, BodyContent};
pub use document::{AssembleOptions, FreeformDocument, RenderableDocument, StructuredDocument};
pub use template::{DocumentTemplate, DEFAULT_CSS};
pub use workbook::{Cell, Row, RowStyle, Sheet, Workbook};
