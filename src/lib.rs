//! folio assembles PDF documents from imperative drawing calls.
//!
//! A [`Document`] tracks pages, a cursor per page and the current font,
//! colors and line width. Drawing calls record content operators against the
//! active page; fonts and images live in a shared [`ResourceManager`];
//! internal links may point at anchors defined later. [`Document::finish`]
//! freezes everything into a [`FinishedDocument`], which serializes to a
//! PDF 1.7 file with a single cross-reference table.
//!
//! ```no_run
//! use folio::{CellOptions, DocumentBuilder, DocumentConfig};
//!
//! # fn main() -> folio::Result<()> {
//! let mut doc = DocumentBuilder::new(DocumentConfig::default()).build()?;
//! doc.set_font("Helvetica", "B", 16.0)?;
//! doc.cell(CellOptions::new(0.0, 20.0).text("Hello"))?;
//! let file = std::fs::File::create("hello.pdf")?;
//! doc.write_to(file)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod geometry;
pub mod links;
pub mod resources;
pub mod serializer;

pub use config::{ColorConfig, DocumentBuilder, DocumentConfig, FontConfig};
pub use content::{Align, Border, CellFlow, CellLink, CellOptions, ColorRole, ContentOperator, PaintStyle, TextRun, VAlign};
pub use document::{Document, FinishedDocument, Hook, Metadata, Page};
pub use error::{Error, Result};
pub use geometry::{Cursor, PageGeometry};
pub use links::{Destination, LinkAnnotation, LinkResolver};
pub use resources::{FontSource, FontStyle, ResourceManager};

pub use folio_types::{AnchorName, Color, FontId, ImageId, Margins, Orientation, PageSize, Point, Rect, Size};
