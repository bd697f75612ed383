pub mod pdf_assertions;

use folio::{Document, DocumentConfig, Margins};
use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const DEJAVU: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/crates/fonts/tests/fixtures/DejaVuSans.ttf"
));

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A4, 72pt margins, uncompressed streams so content can be searched as text.
pub fn plain_config() -> DocumentConfig {
    DocumentConfig {
        margins: Margins::all(72.0),
        compress: false,
        ..DocumentConfig::default()
    }
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Finishes and serializes `document`, then parses the result back.
    pub fn from_document(document: Document) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = document.write_to(Vec::new())?;
        Self::from_bytes(bytes)
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Decoded content stream of 1-based page `page`.
    pub fn page_content(&self, page: u32) -> String {
        let pages = self.doc.get_pages();
        pages
            .get(&page)
            .and_then(|id| self.doc.get_page_content(*id).ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    /// Parsed operations of 1-based page `page`.
    pub fn page_operations(&self, page: u32) -> Vec<Operation> {
        let pages = self.doc.get_pages();
        pages
            .get(&page)
            .and_then(|id| self.doc.get_page_content(*id).ok())
            .and_then(|bytes| Content::decode(&bytes).ok())
            .map(|content| content.operations)
            .unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}
