use folio_traits::{DecodeError, FontError};
use folio_types::{AnchorName, Margins, Size};
use folio_writer::WriteError;
use thiserror::Error;

/// Every failure the document engine reports.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid margins {margins:?} for a {}x{} page: {reason}", page.width, page.height)]
    InvalidMargin {
        margins: Margins,
        page: Size,
        reason: String,
    },

    #[error("Invalid font data for '{family}': {source}")]
    InvalidFontData {
        family: String,
        #[source]
        source: FontError,
    },

    #[error("Font '{family}' (style '{style}') is not registered and is not a standard font")]
    FontNotFound { family: String, style: String },

    #[error("Unsupported image format '{0}' (expected png, jpg, jpeg or gif)")]
    UnsupportedFormat(String),

    #[error("Image '{id}' could not be decoded: {source}")]
    DecodeError {
        id: String,
        #[source]
        source: DecodeError,
    },

    #[error("Image '{0}' is not registered")]
    ImageNotFound(String),

    #[error("Page {index} does not exist (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("Link target '{0}' was never defined")]
    UnresolvedAnchor(AnchorName),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Header/footer callback failed on page {page}: {source}")]
    Hook {
        page: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WriteError> for Error {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Io(e) => Error::Io(e),
            other => Error::Io(std::io::Error::other(other.to_string())),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
