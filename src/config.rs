//! Document configuration.
//!
//! [`DocumentConfig`] holds everything that can be expressed as data and is
//! loadable from JSON. [`DocumentBuilder`] adds the parts that cannot: header
//! and footer callbacks, a logo image and a custom image decoder.

use crate::document::{Document, Hook};
use crate::error::{Error, Result};
use folio_traits::ImageDecoder;
use folio_types::{Color, Margins, Orientation, PageSize, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Default margins: one centimetre on every side.
pub const DEFAULT_MARGIN: f32 = 28.35;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    pub family: String,
    /// Any combination of `B`, `I` and `U`.
    pub style: String,
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Helvetica".to_string(),
            style: String::new(),
            size: 12.0,
        }
    }
}

/// Initial colors. Unset roles start black.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    pub draw: Option<Color>,
    pub fill: Option<Color>,
    pub text: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
    pub keywords: String,
    pub orientation: Orientation,
    pub paper_size: PageSize,
    pub margins: Margins,
    pub font: FontConfig,
    pub colors: ColorConfig,
    /// Flate-compress content streams and embedded fonts.
    pub compress: bool,
    /// Fail on links to anchors that were never defined instead of dropping them.
    pub strict_links: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            author: String::new(),
            creator: String::new(),
            keywords: String::new(),
            orientation: Orientation::Portrait,
            paper_size: PageSize::A4,
            margins: Margins::all(DEFAULT_MARGIN),
            font: FontConfig::default(),
            colors: ColorConfig::default(),
            compress: true,
            strict_links: false,
        }
    }
}

impl DocumentConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Page dimensions after applying the orientation.
    pub fn page_size(&self) -> Size {
        self.paper_size.oriented(self.orientation)
    }
}

/// Builds a [`Document`] with its callbacks and starts the first page.
pub struct DocumentBuilder {
    config: DocumentConfig,
    header: Option<Hook>,
    footer: Option<Hook>,
    logo: Option<(String, Vec<u8>)>,
    decoder: Option<Arc<dyn ImageDecoder>>,
}

impl DocumentBuilder {
    pub fn new(config: DocumentConfig) -> Self {
        Self {
            config,
            header: None,
            footer: None,
            logo: None,
            decoder: None,
        }
    }

    /// Runs at the top of every page, right after it is created.
    pub fn header<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document) -> Result<()> + Send + 'static,
    {
        self.header = Some(Box::new(hook));
        self
    }

    /// Runs on every page just before the next page starts, and on the last
    /// page when the document is finished.
    pub fn footer<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document) -> Result<()> + Send + 'static,
    {
        self.footer = Some(Box::new(hook));
        self
    }

    /// An image registered under the id `logo` before the first page starts,
    /// so the header can place it.
    pub fn logo(mut self, format: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.logo = Some((format.into(), bytes));
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn build(self) -> Result<Document> {
        let mut document = match self.decoder {
            Some(decoder) => Document::with_decoder(self.config, decoder)?,
            None => Document::new(self.config)?,
        };
        if let Some((format, bytes)) = self.logo {
            document.register_image("logo", &format, &bytes)?;
        }
        document.set_header(self.header);
        document.set_footer(self.footer);
        document.add_page()?;
        Ok(document)
    }
}
