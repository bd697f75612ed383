//! Font and image tables.
//!
//! Slots are append-only: an id handed out once stays valid for the life of
//! the document and always names the same slot.

use crate::error::{Error, Result};
use folio_fonts::{StandardFont, StandardMetrics, TrueTypeMetrics};
use folio_traits::{DecodedImage, ImageDecoder, ImageFormat, SharedFontMetrics};
use folio_types::{FontId, ImageId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Style flags of a font selection, parsed from strings like `"BI"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    /// Rendering flag only; does not select a different font program.
    pub underline: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle { bold: false, italic: false, underline: false };

    pub fn parse(style: &str) -> Self {
        let style = style.to_ascii_uppercase();
        FontStyle {
            bold: style.contains('B'),
            italic: style.contains('I'),
            underline: style.contains('U'),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            f.write_str("B")?;
        }
        if self.italic {
            f.write_str("I")?;
        }
        if self.underline {
            f.write_str("U")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// One of the base fonts every viewer provides.
    Standard(StandardFont),
    /// A TrueType program written into the file.
    Embedded,
}

#[derive(Debug, Clone)]
pub struct FontResource {
    pub id: FontId,
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub source: FontSource,
    pub metrics: SharedFontMetrics,
}

#[derive(Debug, Clone)]
pub struct ImageResource {
    pub id: ImageId,
    pub name: String,
    pub format: ImageFormat,
    pub image: DecodedImage,
}

impl ImageResource {
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }
}

type FontKey = (String, bool, bool);

fn font_key(family: &str, style: FontStyle) -> FontKey {
    (family.trim().to_lowercase(), style.bold, style.italic)
}

#[derive(Debug)]
pub struct ResourceManager {
    fonts: Vec<FontResource>,
    font_index: HashMap<FontKey, FontId>,
    images: Vec<ImageResource>,
    image_index: HashMap<String, ImageId>,
    decoder: Arc<dyn ImageDecoder>,
}

impl ResourceManager {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            fonts: Vec::new(),
            font_index: HashMap::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
            decoder,
        }
    }

    /// Registers a TrueType font. Registering the same family and style again
    /// returns the existing id and ignores `data`.
    pub fn register_font(&mut self, family: &str, style: FontStyle, data: Vec<u8>) -> Result<FontId> {
        let key = font_key(family, style);
        if let Some(id) = self.font_index.get(&key) {
            log::debug!("Font '{}' ({}) already registered as {}", family, style, id);
            return Ok(*id);
        }

        let metrics = TrueTypeMetrics::from_bytes(data).map_err(|source| Error::InvalidFontData {
            family: family.to_string(),
            source,
        })?;
        Ok(self.push_font(key, family, FontSource::Embedded, Arc::new(metrics)))
    }

    /// Returns the font registered for `family`/`style`, registering a base
    /// font on first use.
    pub fn resolve_font(&mut self, family: &str, style: FontStyle) -> Result<FontId> {
        let key = font_key(family, style);
        if let Some(id) = self.font_index.get(&key) {
            return Ok(*id);
        }

        let standard = StandardFont::from_family(family, style.bold, style.italic).map_err(|_| Error::FontNotFound {
            family: family.to_string(),
            style: style.to_string(),
        })?;
        let metrics = Arc::new(StandardMetrics::new(standard));
        Ok(self.push_font(key, family, FontSource::Standard(standard), metrics))
    }

    pub fn find_font(&self, family: &str, style: FontStyle) -> Option<FontId> {
        self.font_index.get(&font_key(family, style)).copied()
    }

    fn push_font(&mut self, key: FontKey, family: &str, source: FontSource, metrics: SharedFontMetrics) -> FontId {
        let id = FontId::new(self.fonts.len() as u32 + 1);
        log::debug!(
            "Registered font {} -> {} ({:?})",
            id,
            metrics.postscript_name(),
            source
        );
        self.fonts.push(FontResource {
            id,
            family: family.to_string(),
            bold: key.1,
            italic: key.2,
            source,
            metrics,
        });
        self.font_index.insert(key, id);
        id
    }

    pub fn font(&self, id: FontId) -> Option<&FontResource> {
        (id.get() as usize).checked_sub(1).and_then(|slot| self.fonts.get(slot))
    }

    pub fn fonts(&self) -> &[FontResource] {
        &self.fonts
    }

    /// Registers (or replaces) the image stored under `name`. A replacement
    /// keeps the original id.
    pub fn register_image(&mut self, name: &str, format: &str, bytes: &[u8]) -> Result<ImageId> {
        let format = ImageFormat::from_tag(format).ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?;
        let image = self.decoder.decode(bytes, format).map_err(|source| Error::DecodeError {
            id: name.to_string(),
            source,
        })?;

        if let Some(id) = self.image_index.get(name).copied() {
            let slot = (id.get() - 1) as usize;
            log::debug!("Replacing image '{}' in slot {}", name, id);
            self.images[slot] = ImageResource {
                id,
                name: name.to_string(),
                format,
                image,
            };
            return Ok(id);
        }

        let id = ImageId::new(self.images.len() as u32 + 1);
        log::debug!(
            "Registered image '{}' as {} ({}x{} {})",
            name,
            id,
            image.width,
            image.height,
            format
        );
        self.images.push(ImageResource {
            id,
            name: name.to_string(),
            format,
            image,
        });
        self.image_index.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn find_image(&self, name: &str) -> Option<ImageId> {
        self.image_index.get(name).copied()
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageResource> {
        (id.get() as usize).checked_sub(1).and_then(|slot| self.images.get(slot))
    }

    pub fn images(&self) -> &[ImageResource] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_images::RasterDecoder;

    const DEJAVU: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/crates/fonts/tests/fixtures/DejaVuSans.ttf"
    ));

    fn manager() -> ResourceManager {
        ResourceManager::new(Arc::new(RasterDecoder))
    }

    #[test]
    fn registering_the_same_font_twice_reuses_the_slot() {
        let mut resources = manager();
        let bold = FontStyle::parse("B");
        let first = resources.register_font("DejaVu", bold, DEJAVU.to_vec()).unwrap();
        let second = resources.register_font("dejavu", bold, DEJAVU.to_vec()).unwrap();
        assert_eq!(first, second);
        assert_eq!(resources.fonts().len(), 1);

        let regular = resources.register_font("DejaVu", FontStyle::REGULAR, DEJAVU.to_vec()).unwrap();
        assert_ne!(first, regular);
        assert_eq!(resources.fonts().len(), 2);
    }

    #[test]
    fn underline_does_not_create_a_new_font() {
        let mut resources = manager();
        let plain = resources.resolve_font("Helvetica", FontStyle::parse("")).unwrap();
        let underlined = resources.resolve_font("Helvetica", FontStyle::parse("U")).unwrap();
        assert_eq!(plain, underlined);
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut resources = manager();
        let err = resources
            .register_font("Broken", FontStyle::REGULAR, b"nope".to_vec())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFontData { .. }));
        assert!(resources.fonts().is_empty());
    }

    #[test]
    fn unknown_families_are_not_found() {
        let mut resources = manager();
        let err = resources.resolve_font("Wingdings", FontStyle::REGULAR).unwrap_err();
        assert!(matches!(err, Error::FontNotFound { .. }));
    }

    #[test]
    fn unsupported_image_formats_fail_before_decoding() {
        let mut resources = manager();
        let err = resources.register_image("logo", "bmp", b"BM").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        let err = resources.register_image("logo", "png", b"garbage").unwrap_err();
        assert!(matches!(err, Error::DecodeError { .. }));
        assert!(resources.images().is_empty());
    }
}
