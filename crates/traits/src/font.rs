//! Font metrics abstraction.
//!
//! The engine never parses font programs itself. It asks a `FontMetrics`
//! implementation for glyph advances, kerning and the handful of descriptor
//! values a PDF font dictionary needs. All values are expressed in glyph
//! space, i.e. thousandths of an em, the unit PDF uses for `/Widths`.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("'{0}' is not a standard PDF font family")]
    NotStandard(String),
}

/// Values needed for a `/FontDescriptor` and for underline placement.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub italic_angle: f32,
    pub stem_v: f32,
    /// `[llx, lly, urx, ury]`
    pub bbox: [f32; 4],
    /// PDF font flags (bit 6 = nonsymbolic, bit 7 = italic, ...).
    pub flags: u32,
    pub missing_width: f32,
    /// Distance from the baseline to the top of the underline; negative is below.
    pub underline_position: f32,
    pub underline_thickness: f32,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            ascent: 718.0,
            descent: -207.0,
            cap_height: 718.0,
            italic_angle: 0.0,
            stem_v: 88.0,
            bbox: [-166.0, -225.0, 1000.0, 931.0],
            flags: 32,
            missing_width: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
        }
    }
}

/// Metrics for one concrete font program (family + style).
pub trait FontMetrics: Send + Sync + Debug {
    /// The PostScript name written as `/BaseFont`.
    fn postscript_name(&self) -> &str;

    /// Advance width of `ch` in thousandths of an em.
    ///
    /// Characters the font cannot encode must report the width of whatever
    /// the text encoder substitutes for them, so measurement matches output.
    fn glyph_width(&self, ch: char) -> f32;

    /// Pair adjustment in thousandths of an em; positive widens the gap.
    fn kerning(&self, _left: char, _right: char) -> f32 {
        0.0
    }

    /// Whether `kerning` can ever return a non-zero value.
    fn has_kerning(&self) -> bool {
        false
    }

    fn descriptor(&self) -> &FontDescriptor;

    /// Glyph index of `ch` in the embedded program.
    ///
    /// Fonts that return `Some` for any character are written as composite
    /// fonts and their text is encoded as glyph ids, so any character the
    /// program covers can be shown. Uncovered characters map to glyph 0.
    fn glyph_id(&self, _ch: char) -> Option<u16> {
        None
    }

    /// The font program to embed, or `None` for the standard 14 fonts.
    fn font_program(&self) -> Option<&[u8]> {
        None
    }

    /// Rendered width of `text` at `size` points, including kerning.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let mut total = 0.0;
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            total += self.glyph_width(ch);
            if let Some(prev) = previous {
                total += self.kerning(prev, ch);
            }
            previous = Some(ch);
        }
        total * size / 1000.0
    }
}

pub type SharedFontMetrics = Arc<dyn FontMetrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Monospace {
        descriptor: FontDescriptor,
    }

    impl FontMetrics for Monospace {
        fn postscript_name(&self) -> &str {
            "Mono"
        }

        fn glyph_width(&self, _ch: char) -> f32 {
            500.0
        }

        fn kerning(&self, left: char, right: char) -> f32 {
            if left == 'A' && right == 'V' { -100.0 } else { 0.0 }
        }

        fn descriptor(&self) -> &FontDescriptor {
            &self.descriptor
        }
    }

    #[test]
    fn text_width_scales_and_kerns() {
        let font = Monospace {
            descriptor: FontDescriptor::default(),
        };
        assert_eq!(font.text_width("ab", 10.0), 10.0);
        assert_eq!(font.text_width("AV", 10.0), 9.0);
        assert_eq!(font.text_width("", 12.0), 0.0);
    }
}
