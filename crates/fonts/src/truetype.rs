//! Metrics for embedded TrueType fonts.
//!
//! Everything the engine needs is read once at load time: the Unicode
//! character map, advances per glyph, kerning pairs between the Latin
//! characters and the descriptor values.

use crate::encoding;
use folio_traits::{FontDescriptor, FontError, FontMetrics};
use std::collections::HashMap;
use ttf_parser::{Face, GlyphId, name_id};

#[derive(Debug, Clone)]
pub struct TrueTypeMetrics {
    postscript_name: String,
    glyph_ids: HashMap<char, u16>,
    advances: Vec<f32>,
    kern_pairs: HashMap<(char, char), f32>,
    descriptor: FontDescriptor,
    data: Vec<u8>,
}

impl TrueTypeMetrics {
    /// Parses a TrueType font program. Fonts with CFF outlines are rejected.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let face = Face::parse(&data, 0).map_err(|e| FontError::InvalidData(e.to_string()))?;
        if face.tables().glyf.is_none() {
            return Err(FontError::InvalidData(
                "only TrueType (glyf) outlines can be embedded".to_string(),
            ));
        }

        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = 1000.0 / units_per_em;

        let advances: Vec<f32> = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_hor_advance(GlyphId(gid))
                    .map(|w| w as f32 * scale)
                    .unwrap_or(0.0)
            })
            .collect();
        let missing_width = advances.first().copied().unwrap_or(0.0);

        let glyph_ids = read_character_map(&face);
        if glyph_ids.is_empty() {
            return Err(FontError::InvalidData("font has no Unicode character map".to_string()));
        }

        let kern_pairs = read_kern_pairs(&face, &glyph_ids, scale);
        let descriptor = read_descriptor(&face, scale, missing_width);
        let postscript_name = read_postscript_name(&face);

        log::debug!(
            "Loaded TrueType font '{}' ({} units/em, {} glyphs, {} mapped characters, {} kerning pairs)",
            postscript_name,
            units_per_em,
            advances.len(),
            glyph_ids.len(),
            kern_pairs.len()
        );

        Ok(Self {
            postscript_name,
            glyph_ids,
            advances,
            kern_pairs,
            descriptor,
            data,
        })
    }

    /// Number of characters the program maps to a glyph.
    pub fn mapped_characters(&self) -> usize {
        self.glyph_ids.len()
    }

    fn advance(&self, gid: u16) -> f32 {
        self.advances
            .get(gid as usize)
            .copied()
            .unwrap_or(self.descriptor.missing_width)
    }
}

fn read_character_map(face: &Face<'_>) -> HashMap<char, u16> {
    let mut glyph_ids = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return glyph_ids;
    };
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }
        subtable.codepoints(|cp| {
            let (Some(ch), Some(glyph)) = (char::from_u32(cp), subtable.glyph_index(cp)) else {
                return;
            };
            if glyph.0 != 0 {
                glyph_ids.entry(ch).or_insert(glyph.0);
            }
        });
    }
    glyph_ids
}

/// Pairs are only looked up between WinAnsi characters; the full glyph set
/// is quadratic in the size of the font.
fn read_kern_pairs(face: &Face<'_>, glyph_ids: &HashMap<char, u16>, scale: f32) -> HashMap<(char, char), f32> {
    let mut pairs = HashMap::new();
    let Some(kern) = face.tables().kern else {
        return pairs;
    };

    let latin: Vec<(char, GlyphId)> = (32u8..=255)
        .filter_map(encoding::win_ansi_char)
        .filter_map(|ch| glyph_ids.get(&ch).map(|gid| (ch, GlyphId(*gid))))
        .collect();

    for subtable in kern.subtables {
        if !subtable.horizontal || subtable.variable || subtable.has_cross_stream {
            continue;
        }
        for (left_ch, left) in &latin {
            for (right_ch, right) in &latin {
                if let Some(value) = subtable.glyphs_kerning(*left, *right) {
                    if value != 0 {
                        pairs
                            .entry((*left_ch, *right_ch))
                            .or_insert(value as f32 * scale);
                    }
                }
            }
        }
    }
    pairs
}

fn read_descriptor(face: &Face<'_>, scale: f32, missing_width: f32) -> FontDescriptor {
    let ascent = face.ascender() as f32 * scale;
    let descent = face.descender() as f32 * scale;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 * scale)
        .unwrap_or(ascent * 0.7);
    let bbox = face.global_bounding_box();
    let italic_angle = face.italic_angle();

    // Nonsymbolic, plus fixed-pitch and italic bits where they apply.
    let mut flags = 32;
    if face.is_monospaced() {
        flags |= 1;
    }
    if face.is_italic() || italic_angle != 0.0 {
        flags |= 64;
    }

    let (underline_position, underline_thickness) = face
        .underline_metrics()
        .map(|m| (m.position as f32 * scale, m.thickness as f32 * scale))
        .unwrap_or((-100.0, 50.0));

    FontDescriptor {
        ascent,
        descent,
        cap_height,
        italic_angle,
        stem_v: if face.is_bold() { 120.0 } else { 80.0 },
        bbox: [
            bbox.x_min as f32 * scale,
            bbox.y_min as f32 * scale,
            bbox.x_max as f32 * scale,
            bbox.y_max as f32 * scale,
        ],
        flags,
        missing_width,
        underline_position,
        underline_thickness,
    }
}

fn read_postscript_name(face: &Face<'_>) -> String {
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
    };
    let name = lookup(name_id::POST_SCRIPT_NAME)
        .or_else(|| lookup(name_id::FULL_NAME))
        .or_else(|| lookup(name_id::FAMILY));

    match name {
        Some(name) => name
            .chars()
            .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%#".contains(*c))
            .collect(),
        None => {
            log::warn!("Font has no usable name record, using a generic BaseFont name");
            "EmbeddedFont".to_string()
        }
    }
}

impl FontMetrics for TrueTypeMetrics {
    fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    fn glyph_width(&self, ch: char) -> f32 {
        self.advance(self.glyph_ids.get(&ch).copied().unwrap_or(0))
    }

    fn kerning(&self, left: char, right: char) -> f32 {
        self.kern_pairs.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn has_kerning(&self) -> bool {
        !self.kern_pairs.is_empty()
    }

    fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        Some(self.glyph_ids.get(&ch).copied().unwrap_or(0))
    }

    fn font_program(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}
