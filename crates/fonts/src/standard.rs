//! Metrics for the PDF base fonts.
//!
//! Widths for the printable ASCII range come from the Adobe AFM files. Other
//! WinAnsi characters fall back to the width of their base letter (via
//! canonical decomposition) or to a per-family table of typographic symbols.

use crate::encoding;
use folio_traits::{FontDescriptor, FontError, FontMetrics};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// Resolves a family name (`Helvetica`/`Arial`, `Times`, `Courier`) and
    /// style to a base font.
    pub fn from_family(family: &str, bold: bool, italic: bool) -> Result<Self, FontError> {
        let normalized: String = family
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect::<String>()
            .to_lowercase();

        use StandardFont::*;
        let font = match (normalized.as_str(), bold, italic) {
            ("helvetica" | "arial", false, false) => Helvetica,
            ("helvetica" | "arial", true, false) => HelveticaBold,
            ("helvetica" | "arial", false, true) => HelveticaOblique,
            ("helvetica" | "arial", true, true) => HelveticaBoldOblique,
            ("times" | "timesroman" | "timesnewroman", false, false) => TimesRoman,
            ("times" | "timesroman" | "timesnewroman", true, false) => TimesBold,
            ("times" | "timesroman" | "timesnewroman", false, true) => TimesItalic,
            ("times" | "timesroman" | "timesnewroman", true, true) => TimesBoldItalic,
            ("courier" | "couriernew", false, false) => Courier,
            ("courier" | "couriernew", true, false) => CourierBold,
            ("courier" | "couriernew", false, true) => CourierOblique,
            ("courier" | "couriernew", true, true) => CourierBoldOblique,
            _ => return Err(FontError::NotStandard(family.to_string())),
        };
        Ok(font)
    }

    pub fn postscript_name(self) -> &'static str {
        use StandardFont::*;
        match self {
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Courier => "Courier",
            CourierBold => "Courier-Bold",
            CourierOblique => "Courier-Oblique",
            CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn ascii_widths(self) -> Option<&'static [u16; 95]> {
        use StandardFont::*;
        match self {
            Helvetica | HelveticaOblique => Some(&HELVETICA),
            HelveticaBold | HelveticaBoldOblique => Some(&HELVETICA_BOLD),
            TimesRoman => Some(&TIMES_ROMAN),
            TimesBold => Some(&TIMES_BOLD),
            TimesItalic => Some(&TIMES_ITALIC),
            TimesBoldItalic => Some(&TIMES_BOLD_ITALIC),
            Courier | CourierBold | CourierOblique | CourierBoldOblique => None,
        }
    }

    /// Widths of the WinAnsi symbols, which differ between families.
    fn symbol_width(self, ch: char) -> Option<f32> {
        use StandardFont::*;
        match self {
            TimesRoman | TimesBold | TimesItalic | TimesBoldItalic => times_symbol_width(ch),
            Courier | CourierBold | CourierOblique | CourierBoldOblique => Some(600.0),
            _ => helvetica_symbol_width(ch),
        }
    }

    fn descriptor(self) -> FontDescriptor {
        use StandardFont::*;
        let (ascent, descent, cap_height, italic_angle, bbox) = match self {
            Helvetica => (718.0, -207.0, 718.0, 0.0, [-166.0, -225.0, 1000.0, 931.0]),
            HelveticaBold => (718.0, -207.0, 718.0, 0.0, [-170.0, -228.0, 1003.0, 962.0]),
            HelveticaOblique => (718.0, -207.0, 718.0, -12.0, [-170.0, -225.0, 1116.0, 931.0]),
            HelveticaBoldOblique => (718.0, -207.0, 718.0, -12.0, [-174.0, -228.0, 1114.0, 962.0]),
            TimesRoman => (683.0, -217.0, 662.0, 0.0, [-168.0, -218.0, 1000.0, 898.0]),
            TimesBold => (683.0, -217.0, 676.0, 0.0, [-168.0, -218.0, 1000.0, 935.0]),
            TimesItalic => (683.0, -217.0, 653.0, -15.5, [-169.0, -217.0, 1010.0, 883.0]),
            TimesBoldItalic => (683.0, -217.0, 669.0, -15.0, [-200.0, -218.0, 996.0, 921.0]),
            Courier | CourierBold => (629.0, -157.0, 562.0, 0.0, [-23.0, -250.0, 715.0, 805.0]),
            CourierOblique | CourierBoldOblique => {
                (629.0, -157.0, 562.0, -12.0, [-27.0, -250.0, 849.0, 805.0])
            }
        };
        FontDescriptor {
            ascent,
            descent,
            cap_height,
            italic_angle,
            bbox,
            ..FontDescriptor::default()
        }
    }
}

/// Metrics for one of the base fonts. No font program is embedded.
#[derive(Debug, Clone)]
pub struct StandardMetrics {
    font: StandardFont,
    descriptor: FontDescriptor,
}

impl StandardMetrics {
    pub fn new(font: StandardFont) -> Self {
        Self {
            font,
            descriptor: font.descriptor(),
        }
    }

    pub fn font(&self) -> StandardFont {
        self.font
    }

    fn ascii_width(&self, ch: char) -> Option<f32> {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return None;
        }
        Some(match self.font.ascii_widths() {
            Some(table) => table[(code - 32) as usize] as f32,
            None => 600.0,
        })
    }
}

impl FontMetrics for StandardMetrics {
    fn postscript_name(&self) -> &str {
        self.font.postscript_name()
    }

    fn glyph_width(&self, ch: char) -> f32 {
        let ch = encoding::normalize(ch);
        if let Some(width) = self.ascii_width(ch) {
            return width;
        }
        if self.font.ascii_widths().is_none() {
            return 600.0;
        }
        if ch == '\u{A0}' {
            return self.glyph_width(' ');
        }
        if let Some(width) = self.font.symbol_width(ch) {
            return width;
        }
        // Accented letters take the width of their base letter.
        ch.nfd()
            .next()
            .and_then(|base| self.ascii_width(base))
            .unwrap_or(self.descriptor.missing_width.max(500.0))
    }

    fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }
}

fn helvetica_symbol_width(ch: char) -> Option<f32> {
    let width = match ch {
        '¡' | '¨' | '´' | '¯' | '¸' | '²' | '³' | '¹' | '\u{AD}' | 'ˆ' | '˜' | '‹' | '›' => 333.0,
        '¢' | '£' | '¤' | '¥' | '§' | 'µ' | '€' | 'ƒ' | '†' | '‡' | 'ð' | 'þ' | '–' => 556.0,
        '«' | '»' => 556.0,
        '¦' => 260.0,
        '©' | '®' => 737.0,
        'ª' => 370.0,
        'º' => 365.0,
        '¬' | '±' | '×' | '÷' => 584.0,
        '°' => 400.0,
        '¶' => 537.0,
        '·' => 278.0,
        '¼' | '½' | '¾' => 834.0,
        '¿' | 'ß' | 'ø' => 611.0,
        'Æ' | '…' | '‰' | 'Œ' | '—' | '™' => 1000.0,
        'Ð' => 722.0,
        'Ø' => 778.0,
        'Þ' => 667.0,
        'æ' => 889.0,
        'œ' => 944.0,
        '‚' | '‘' | '’' => 222.0,
        '„' | '“' | '”' => 333.0,
        '•' => 350.0,
        _ => return None,
    };
    Some(width)
}

fn times_symbol_width(ch: char) -> Option<f32> {
    let width = match ch {
        '¡' | '¨' | '´' | '¯' | '¸' | '\u{AD}' | 'ˆ' | '˜' | '‹' | '›' | '‚' | '‘' | '’' => 333.0,
        '¢' | '£' | '¤' | '¥' | '§' | 'µ' | '€' | 'ƒ' | '†' | '‡' | 'ð' | 'þ' | '–' => 500.0,
        '«' | '»' | 'ß' | 'ø' => 500.0,
        '¦' => 200.0,
        '©' | '®' => 760.0,
        'ª' => 276.0,
        'º' => 310.0,
        '¬' | '±' | '×' | '÷' => 564.0,
        '°' => 400.0,
        '²' | '³' | '¹' => 300.0,
        '¶' => 453.0,
        '·' => 250.0,
        '¼' | '½' | '¾' => 750.0,
        '¿' => 444.0,
        'Æ' | 'Œ' => 889.0,
        '…' | '‰' | '—' => 1000.0,
        '™' => 980.0,
        'Ð' | 'Ø' => 722.0,
        'Þ' => 556.0,
        'æ' => 667.0,
        'œ' => 722.0,
        '„' | '“' | '”' => 444.0,
        '•' => 350.0,
        _ => return None,
    };
    Some(width)
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 832,
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889,
    722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611,
    333, 278, 333, 570, 500, 333,
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778,
    556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389,
    348, 220, 348, 570,
];
