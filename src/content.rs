//! Content operators recorded per page, and the options of the cell primitive.
//!
//! Operators are kept in page-local coordinates and in call order; the
//! serializer turns them into a PDF content stream.

use folio_types::{AnchorName, Color, FontId, ImageId, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Stroking color for lines and borders.
    Draw,
    /// Non-stroking color for filled shapes.
    Fill,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Stroke,
    CloseStroke,
    Fill,
    FillStroke,
    CloseFillStroke,
}

impl PaintStyle {
    /// Accepts the usual shorthand: `D`/`S` stroke, `F` fill, `DF`/`FD`/`B`
    /// fill and stroke. Anything else strokes.
    pub fn parse(style: &str) -> Self {
        match style.trim().to_ascii_uppercase().as_str() {
            "F" => PaintStyle::Fill,
            "DF" | "FD" | "B" => PaintStyle::FillStroke,
            "S" | "D" | "" => PaintStyle::Stroke,
            other => {
                log::debug!("Unknown paint style '{}', stroking", other);
                PaintStyle::Stroke
            }
        }
    }

    /// The path-painting operator.
    pub fn operator(self) -> &'static str {
        match self {
            PaintStyle::Stroke => "S",
            PaintStyle::CloseStroke => "s",
            PaintStyle::Fill => "f",
            PaintStyle::FillStroke => "B",
            PaintStyle::CloseFillStroke => "b",
        }
    }
}

/// One line of text. `origin` is the top-left of the line box; the
/// baseline is centred in `line_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub origin: Point,
    pub line_height: f32,
    pub font: FontId,
    pub size: f32,
    pub text: String,
    pub width: f32,
    pub underline: bool,
}

impl TextRun {
    /// Baseline y in page-local coordinates.
    pub fn baseline(&self) -> f32 {
        self.origin.y + 0.5 * self.line_height + 0.3 * self.size
    }

    /// The box covered by the glyphs, used for link hit areas.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.width, self.line_height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentOperator {
    MoveTo(Point),
    LineTo(Point),
    DrawPath(PaintStyle),
    Text(TextRun),
    SetColor { role: ColorRole, color: Color },
    SetLineWidth(f32),
    UseImage { image: ImageId, rect: Rect },
}

/// Which sides of a cell get a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Border {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Border {
    pub const NONE: Border = Border { left: false, top: false, right: false, bottom: false };
    pub const ALL: Border = Border { left: true, top: true, right: true, bottom: true };

    /// `"1"` for all sides, otherwise any combination of `L`, `T`, `R`, `B`.
    pub fn parse(spec: &str) -> Self {
        if spec.trim() == "1" {
            return Border::ALL;
        }
        let spec = spec.to_ascii_uppercase();
        Border {
            left: spec.contains('L'),
            top: spec.contains('T'),
            right: spec.contains('R'),
            bottom: spec.contains('B'),
        }
    }

    pub fn is_all(&self) -> bool {
        *self == Border::ALL
    }

    pub fn is_none(&self) -> bool {
        *self == Border::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFlow {
    /// To the right of the cell, same line.
    #[default]
    Right,
    /// To the left margin of the next line.
    NextLine,
    /// Below the cell, keeping x.
    Below,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellLink {
    Anchor(AnchorName),
    Uri(String),
}

/// A fixed-size box with optional text, borders, fill and link.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellOptions {
    /// Zero extends the cell to the right margin.
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub border: Border,
    pub align: Align,
    pub valign: VAlign,
    pub fill: bool,
    pub link: Option<CellLink>,
    pub flow: CellFlow,
}

impl CellOptions {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn link_anchor(mut self, anchor: impl Into<AnchorName>) -> Self {
        self.link = Some(CellLink::Anchor(anchor.into()));
        self
    }

    pub fn link_uri(mut self, uri: impl Into<String>) -> Self {
        self.link = Some(CellLink::Uri(uri.into()));
        self
    }

    pub fn flow(mut self, flow: CellFlow) -> Self {
        self.flow = flow;
        self
    }
}
