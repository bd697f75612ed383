//! Page geometry and cursor tracking.
//!
//! Coordinates are page-local: the origin is the top-left corner, y grows
//! downward and the unit is the PDF point. Conversion to PDF user space
//! (origin bottom-left) happens only in the serializer.

use crate::error::{Error, Result};
use folio_types::{Margins, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    size: Size,
    margins: Margins,
}

impl PageGeometry {
    pub fn new(size: Size, margins: Margins) -> Result<Self> {
        validate_margins(size, &margins)?;
        Ok(Self { size, margins })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Replaces the margins, leaving them untouched if `margins` is invalid.
    pub fn set_margins(&mut self, margins: Margins) -> Result<()> {
        validate_margins(self.size, &margins)?;
        self.margins = margins;
        Ok(())
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.size.width - self.margins.left - self.margins.right
    }

    /// The x coordinate of the right margin.
    pub fn right_edge(&self) -> f32 {
        self.size.width - self.margins.right
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.margins.left, self.margins.top)
    }
}

pub fn validate_margins(size: Size, margins: &Margins) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidMargin {
        margins: *margins,
        page: size,
        reason: reason.to_string(),
    };

    let values = [margins.left, margins.top, margins.right, margins.bottom];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid("margins must be finite and non-negative"));
    }
    if margins.left + margins.right >= size.width {
        return Err(invalid("left + right must be less than the page width"));
    }
    if margins.top + margins.bottom >= size.height {
        return Err(invalid("top + bottom must be less than the page height"));
    }
    Ok(())
}

/// The write position on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    position: Point,
    last_line_height: f32,
}

impl Cursor {
    /// A cursor at the top-left corner of the content area.
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            position: geometry.top_left(),
            last_line_height: 0.0,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn last_line_height(&self) -> f32 {
        self.last_line_height
    }

    /// Negative values are measured from the right page edge.
    pub fn set_x(&mut self, x: f32, geometry: &PageGeometry) {
        self.position.x = if x >= 0.0 { x } else { geometry.width() + x };
    }

    /// Negative values are measured from the bottom page edge. Also moves x
    /// back to the left margin.
    pub fn set_y(&mut self, y: f32, geometry: &PageGeometry) {
        self.position.x = geometry.margins().left;
        self.position.y = if y >= 0.0 { y } else { geometry.height() + y };
    }

    pub fn set_xy(&mut self, x: f32, y: f32, geometry: &PageGeometry) {
        self.set_y(y, geometry);
        self.set_x(x, geometry);
    }

    /// Moves right by `dx` on the current line.
    pub fn advance(&mut self, dx: f32) {
        self.position.x += dx;
    }

    pub fn advance_down(&mut self, dy: f32) {
        self.position.y += dy;
    }

    pub fn record_line_height(&mut self, height: f32) {
        self.last_line_height = height;
    }

    /// Starts a new line `height` points below. A negative height reuses the
    /// height of the last line written.
    pub fn line_break(&mut self, height: f32, geometry: &PageGeometry) {
        let height = if height < 0.0 { self.last_line_height } else { height };
        self.position.x = geometry.margins().left;
        self.position.y += height;
    }
}
