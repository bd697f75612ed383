//! The document model and every building operation.
//!
//! A [`Document`] is built page by page. Each page keeps its own cursor, so
//! switching the active page never disturbs another page's position. Fonts,
//! colors and line width are document state that carries over to new pages.
//! [`Document::finish`] runs the last footer, resolves links and hands back
//! an immutable [`FinishedDocument`].

use crate::config::DocumentConfig;
use crate::content::{
    Align, Border, CellFlow, CellLink, CellOptions, ColorRole, ContentOperator, PaintStyle, TextRun, VAlign,
};
use crate::error::{Error, Result};
use crate::geometry::{Cursor, PageGeometry};
use crate::links::{LinkAnnotation, LinkResolver};
use crate::resources::{FontStyle, ResourceManager};
use folio_images::RasterDecoder;
use folio_traits::{ImageDecoder, SharedFontMetrics};
use folio_types::{AnchorName, Color, FontId, ImageId, Margins, Point, Rect, Size};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Line width of a fresh document (0.2 mm).
pub const DEFAULT_LINE_WIDTH: f32 = 0.567;

/// Resolution assumed for images placed without an explicit size.
const DEFAULT_IMAGE_DPI: f32 = 96.0;

/// A header or footer callback.
pub type Hook = Box<dyn FnMut(&mut Document) -> Result<()> + Send>;

#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    geometry: PageGeometry,
    cursor: Cursor,
    operators: Vec<ContentOperator>,
}

impl Page {
    /// 1-based, assigned in creation order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Size {
        self.geometry.size()
    }

    pub fn margins(&self) -> Margins {
        self.geometry.margins()
    }

    pub fn cursor(&self) -> Point {
        self.cursor.position()
    }

    pub fn operators(&self) -> &[ContentOperator] {
        &self.operators
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    font: FontId,
    font_size: f32,
    underline: bool,
    draw_color: Color,
    fill_color: Color,
    text_color: Color,
    line_width: f32,
}

#[derive(Clone, Copy)]
enum HookKind {
    Header,
    Footer,
}

pub struct Document {
    metadata: Metadata,
    compress: bool,
    strict_links: bool,
    default_geometry: PageGeometry,
    pages: Vec<Page>,
    active: usize,
    resources: ResourceManager,
    links: LinkResolver,
    state: GraphicsState,
    header: Option<Hook>,
    footer: Option<Hook>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("metadata", &self.metadata)
            .field("pages", &self.pages.len())
            .field("active", &self.page_no())
            .field("fonts", &self.resources.fonts().len())
            .field("images", &self.resources.images().len())
            .field("has_header", &self.header.is_some())
            .field("has_footer", &self.footer.is_some())
            .finish()
    }
}

impl Document {
    /// Creates an empty document using the built-in image decoder.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        Self::with_decoder(config, Arc::new(RasterDecoder::new()))
    }

    pub fn with_decoder(config: DocumentConfig, decoder: Arc<dyn ImageDecoder>) -> Result<Self> {
        let default_geometry = PageGeometry::new(config.page_size(), config.margins)?;

        let mut resources = ResourceManager::new(decoder);
        let style = FontStyle::parse(&config.font.style);
        let font = resources.resolve_font(&config.font.family, style)?;

        let colors = &config.colors;
        let state = GraphicsState {
            font,
            font_size: config.font.size,
            underline: style.underline,
            draw_color: colors.draw.unwrap_or(Color::BLACK),
            fill_color: colors.fill.unwrap_or(Color::BLACK),
            text_color: colors.text.unwrap_or(Color::BLACK),
            line_width: DEFAULT_LINE_WIDTH,
        };

        Ok(Self {
            metadata: Metadata {
                title: config.title,
                subject: config.subject,
                author: config.author,
                creator: config.creator,
                keywords: config.keywords,
            },
            compress: config.compress,
            strict_links: config.strict_links,
            default_geometry,
            pages: Vec::new(),
            active: 0,
            resources,
            links: LinkResolver::new(),
            state,
            header: None,
            footer: None,
        })
    }

    pub fn set_header(&mut self, hook: Option<Hook>) {
        self.header = hook;
    }

    pub fn set_footer(&mut self, hook: Option<Hook>) {
        self.footer = hook;
    }

    // ----- metadata -----

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = title.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = subject.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = author.into();
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = creator.into();
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = keywords.into();
    }

    // ----- pages -----

    /// Starts a new page with the document's default size and returns its index.
    pub fn add_page(&mut self) -> Result<usize> {
        self.add_page_with_size(self.default_geometry.size())
    }

    /// Starts a new page of `size`. The footer runs on the previous last page
    /// first, the header on the new page afterwards.
    pub fn add_page_with_size(&mut self, size: Size) -> Result<usize> {
        let geometry = PageGeometry::new(size, self.default_geometry.margins())?;
        let saved = self.state.clone();

        if !self.pages.is_empty() {
            self.active = self.pages.len() - 1;
            self.run_hook(HookKind::Footer)?;
        }

        let index = self.pages.len() + 1;
        self.pages.push(Page {
            index,
            geometry,
            cursor: Cursor::new(&geometry),
            operators: Vec::new(),
        });
        self.active = index - 1;
        self.state = saved.clone();
        self.emit_page_state();
        log::debug!("Started page {} ({}x{})", index, size.width, size.height);

        self.run_hook(HookKind::Header)?;
        // The body continues with the font and colors selected before the
        // page break, whatever the hooks changed.
        self.restore_state(saved);
        Ok(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the active page, or 0 before the first page exists.
    pub fn page_no(&self) -> usize {
        if self.pages.is_empty() { 0 } else { self.active + 1 }
    }

    pub fn set_active_page(&mut self, index: usize) -> Result<()> {
        if index == 0 || index > self.pages.len() {
            return Err(Error::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.active = index - 1;
        Ok(())
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        index.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn ensure_page(&mut self) -> Result<()> {
        if self.pages.is_empty() {
            log::debug!("No page yet, starting the first one");
            self.add_page()?;
        }
        Ok(())
    }

    fn active_page(&self) -> Option<&Page> {
        self.pages.get(self.active)
    }

    fn active_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.active)
    }

    fn push(&mut self, operator: ContentOperator) {
        if let Some(page) = self.active_page_mut() {
            page.operators.push(operator);
        }
    }

    /// Re-emits the line width and any non-black colors at the top of a page.
    fn emit_page_state(&mut self) {
        let state = self.state.clone();
        self.push(ContentOperator::SetLineWidth(state.line_width));
        for (role, color) in [
            (ColorRole::Draw, state.draw_color),
            (ColorRole::Fill, state.fill_color),
            (ColorRole::Text, state.text_color),
        ] {
            if color != Color::BLACK {
                self.push(ContentOperator::SetColor { role, color });
            }
        }
    }

    /// Emits whatever is needed to get back to `saved`, then adopts it.
    fn restore_state(&mut self, saved: GraphicsState) {
        if self.state.line_width != saved.line_width {
            self.push(ContentOperator::SetLineWidth(saved.line_width));
        }
        for (role, current, wanted) in [
            (ColorRole::Draw, self.state.draw_color, saved.draw_color),
            (ColorRole::Fill, self.state.fill_color, saved.fill_color),
            (ColorRole::Text, self.state.text_color, saved.text_color),
        ] {
            if current != wanted {
                self.push(ContentOperator::SetColor { role, color: wanted });
            }
        }
        self.state = saved;
    }

    fn run_hook(&mut self, kind: HookKind) -> Result<()> {
        let hook = match kind {
            HookKind::Header => self.header.take(),
            HookKind::Footer => self.footer.take(),
        };
        let Some(mut hook) = hook else {
            return Ok(());
        };

        let page = self.page_no();
        let result = hook(self);
        match kind {
            HookKind::Header => self.header = Some(hook),
            HookKind::Footer => self.footer = Some(hook),
        }
        result.map_err(|source| Error::Hook {
            page,
            source: Box::new(source),
        })
    }

    // ----- geometry -----

    fn geometry(&self) -> PageGeometry {
        self.active_page().map_or(self.default_geometry, |page| page.geometry)
    }

    fn cursor(&self) -> Cursor {
        match self.active_page() {
            Some(page) => page.cursor,
            None => Cursor::new(&self.geometry()),
        }
    }

    fn with_cursor(&mut self, update: impl FnOnce(&mut Cursor, &PageGeometry)) {
        let geometry = self.geometry();
        if let Some(page) = self.active_page_mut() {
            update(&mut page.cursor, &geometry);
        }
    }

    pub fn get_x(&self) -> f32 {
        self.cursor().x()
    }

    pub fn get_y(&self) -> f32 {
        self.cursor().y()
    }

    pub fn get_xy(&self) -> Point {
        self.cursor().position()
    }

    /// Negative values are measured from the right page edge.
    pub fn set_x(&mut self, x: f32) -> Result<()> {
        self.ensure_page()?;
        self.with_cursor(|cursor, geometry| cursor.set_x(x, geometry));
        Ok(())
    }

    /// Negative values are measured from the bottom page edge. Also resets x
    /// to the left margin.
    pub fn set_y(&mut self, y: f32) -> Result<()> {
        self.ensure_page()?;
        self.with_cursor(|cursor, geometry| cursor.set_y(y, geometry));
        Ok(())
    }

    pub fn set_xy(&mut self, x: f32, y: f32) -> Result<()> {
        self.ensure_page()?;
        self.with_cursor(|cursor, geometry| cursor.set_xy(x, y, geometry));
        Ok(())
    }

    /// Moves to the left margin, `height` points down. A negative height
    /// reuses the height of the last line written.
    pub fn line_break(&mut self, height: f32) -> Result<()> {
        self.ensure_page()?;
        self.with_cursor(|cursor, geometry| cursor.line_break(height, geometry));
        Ok(())
    }

    /// Size of the active page (the default size before the first page).
    pub fn page_size(&self) -> Size {
        self.geometry().size()
    }

    pub fn margins(&self) -> Margins {
        self.geometry().margins()
    }

    /// Sets the margins of the active page and of every page created later.
    /// Invalid margins are rejected and nothing changes.
    pub fn set_margins(&mut self, margins: Margins) -> Result<()> {
        let mut default_geometry = self.default_geometry;
        default_geometry.set_margins(margins)?;
        if let Some(page) = self.active_page_mut() {
            page.geometry.set_margins(margins)?;
        }
        self.default_geometry = default_geometry;
        Ok(())
    }

    pub fn set_left_margin(&mut self, margin: f32) -> Result<()> {
        self.set_margins(Margins { left: margin, ..self.margins() })
    }

    pub fn set_top_margin(&mut self, margin: f32) -> Result<()> {
        self.set_margins(Margins { top: margin, ..self.margins() })
    }

    pub fn set_right_margin(&mut self, margin: f32) -> Result<()> {
        self.set_margins(Margins { right: margin, ..self.margins() })
    }

    pub fn set_bottom_margin(&mut self, margin: f32) -> Result<()> {
        self.set_margins(Margins { bottom: margin, ..self.margins() })
    }

    // ----- fonts and measuring -----

    /// Registers a TrueType font under `family` and `style` (`B`, `I`).
    pub fn register_font(&mut self, family: &str, style: &str, data: Vec<u8>) -> Result<FontId> {
        self.resources.register_font(family, FontStyle::parse(style), data)
    }

    /// Selects a font. Unregistered Helvetica/Arial, Times and Courier
    /// families are registered on first use. `U` in `style` underlines.
    pub fn set_font(&mut self, family: &str, style: &str, size: f32) -> Result<()> {
        let style = FontStyle::parse(style);
        self.state.font = self.resources.resolve_font(family, style)?;
        self.state.underline = style.underline;
        if size > 0.0 {
            self.state.font_size = size;
        }
        Ok(())
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    pub fn font_size(&self) -> f32 {
        self.state.font_size
    }

    pub fn current_font(&self) -> FontId {
        self.state.font
    }

    fn metrics(&self) -> Result<SharedFontMetrics> {
        self.resources
            .font(self.state.font)
            .map(|font| font.metrics.clone())
            .ok_or_else(|| Error::FontNotFound {
                family: self.state.font.to_string(),
                style: String::new(),
            })
    }

    /// Width of `text` in points with the current font and size.
    pub fn measure_text_width(&self, text: &str) -> f32 {
        self.metrics()
            .map(|m| m.text_width(text, self.state.font_size))
            .unwrap_or(0.0)
    }

    /// Splits `text` into lines that fit in `width` points.
    pub fn split_text(&self, text: &str, width: f32) -> Vec<String> {
        match self.metrics() {
            Ok(metrics) => folio_fonts::split_lines(metrics.as_ref(), text, self.state.font_size, width),
            Err(_) => text.split('\n').map(str::to_string).collect(),
        }
    }

    // ----- colors and lines -----

    fn set_color(&mut self, role: ColorRole, color: Color) {
        match role {
            ColorRole::Draw => self.state.draw_color = color,
            ColorRole::Fill => self.state.fill_color = color,
            ColorRole::Text => self.state.text_color = color,
        }
        self.push(ContentOperator::SetColor { role, color });
    }

    pub fn set_draw_color(&mut self, color: impl Into<Color>) {
        self.set_color(ColorRole::Draw, color.into());
    }

    pub fn set_fill_color(&mut self, color: impl Into<Color>) {
        self.set_color(ColorRole::Fill, color.into());
    }

    pub fn set_text_color(&mut self, color: impl Into<Color>) {
        self.set_color(ColorRole::Text, color.into());
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
        self.push(ContentOperator::SetLineWidth(width));
    }

    /// Strokes a straight line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.ensure_page()?;
        self.push_line(Point::new(x1, y1), Point::new(x2, y2));
        Ok(())
    }

    fn push_line(&mut self, from: Point, to: Point) {
        self.push(ContentOperator::MoveTo(from));
        self.push(ContentOperator::LineTo(to));
        self.push(ContentOperator::DrawPath(PaintStyle::Stroke));
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: PaintStyle) -> Result<()> {
        self.ensure_page()?;
        self.push_rect(Rect::new(x, y, width, height), style);
        Ok(())
    }

    fn push_rect(&mut self, rect: Rect, style: PaintStyle) {
        let style = match style {
            PaintStyle::Stroke => PaintStyle::CloseStroke,
            PaintStyle::FillStroke => PaintStyle::CloseFillStroke,
            other => other,
        };
        self.push(ContentOperator::MoveTo(rect.origin()));
        self.push(ContentOperator::LineTo(Point::new(rect.right(), rect.y)));
        self.push(ContentOperator::LineTo(Point::new(rect.right(), rect.bottom())));
        self.push(ContentOperator::LineTo(Point::new(rect.x, rect.bottom())));
        self.push(ContentOperator::DrawPath(style));
    }

    // ----- text -----

    fn text_run(&self, metrics: &SharedFontMetrics, origin: Point, line_height: f32, text: &str) -> TextRun {
        TextRun {
            origin,
            line_height,
            font: self.state.font,
            size: self.state.font_size,
            text: text.to_string(),
            width: metrics.text_width(text, self.state.font_size),
            underline: self.state.underline,
        }
    }

    /// Writes `text` at the cursor on a line `line_height` tall and moves the
    /// cursor past it. Text is never wrapped; `\n` starts a new line.
    pub fn write_text(&mut self, line_height: f32, text: &str) -> Result<()> {
        self.ensure_page()?;
        let metrics = self.metrics()?;
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.with_cursor(|cursor, geometry| cursor.line_break(line_height, geometry));
            }
            if !segment.is_empty() {
                let run = self.text_run(&metrics, self.get_xy(), line_height, segment);
                let width = run.width;
                self.push(ContentOperator::Text(run));
                self.with_cursor(|cursor, _| cursor.advance(width));
            }
            self.with_cursor(|cursor, _| cursor.record_line_height(line_height));
        }
        Ok(())
    }

    /// Draws a cell and moves the cursor as `options.flow` says.
    pub fn cell(&mut self, options: CellOptions) -> Result<()> {
        self.ensure_page()?;
        let metrics = self.metrics()?;
        let geometry = self.geometry();
        let Point { x, y } = self.get_xy();
        let width = if options.width == 0.0 {
            geometry.right_edge() - x
        } else {
            options.width
        };
        let height = options.height;
        let size = self.state.font_size;
        let border = options.border;

        if options.fill || border.is_all() {
            let style = match (options.fill, border.is_all()) {
                (true, true) => PaintStyle::FillStroke,
                (true, false) => PaintStyle::Fill,
                _ => PaintStyle::Stroke,
            };
            self.push_rect(Rect::new(x, y, width, height), style);
        }
        if !border.is_all() && border != Border::NONE {
            let (left, right, top, bottom) = (x, x + width, y, y + height);
            if border.left {
                self.push_line(Point::new(left, top), Point::new(left, bottom));
            }
            if border.top {
                self.push_line(Point::new(left, top), Point::new(right, top));
            }
            if border.right {
                self.push_line(Point::new(right, top), Point::new(right, bottom));
            }
            if border.bottom {
                self.push_line(Point::new(left, bottom), Point::new(right, bottom));
            }
        }

        if !options.text.is_empty() {
            let text_width = metrics.text_width(&options.text, size);
            let dx = match options.align {
                Align::Left => 0.0,
                Align::Center => (width - text_width) / 2.0,
                Align::Right => width - text_width,
            };
            let dy = match options.valign {
                VAlign::Top => (size - height) / 2.0,
                VAlign::Middle => 0.0,
                VAlign::Bottom => (height - size) / 2.0,
            };
            let run = self.text_run(&metrics, Point::new(x + dx, y + dy), height, &options.text);

            if let Some(link) = options.link {
                let hit = Rect::new(x + dx, y + dy + 0.5 * height - 0.5 * size, text_width, size);
                let page = self.page_no();
                match link {
                    CellLink::Anchor(anchor) => self.links.record_internal_link(anchor, page, hit),
                    CellLink::Uri(uri) => self.links.record_external_link(uri, page, hit),
                }
            }
            self.push(ContentOperator::Text(run));
        }

        self.with_cursor(|cursor, geometry| {
            cursor.record_line_height(height);
            match options.flow {
                CellFlow::Right => cursor.advance(width),
                CellFlow::NextLine => cursor.line_break(height, geometry),
                CellFlow::Below => cursor.advance_down(height),
            }
        });
        Ok(())
    }

    // ----- links -----

    /// Defines `name` at the active page and the cursor's y.
    pub fn define_anchor(&mut self, name: impl Into<AnchorName>) -> Result<()> {
        self.ensure_page()?;
        let (page, y) = (self.page_no(), self.get_y());
        self.links.define_anchor(name, page, y);
        Ok(())
    }

    /// Writes `text` and links it to `anchor`, which may be defined later.
    pub fn write_internal_link(&mut self, line_height: f32, text: &str, anchor: impl Into<AnchorName>) -> Result<()> {
        self.ensure_page()?;
        let rect = Rect::new(self.get_x(), self.get_y(), self.measure_text_width(text), line_height);
        let page = self.page_no();
        self.links.record_internal_link(anchor, page, rect);
        self.write_text(line_height, text)
    }

    pub fn write_external_link(&mut self, line_height: f32, text: &str, uri: impl Into<String>) -> Result<()> {
        self.ensure_page()?;
        let rect = Rect::new(self.get_x(), self.get_y(), self.measure_text_width(text), line_height);
        let page = self.page_no();
        self.links.record_external_link(uri, page, rect);
        self.write_text(line_height, text)
    }

    pub fn links(&self) -> &LinkResolver {
        &self.links
    }

    // ----- images -----

    /// Registers image bytes under `name`. Re-registering a name replaces the
    /// bytes but keeps the id.
    pub fn register_image(&mut self, name: &str, format: &str, bytes: &[u8]) -> Result<ImageId> {
        self.resources.register_image(name, format, bytes)
    }

    /// Places a registered image in flow mode: its top edge sits at the
    /// cursor y (the `y` argument is ignored) and the cursor then moves down
    /// by the image height. A negative `x` means the cursor x.
    ///
    /// A zero `width` or `height` is derived from the image's aspect ratio;
    /// both zero places it at 96 dpi. Negative sizes give the resolution in
    /// dpi.
    pub fn use_image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.place_image(name, x, y, width, height, true)
    }

    /// Places a registered image with its top-left corner at (`x`, `y`).
    ///
    /// With `flow` set this behaves like [`Document::use_image`]. Without it
    /// the image goes exactly at (`x`, `y`), negative coordinates mean the
    /// cursor position and the cursor does not move.
    pub fn place_image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32, flow: bool) -> Result<()> {
        self.ensure_page()?;
        let resource = self
            .resources
            .find_image(name)
            .and_then(|id| self.resources.image(id))
            .ok_or_else(|| Error::ImageNotFound(name.to_string()))?;
        let id = resource.id;
        let (pixels_w, pixels_h) = resource.pixel_size();
        let (width, height) = image_box(pixels_w, pixels_h, width, height);

        let cursor = self.get_xy();
        let x = if x < 0.0 { cursor.x } else { x };
        let y = if flow || y < 0.0 { cursor.y } else { y };
        self.push(ContentOperator::UseImage {
            image: id,
            rect: Rect::new(x, y, width, height),
        });
        if flow {
            self.with_cursor(|cursor, _| cursor.advance_down(height));
        }
        Ok(())
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    // ----- output -----

    /// Closes the document: runs the footer on the last page and resolves
    /// links. A document with no pages gets one blank page.
    pub fn finish(mut self) -> Result<FinishedDocument> {
        self.ensure_page()?;
        self.active = self.pages.len() - 1;
        self.run_hook(HookKind::Footer)?;

        let annotations = if self.strict_links {
            self.links.resolve_strict()?
        } else {
            self.links.resolve()
        };
        log::debug!(
            "Finished document: {} pages, {} links",
            self.pages.len(),
            annotations.len()
        );

        Ok(FinishedDocument {
            metadata: self.metadata,
            compress: self.compress,
            pages: self.pages,
            resources: self.resources,
            annotations,
        })
    }

    /// Finishes the document and serializes it into `sink`.
    pub fn write_to<W: Write>(self, sink: W) -> Result<W> {
        self.finish()?.serialize(sink)
    }
}

/// Target size in points for an image of `pixels_w` x `pixels_h`.
fn image_box(pixels_w: u32, pixels_h: u32, width: f32, height: f32) -> (f32, f32) {
    let (pw, ph) = (pixels_w.max(1) as f32, pixels_h.max(1) as f32);
    let (mut width, mut height) = if width == 0.0 && height == 0.0 {
        (-DEFAULT_IMAGE_DPI, -DEFAULT_IMAGE_DPI)
    } else {
        (width, height)
    };
    if width < 0.0 {
        width = pw * 72.0 / -width;
    }
    if height < 0.0 {
        height = ph * 72.0 / -height;
    }
    if width == 0.0 {
        width = height * pw / ph;
    }
    if height == 0.0 {
        height = width * ph / pw;
    }
    (width, height)
}

/// A document that can only be serialized.
#[derive(Debug)]
pub struct FinishedDocument {
    pub(crate) metadata: Metadata,
    pub(crate) compress: bool,
    pub(crate) pages: Vec<Page>,
    pub(crate) resources: ResourceManager,
    pub(crate) annotations: Vec<LinkAnnotation>,
}

impl FinishedDocument {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn annotations(&self) -> &[LinkAnnotation] {
        &self.annotations
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }
}
