//! Turns a [`FinishedDocument`] into PDF objects and writes them.
//!
//! Object numbers are assigned in a fixed order: catalog, page tree, info
//! dictionary, shared resources, then a page/content pair per page, link
//! annotations, fonts and images.
//!
//! Base fonts are simple WinAnsi fonts. Embedded TrueType programs become
//! `Type0` fonts with `Identity-H` encoding: text is written as big-endian
//! glyph ids, `/W` carries the widths of the glyphs actually used and a
//! `ToUnicode` CMap maps them back to text.

use crate::content::{ColorRole, ContentOperator, TextRun};
use crate::document::{FinishedDocument, Page};
use crate::error::Result;
use crate::links::{Destination, LinkAnnotation};
use crate::resources::{FontResource, ImageResource};
use folio_fonts::encode_win_ansi;
use folio_traits::{FontMetrics, ImageFilter};
use folio_types::{Color, FontId};
use folio_writer::{PdfObjects, Trailer, WriteError, deflate, write_pdf};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::io::Write;

impl FinishedDocument {
    /// Writes the complete file into `sink` and returns it. Serialization
    /// does not change the document, so a failed write can be retried into a
    /// fresh sink.
    pub fn serialize<W: Write>(&self, sink: W) -> Result<W> {
        let (objects, trailer) = build_objects(self)?;
        Ok(write_pdf(sink, &objects, trailer)?)
    }

    /// Serializes into a new byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.serialize(Vec::new())
    }
}

/// Rounds to four decimals. Integral values are written as integers.
fn real(value: f32) -> Object {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded.fract() == 0.0 && rounded.abs() < i32::MAX as f32 {
        Object::Integer(rounded as i64)
    } else {
        Object::Real(rounded)
    }
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// ASCII text as a literal string, anything else as UTF-16BE with a BOM.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn stream(dict: Dictionary, data: Vec<u8>, compress: bool) -> Result<Stream> {
    if !compress {
        return Ok(Stream::new(dict, data));
    }
    let mut dict = dict;
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, deflate(&data)?))
}

pub(crate) fn build_objects(doc: &FinishedDocument) -> Result<(PdfObjects, Trailer)> {
    let mut objects = PdfObjects::new();
    let catalog_id = objects.new_object_id();
    let pages_id = objects.new_object_id();
    let info_id = objects.new_object_id();
    let resources_id = objects.new_object_id();

    let page_ids: Vec<(ObjectId, ObjectId)> = doc
        .pages
        .iter()
        .map(|_| (objects.new_object_id(), objects.new_object_id()))
        .collect();
    let annotation_ids: Vec<ObjectId> = doc.annotations.iter().map(|_| objects.new_object_id()).collect();

    // Fonts and images
    let usage = glyph_usage(doc);
    let mut font_refs = Dictionary::new();
    for font in doc.resources.fonts() {
        let id = write_font(&mut objects, font, usage.get(&font.id), doc.compress)?;
        font_refs.set(font.id.resource_name(), id);
    }
    let mut image_refs = Dictionary::new();
    for image in doc.resources.images() {
        let id = write_image(&mut objects, image);
        image_refs.set(image.id.resource_name(), id);
    }

    let mut resources = dictionary! {
        "ProcSet" => vec![name("PDF"), name("Text"), name("ImageB"), name("ImageC")],
        "Font" => font_refs,
    };
    if !image_refs.is_empty() {
        resources.set("XObject", image_refs);
    }
    objects.insert(resources_id, resources);

    // Link annotations
    for (annotation, id) in doc.annotations.iter().zip(&annotation_ids) {
        let Some(page) = doc.pages.get(annotation.page - 1) else {
            continue;
        };
        objects.insert(*id, link_annotation(annotation, page, &doc.pages, &page_ids));
    }

    // Pages
    for (page, (page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        let content = page_content(page, doc).encode().map_err(WriteError::from)?;
        objects.insert(*content_id, stream(Dictionary::new(), content, doc.compress)?);

        let size = page.size();
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(size.width), real(size.height)],
            "Resources" => resources_id,
            "Contents" => *content_id,
        };
        let annots: Vec<Object> = doc
            .annotations
            .iter()
            .zip(&annotation_ids)
            .filter(|(annotation, _)| annotation.page == page.index())
            .map(|(_, id)| Object::Reference(*id))
            .collect();
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        objects.insert(*page_id, page_dict);
    }

    objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|(id, _)| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => doc.pages.len() as i64,
        },
    );
    objects.insert(catalog_id, dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    objects.insert(info_id, info_dictionary(doc));

    log::debug!(
        "Built {} objects for {} pages, {} fonts, {} images",
        objects.len(),
        doc.pages.len(),
        doc.resources.fonts().len(),
        doc.resources.images().len()
    );
    Ok((
        objects,
        Trailer {
            root: catalog_id,
            info: Some(info_id),
        },
    ))
}

fn info_dictionary(doc: &FinishedDocument) -> Dictionary {
    let meta = &doc.metadata;
    let mut info = Dictionary::new();
    for (key, value) in [
        ("Title", &meta.title),
        ("Subject", &meta.subject),
        ("Author", &meta.author),
        ("Creator", &meta.creator),
        ("Keywords", &meta.keywords),
    ] {
        if !value.is_empty() {
            info.set(key, text_string(value));
        }
    }
    info.set("Producer", text_string(concat!("folio ", env!("CARGO_PKG_VERSION"))));
    info
}

fn link_annotation(
    annotation: &LinkAnnotation,
    page: &Page,
    pages: &[Page],
    page_ids: &[(ObjectId, ObjectId)],
) -> Dictionary {
    let [llx, lly, urx, ury] = annotation.rect.to_pdf_box(page.size().height);
    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![real(llx), real(lly), real(urx), real(ury)],
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
    };
    match &annotation.destination {
        Destination::Page { page: target, y } => {
            if let (Some(target_page), Some((target_id, _))) = (pages.get(target - 1), page_ids.get(target - 1)) {
                let top = target_page.size().height - y;
                dict.set(
                    "Dest",
                    vec![Object::Reference(*target_id), name("XYZ"), 0.into(), real(top), Object::Null],
                );
            }
        }
        Destination::Uri(uri) => {
            dict.set(
                "A",
                dictionary! {
                    "S" => "URI",
                    "URI" => Object::String(uri.as_bytes().to_vec(), StringFormat::Literal),
                },
            );
        }
    }
    dict
}

fn rgb_operands(color: Color) -> Vec<Object> {
    color.to_unit().into_iter().map(real).collect()
}

fn page_content(page: &Page, doc: &FinishedDocument) -> Content {
    let height = page.size().height;
    let mut ops = Vec::with_capacity(page.operators().len() * 2);
    let mut text_color = Color::BLACK;

    for operator in page.operators() {
        match operator {
            ContentOperator::MoveTo(p) => ops.push(Operation::new("m", vec![real(p.x), real(height - p.y)])),
            ContentOperator::LineTo(p) => ops.push(Operation::new("l", vec![real(p.x), real(height - p.y)])),
            ContentOperator::DrawPath(style) => ops.push(Operation::new(style.operator(), vec![])),
            ContentOperator::SetLineWidth(w) => ops.push(Operation::new("w", vec![real(*w)])),
            ContentOperator::SetColor { role, color } => match role {
                ColorRole::Draw => ops.push(Operation::new("RG", rgb_operands(*color))),
                ColorRole::Fill => ops.push(Operation::new("rg", rgb_operands(*color))),
                ColorRole::Text => text_color = *color,
            },
            ContentOperator::Text(run) => match doc.resources.font(run.font) {
                Some(font) => text_operations(&mut ops, run, font, text_color, height),
                None => log::warn!("Skipping text on page {}: font {} is not registered", page.index(), run.font),
            },
            ContentOperator::UseImage { image, rect } => {
                if doc.resources.image(*image).is_none() {
                    log::warn!("Skipping image on page {}: {} is not registered", page.index(), image);
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(rect.width),
                        0.into(),
                        0.into(),
                        real(rect.height),
                        real(rect.x),
                        real(height - rect.bottom()),
                    ],
                ));
                ops.push(Operation::new("Do", vec![name(&image.resource_name())]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    Content { operations: ops }
}

fn text_operations(ops: &mut Vec<Operation>, run: &TextRun, font: &FontResource, color: Color, height: f32) {
    let metrics = font.metrics.as_ref();
    let baseline = height - run.baseline();

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("rg", rgb_operands(color)));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![name(&run.font.resource_name()), real(run.size)]));
    ops.push(Operation::new("Td", vec![real(run.origin.x), real(baseline)]));
    if metrics.has_kerning() {
        ops.push(Operation::new("TJ", vec![Object::Array(kerned_segments(metrics, &run.text))]));
    } else {
        ops.push(Operation::new("Tj", vec![encode_text(metrics, &run.text)]));
    }
    ops.push(Operation::new("ET", vec![]));

    if run.underline {
        let descriptor = metrics.descriptor();
        let top = baseline + descriptor.underline_position / 1000.0 * run.size;
        let thickness = descriptor.underline_thickness / 1000.0 * run.size;
        ops.push(Operation::new(
            "re",
            vec![real(run.origin.x), real(top), real(run.width), real(-thickness)],
        ));
        ops.push(Operation::new("f", vec![]));
    }
    ops.push(Operation::new("Q", vec![]));
}

/// Embedded programs are addressed by glyph id, everything else by WinAnsi code.
fn is_composite(metrics: &dyn FontMetrics) -> bool {
    metrics.font_program().is_some()
}

fn encode_text(metrics: &dyn FontMetrics, text: &str) -> Object {
    if !is_composite(metrics) {
        return Object::String(encode_win_ansi(text), StringFormat::Literal);
    }
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        bytes.extend_from_slice(&metrics.glyph_id(ch).unwrap_or(0).to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Splits `text` at kerned pairs into a `TJ` array.
fn kerned_segments(metrics: &dyn FontMetrics, text: &str) -> Vec<Object> {
    let mut parts = Vec::new();
    let mut segment = String::new();
    let mut previous: Option<char> = None;

    for ch in text.chars() {
        if let Some(prev) = previous {
            let kern = metrics.kerning(prev, ch);
            if kern != 0.0 {
                parts.push(encode_text(metrics, &segment));
                // TJ offsets are subtracted from the advance.
                parts.push(real(-kern));
                segment.clear();
            }
        }
        segment.push(ch);
        previous = Some(ch);
    }
    parts.push(encode_text(metrics, &segment));
    parts
}

/// Glyph id to character, per composite font, over every text run.
fn glyph_usage(doc: &FinishedDocument) -> HashMap<FontId, BTreeMap<u16, char>> {
    let mut usage: HashMap<FontId, BTreeMap<u16, char>> = HashMap::new();
    for page in &doc.pages {
        for operator in page.operators() {
            let ContentOperator::Text(run) = operator else {
                continue;
            };
            let Some(font) = doc.resources.font(run.font) else {
                continue;
            };
            let metrics = font.metrics.as_ref();
            if !is_composite(metrics) {
                continue;
            }
            let glyphs = usage.entry(run.font).or_default();
            for ch in run.text.chars() {
                glyphs.entry(metrics.glyph_id(ch).unwrap_or(0)).or_insert(ch);
            }
        }
    }
    usage
}

/// `/W` array: one `first [w1 w2 ...]` entry per run of consecutive glyph ids.
fn cid_widths(metrics: &dyn FontMetrics, used: &BTreeMap<u16, char>) -> Vec<Object> {
    let mut entries = Vec::new();
    let mut first: Option<u16> = None;
    let mut widths = Vec::new();
    let mut previous = 0u16;

    for (&gid, &ch) in used {
        if let Some(start) = first {
            if gid != previous.wrapping_add(1) {
                entries.push(Object::Integer(start as i64));
                entries.push(Object::Array(std::mem::take(&mut widths)));
                first = None;
            }
        }
        first.get_or_insert(gid);
        widths.push(real(metrics.glyph_width(ch)));
        previous = gid;
    }
    if let Some(start) = first {
        entries.push(Object::Integer(start as i64));
        entries.push(Object::Array(widths));
    }
    entries
}

/// A `ToUnicode` CMap with one `bfchar` line per used glyph.
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> Vec<u8> {
    let mappings: Vec<(u16, char)> = used
        .iter()
        .filter(|(gid, _)| **gid != 0)
        .map(|(gid, ch)| (*gid, *ch))
        .collect();

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    // bfchar sections hold at most 100 entries.
    for chunk in mappings.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, utf16);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap.into_bytes()
}

fn write_font(
    objects: &mut PdfObjects,
    font: &FontResource,
    used: Option<&BTreeMap<u16, char>>,
    compress: bool,
) -> Result<ObjectId> {
    let metrics = font.metrics.as_ref();
    let base_font = name(metrics.postscript_name());

    let Some(program) = metrics.font_program() else {
        return Ok(objects.add(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        }));
    };

    let font_id = objects.new_object_id();
    let file_dict = dictionary! { "Length1" => program.len() as i64 };
    let file_id = objects.add(stream(file_dict, program.to_vec(), compress)?);

    let d = metrics.descriptor();
    let descriptor_id = objects.add(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => d.flags as i64,
        "FontBBox" => d.bbox.iter().map(|v| real(*v)).collect::<Vec<Object>>(),
        "ItalicAngle" => real(d.italic_angle),
        "Ascent" => real(d.ascent),
        "Descent" => real(d.descent),
        "CapHeight" => real(d.cap_height),
        "StemV" => real(d.stem_v),
        "MissingWidth" => real(d.missing_width),
        "FontFile2" => file_id,
    });

    let empty = BTreeMap::new();
    let used = used.unwrap_or(&empty);
    let cid_font_id = objects.add(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_font.clone(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::String(b"Adobe".to_vec(), StringFormat::Literal),
            "Ordering" => Object::String(b"Identity".to_vec(), StringFormat::Literal),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => real(d.missing_width),
        "W" => cid_widths(metrics, used),
        "CIDToGIDMap" => "Identity",
    });
    let to_unicode_id = objects.add(stream(Dictionary::new(), to_unicode_cmap(used), compress)?);

    objects.insert(
        font_id,
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => base_font,
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        },
    );
    log::debug!(
        "Embedded font {} ({}) with {} glyphs in use",
        font.id,
        metrics.postscript_name(),
        used.len()
    );
    Ok(font_id)
}

fn write_image(objects: &mut PdfObjects, resource: &ImageResource) -> ObjectId {
    let image = &resource.image;
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => name(image.color_space.pdf_name()),
        "BitsPerComponent" => image.bits_per_component as i64,
        "Filter" => name(image.filter.pdf_name()),
    };

    if let Some(mask) = &image.soft_mask {
        let mask_id = objects.add(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => name(ImageFilter::Flate.pdf_name()),
            },
            mask.clone(),
        ));
        dict.set("SMask", mask_id);
    }
    objects.add(Stream::new(dict, image.data.clone()))
}
