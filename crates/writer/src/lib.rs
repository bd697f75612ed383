//! Sequential PDF file writer.
//!
//! Objects are collected in a [`PdfObjects`] table and written in increasing
//! object-number order. The sink is only ever appended to: byte offsets for
//! the cross-reference table come from a [`CountingWriter`], so sockets and
//! pipes work as well as files.

pub mod counting;
pub mod encode;
pub mod xref;

pub use counting::CountingWriter;
pub use encode::{deflate, format_real};
pub use xref::XrefTable;

use lopdf::{Dictionary, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Trailer references object {0} which was never added")]
    MissingObject(u32),

    #[error("Content stream could not be encoded: {0}")]
    Content(#[from] lopdf::Error),

    #[error("Object offset {0} does not fit a cross-reference table")]
    OffsetOverflow(u64),
}

/// Objects keyed by object number. Generation is always 0.
#[derive(Debug, Default, Clone)]
pub struct PdfObjects {
    objects: BTreeMap<u32, Object>,
    max_id: u32,
}

impl PdfObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next object number without storing anything under it.
    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn add(&mut self, object: impl Into<Object>) -> ObjectId {
        let id = self.new_object_id();
        self.objects.insert(id.0, object.into());
        id
    }

    /// Stores `object` under a previously reserved (or explicit) id.
    pub fn insert(&mut self, id: ObjectId, object: impl Into<Object>) {
        self.max_id = self.max_id.max(id.0);
        self.objects.insert(id.0, object.into());
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter().map(|(id, object)| ((*id, 0), object))
    }
}

/// The trailer entries that point back into the object table.
#[derive(Debug, Clone, Copy)]
pub struct Trailer {
    pub root: ObjectId,
    pub info: Option<ObjectId>,
}

pub const PDF_VERSION: &str = "1.7";

/// Writes a complete PDF file and returns the sink.
pub fn write_pdf<W: Write>(sink: W, objects: &PdfObjects, trailer: Trailer) -> Result<W, WriteError> {
    for id in std::iter::once(trailer.root).chain(trailer.info) {
        if objects.get(id).is_none() {
            return Err(WriteError::MissingObject(id.0));
        }
    }

    let mut writer = CountingWriter::new(sink);
    writer.write_all(format!("%PDF-{}\n", PDF_VERSION).as_bytes())?;
    // High bytes mark the file as binary.
    writer.write_all(b"%\xE2\xE3\xCF\xD3\n")?;

    let mut xref = XrefTable::new();
    let mut buffer = Vec::new();
    for (id, object) in objects.iter() {
        xref.record(id.0, writer.position())?;
        buffer.clear();
        buffer.extend_from_slice(format!("{} {} obj\n", id.0, id.1).as_bytes());
        encode::encode_object(&mut buffer, object);
        buffer.extend_from_slice(b"\nendobj\n");
        writer.write_all(&buffer)?;
        log::trace!("Wrote object {} ({} bytes)", id.0, buffer.len());
    }

    let xref_start = writer.position();
    writer.write_all(&xref.encode())?;

    let mut trailer_dict: Dictionary = dictionary! {
        "Size" => xref.size() as i64,
        "Root" => trailer.root,
    };
    if let Some(info) = trailer.info {
        trailer_dict.set("Info", info);
    }
    let mut tail = b"trailer\n".to_vec();
    encode::encode_dictionary(&mut tail, &trailer_dict);
    tail.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_start).as_bytes());
    writer.write_all(&tail)?;
    writer.flush()?;

    log::debug!(
        "Wrote PDF with {} objects, {} bytes",
        objects.len(),
        writer.position()
    );
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;

    fn minimal() -> (PdfObjects, Trailer) {
        let mut objects = PdfObjects::new();
        let catalog = objects.new_object_id();
        let pages = objects.new_object_id();
        let content = objects.add(Stream::new(dictionary! {}, b"0 0 m 10 10 l S".to_vec()));
        let page = objects.add(dictionary! {
            "Type" => "Page",
            "Parent" => pages,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
            "Contents" => content,
        });
        objects.insert(pages, dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page.into()],
            "Count" => 1,
        });
        objects.insert(catalog, dictionary! { "Type" => "Catalog", "Pages" => pages });
        (objects, Trailer { root: catalog, info: None })
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let (objects, trailer) = minimal();
        let bytes = write_pdf(Vec::new(), &objects, trailer).unwrap();
        let tail = String::from_utf8_lossy(&bytes[bytes.len() - 32..]).into_owned();

        let startxref: usize = tail
            .rsplit("startxref\n")
            .next()
            .and_then(|rest| rest.lines().next())
            .unwrap()
            .parse()
            .unwrap();
        assert!(bytes[startxref..].starts_with(b"xref\n0 5\n"));

        let entries = std::str::from_utf8(&bytes[startxref..]).unwrap();
        for (id, line) in entries.lines().skip(3).take(4).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", id + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {}", id + 1);
        }
    }

    #[test]
    fn output_loads_with_lopdf() {
        let (objects, trailer) = minimal();
        let bytes = write_pdf(Vec::new(), &objects, trailer).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn missing_root_is_rejected() {
        let objects = PdfObjects::new();
        let err = write_pdf(Vec::new(), &objects, Trailer { root: (1, 0), info: None }).unwrap_err();
        assert!(matches!(err, WriteError::MissingObject(1)));
    }

    #[test]
    fn sink_failures_surface_as_io() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let (objects, trailer) = minimal();
        assert!(matches!(write_pdf(Broken, &objects, trailer), Err(WriteError::Io(_))));
    }
}
