mod common;

use common::{GeneratedPdf, TestResult, init_logging, plain_config};
use folio::{Document, DocumentConfig, Error};
use std::io::{self, Write};

/// Parses `startxref` and the classic xref table, returning `(id, offset)`
/// for every in-use entry.
fn xref_entries(bytes: &[u8]) -> Vec<(u32, usize)> {
    let tail = &bytes[bytes.len().saturating_sub(64)..];
    let tail = String::from_utf8_lossy(tail);
    let start: usize = tail
        .split("startxref")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);

    let table = String::from_utf8_lossy(&bytes[start..]);
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("xref"));
    let header = lines.next().unwrap_or_default();
    let count: u32 = header.split_whitespace().nth(1).and_then(|n| n.parse().ok()).unwrap_or(0);

    lines
        .take(count as usize)
        .enumerate()
        .filter(|(_, line)| line.trim_end().ends_with('n'))
        .map(|(id, line)| (id as u32, line[..10].parse().unwrap_or(0)))
        .collect()
}

#[test]
fn xref_offsets_point_at_each_object() -> TestResult {
    init_logging();
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.write_text(14.0, "Hello")?;
    let bytes = doc.write_to(Vec::new())?;

    assert!(bytes.starts_with(b"%PDF-1.7\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));

    let entries = xref_entries(&bytes);
    assert!(!entries.is_empty());
    for (id, offset) in entries {
        let expected = format!("{} 0 obj", id);
        assert!(
            bytes[offset..].starts_with(expected.as_bytes()),
            "object {id} is not at offset {offset}"
        );
    }
    Ok(())
}

#[test]
fn output_parses_with_catalog_and_info() -> TestResult {
    let config = DocumentConfig {
        title: "Quarterly Report".into(),
        subject: "Numbers".into(),
        ..plain_config()
    };
    let mut doc = Document::new(config)?;
    doc.set_author("Zoë");
    doc.add_page()?;
    doc.add_page()?;

    let pdf = GeneratedPdf::from_document(doc)?;
    assert_eq!(pdf.page_count(), 2);
    assert_eq!(pdf.doc.version, "1.7");

    let info_id = pdf.doc.trailer.get(b"Info")?.as_reference()?;
    let info = pdf.doc.get_dictionary(info_id)?;
    assert_eq!(info.get(b"Title")?.as_str()?, b"Quarterly Report");
    assert_eq!(info.get(b"Subject")?.as_str()?, b"Numbers");
    assert!(info.get(b"Author")?.as_str()?.starts_with(&[0xFE, 0xFF]));
    assert!(info.get(b"Producer")?.as_str()?.starts_with(b"folio "));
    assert!(info.get(b"Keywords").is_err(), "empty fields are left out");

    let root = pdf.doc.trailer.get(b"Root")?.as_reference()?;
    assert_eq!(root, (1, 0));
    Ok(())
}

#[test]
fn compressed_streams_decode_to_the_same_content() -> TestResult {
    let build = |compress: bool| -> folio::Result<Vec<u8>> {
        let mut doc = Document::new(DocumentConfig {
            compress,
            ..plain_config()
        })?;
        doc.add_page()?;
        doc.write_text(14.0, "Compressed café")?;
        doc.write_to(Vec::new())
    };
    let plain = GeneratedPdf::from_bytes(build(false)?)?;
    let packed = GeneratedPdf::from_bytes(build(true)?)?;
    assert_eq!(plain.page_content(1), packed.page_content(1));
    assert!(String::from_utf8_lossy(&packed.bytes).contains("/FlateDecode"));
    // WinAnsi encodes é as a single byte.
    let shown = plain
        .page_operations(1)
        .into_iter()
        .find(|op| op.operator == "Tj")
        .ok_or("no Tj")?;
    assert_eq!(shown.operands[0].as_str()?, b"Compressed caf\xe9");
    Ok(())
}

#[derive(Debug)]
struct FailingSink {
    budget: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.budget {
            return Err(io::Error::other("disk full"));
        }
        self.budget -= buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn failing_sinks_surface_io_and_allow_a_retry() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.write_text(14.0, "Retry me")?;
    let finished = doc.finish()?;

    let err = finished.serialize(FailingSink { budget: 100 }).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");

    let bytes = finished.serialize(Vec::new())?;
    GeneratedPdf::from_bytes(bytes)?;
    Ok(())
}

#[test]
fn writes_to_a_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.pdf");

    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.write_text(14.0, "On disk")?;
    let file = std::fs::File::create(&path)?;
    doc.write_to(io::BufWriter::new(file))?.flush()?;

    let pdf = GeneratedPdf::from_bytes(std::fs::read(&path)?)?;
    assert_eq!(pdf.page_count(), 1);
    Ok(())
}
