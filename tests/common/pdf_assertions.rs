#![allow(dead_code)]

use lopdf::content::Operation;
use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// `/Link` annotation dictionaries per 1-based page number.
pub fn link_annotations(doc: &LopdfDocument) -> Vec<(u32, Dictionary)> {
    let mut links = Vec::new();
    for (page_no, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annot in annots {
            let dict = match annot {
                Object::Reference(id) => doc.get_dictionary(*id).ok(),
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            };
            if let Some(dict) = dict {
                if dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Link".as_slice()) {
                    links.push((page_no, dict.clone()));
                }
            }
        }
    }
    links
}

/// Page number an internal link's `/Dest` points at.
pub fn destination_page(doc: &LopdfDocument, link: &Dictionary) -> Option<u32> {
    let dest = link.get(b"Dest").and_then(Object::as_array).ok()?;
    let target = dest.first()?.as_reference().ok()?;
    doc.get_pages()
        .into_iter()
        .find(|(_, id)| *id == target)
        .map(|(page_no, _)| page_no)
}

pub fn uri_of(link: &Dictionary) -> Option<String> {
    let action = link.get(b"A").and_then(Object::as_dict).ok()?;
    let uri = action.get(b"URI").and_then(Object::as_str).ok()?;
    Some(String::from_utf8_lossy(uri).into_owned())
}

/// `(Subtype, BaseFont)` of every font dictionary in the file.
pub fn fonts(doc: &LopdfDocument) -> Vec<(String, String)> {
    let mut fonts = Vec::new();
    for object in doc.objects.values() {
        let Ok(dict) = object.as_dict() else {
            continue;
        };
        if dict.get(b"Type").and_then(Object::as_name).ok() != Some(b"Font".as_slice()) {
            continue;
        }
        let name = |key: &[u8]| {
            dict.get(key)
                .and_then(Object::as_name)
                .map(|n| String::from_utf8_lossy(n).into_owned())
                .unwrap_or_default()
        };
        fonts.push((name(b"Subtype"), name(b"BaseFont")));
    }
    fonts.sort();
    fonts
}

/// Streams whose `/Subtype` is `/Image`.
pub fn image_streams(doc: &LopdfDocument) -> Vec<Dictionary> {
    doc.objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice()))
        .map(|stream| stream.dict.clone())
        .collect()
}

/// Counts non-overlapping occurrences of the operator `op` as a whole token.
pub fn count_operator(content: &str, op: &str) -> usize {
    content
        .split_whitespace()
        .filter(|token| *token == op)
        .count()
}

/// Numeric operands of `op`; names and strings are skipped.
pub fn numbers(op: &Operation) -> Vec<f32> {
    op.operands.iter().filter_map(|o| o.as_float().ok()).collect()
}

/// First operation named `operator` whose numeric operands match `expected`
/// within a thousandth of a point.
pub fn find_operation<'a>(ops: &'a [Operation], operator: &str, expected: &[f32]) -> Option<&'a Operation> {
    ops.iter().find(|op| {
        let actual = numbers(op);
        op.operator == operator
            && actual.len() == expected.len()
            && actual.iter().zip(expected).all(|(a, e)| (a - e).abs() < 1e-3)
    })
}
