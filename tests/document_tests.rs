mod common;

use common::pdf_assertions::{count_operator, find_operation};
use common::{GeneratedPdf, TestResult, init_logging, plain_config};
use folio::{
    CellFlow, CellOptions, Color, ColorRole, ContentOperator, Document, DocumentBuilder, DocumentConfig, Error,
    Margins, PaintStyle, Point, Size,
};
use std::sync::{Arc, Mutex};

#[test]
fn page_indices_follow_creation_order() -> TestResult {
    init_logging();
    let mut doc = Document::new(plain_config())?;
    let indices: Vec<usize> = (0..4).map(|_| doc.add_page()).collect::<Result<_, _>>()?;
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(doc.page_no(), 4);

    let finished = doc.finish()?;
    let seen: Vec<usize> = finished.pages().iter().map(|p| p.index()).collect();
    assert_eq!(seen, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn hello_at_the_top_left_margin() -> TestResult {
    init_logging();
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    assert_eq!(doc.get_xy(), Point::new(72.0, 72.0));

    let width = doc.measure_text_width("Hello");
    assert!((width - 27.336).abs() < 1e-3);
    doc.write_text(14.0, "Hello")?;

    let runs: Vec<_> = doc
        .page(1)
        .map(|page| page.operators())
        .unwrap_or_default()
        .iter()
        .filter_map(|op| match op {
            ContentOperator::Text(run) => Some(run.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].origin, Point::new(72.0, 72.0));
    assert_eq!(runs[0].text, "Hello");
    assert!((doc.get_x() - (72.0 + width)).abs() < 1e-4);
    assert_eq!(doc.get_y(), 72.0);
    Ok(())
}

#[test]
fn invalid_margins_keep_the_previous_ones() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    let err = doc.set_margins(Margins::new(300.0, 10.0, 300.0, 10.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidMargin { .. }));
    assert_eq!(doc.margins(), Margins::all(72.0));

    assert!(doc.set_left_margin(-5.0).is_err());
    doc.set_left_margin(20.0)?;
    doc.add_page()?;
    assert_eq!(doc.margins().left, 20.0, "new pages inherit the changed margins");
    assert_eq!(doc.get_x(), 20.0);
    Ok(())
}

#[test]
fn invalid_configured_margins_fail_at_construction() {
    let config = DocumentConfig {
        margins: Margins::new(0.0, 500.0, 0.0, 500.0),
        ..plain_config()
    };
    assert!(matches!(Document::new(config), Err(Error::InvalidMargin { .. })));
}

#[test]
fn pages_keep_their_own_cursor() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.set_xy(100.0, 200.0)?;
    doc.add_page()?;
    doc.set_xy(300.0, 400.0)?;

    doc.set_active_page(1)?;
    assert_eq!(doc.get_xy(), Point::new(100.0, 200.0));
    doc.write_text(10.0, "back on page one")?;
    doc.set_active_page(2)?;
    assert_eq!(doc.get_xy(), Point::new(300.0, 400.0));

    assert!(matches!(doc.set_active_page(3), Err(Error::PageOutOfRange { index: 3, count: 2 })));
    assert!(matches!(doc.set_active_page(0), Err(Error::PageOutOfRange { .. })));
    Ok(())
}

#[test]
fn cursor_helpers_follow_edge_conventions() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    let size = doc.page_size();

    doc.set_x(-100.0)?;
    assert!((doc.get_x() - (size.width - 100.0)).abs() < 1e-4);
    doc.set_y(-50.0)?;
    assert!((doc.get_y() - (size.height - 50.0)).abs() < 1e-4);
    assert_eq!(doc.get_x(), 72.0);

    doc.set_y(100.0)?;
    doc.write_text(18.0, "line")?;
    doc.line_break(-1.0)?;
    assert_eq!(doc.get_xy(), Point::new(72.0, 118.0));
    Ok(())
}

#[test]
fn drawing_starts_the_first_page_implicitly() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    assert_eq!(doc.page_count(), 0);
    doc.line(10.0, 10.0, 100.0, 10.0)?;
    assert_eq!(doc.page_count(), 1);

    let empty = Document::new(plain_config())?.finish()?;
    assert_eq!(empty.pages().len(), 1, "finishing an empty document adds a blank page");
    Ok(())
}

#[test]
fn colors_and_line_width_carry_over_to_new_pages() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.set_draw_color((255, 0, 0));
    doc.set_line_width(2.0);
    doc.add_page()?;

    let ops = doc.page(2).map(|p| p.operators().to_vec()).unwrap_or_default();
    assert_eq!(ops[0], ContentOperator::SetLineWidth(2.0));
    assert!(ops.contains(&ContentOperator::SetColor {
        role: ColorRole::Draw,
        color: Color::rgb(255, 0, 0),
    }));
    assert!(!ops.iter().any(|op| matches!(op, ContentOperator::SetColor { role: ColorRole::Fill, .. })));

    let pdf = GeneratedPdf::from_document(doc)?;
    let ops = pdf.page_operations(2);
    assert!(find_operation(&ops, "w", &[2.0]).is_some(), "{ops:?}");
    assert!(find_operation(&ops, "RG", &[1.0, 0.0, 0.0]).is_some(), "{ops:?}");
    assert!(pdf.page_content(2).contains("2 w"), "integral widths are written as integers");
    Ok(())
}

#[test]
fn rectangles_and_lines_become_path_operators() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.line(72.0, 100.0, 200.0, 100.0)?;
    doc.rect(72.0, 120.0, 100.0, 50.0, PaintStyle::parse("DF"))?;
    doc.rect(72.0, 200.0, 100.0, 50.0, PaintStyle::Fill)?;

    let pdf = GeneratedPdf::from_document(doc)?;
    let content = pdf.page_content(1);
    let ops = pdf.page_operations(1);
    assert!(find_operation(&ops, "m", &[72.0, 741.89]).is_some(), "{content}");
    assert_eq!(count_operator(&content, "S"), 1);
    assert_eq!(count_operator(&content, "b"), 1);
    assert_eq!(count_operator(&content, "f"), 1);
    Ok(())
}

#[test]
fn cells_place_text_and_move_the_cursor() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.cell(CellOptions::new(100.0, 20.0).text("A").border(folio::Border::ALL))?;
    assert_eq!(doc.get_xy(), Point::new(172.0, 72.0));

    doc.cell(CellOptions::new(0.0, 20.0).text("B").flow(CellFlow::NextLine))?;
    assert_eq!(doc.get_xy(), Point::new(72.0, 92.0));

    doc.cell(CellOptions::new(50.0, 10.0).flow(CellFlow::Below))?;
    assert_eq!(doc.get_xy(), Point::new(72.0, 102.0));

    let ops = doc.page(1).map(|p| p.operators().to_vec()).unwrap_or_default();
    let texts = ops.iter().filter(|op| matches!(op, ContentOperator::Text(_))).count();
    assert_eq!(texts, 2, "the empty cell writes no text");
    Ok(())
}

#[test]
fn text_is_split_to_fit_a_width() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.set_font("Courier", "", 10.0)?;
    let lines = doc.split_text("aaaa bbbb cccc", 40.0);
    assert_eq!(lines, vec!["aaaa", "bbbb", "cccc"]);
    Ok(())
}

#[test]
fn unknown_fonts_are_reported() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    let err = doc.set_font("Comic Sans", "", 12.0).unwrap_err();
    assert!(matches!(err, Error::FontNotFound { .. }));
    Ok(())
}

#[test]
fn header_and_footer_run_once_per_page() -> TestResult {
    init_logging();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let headers = Arc::clone(&calls);
    let footers = Arc::clone(&calls);

    let mut doc = DocumentBuilder::new(plain_config())
        .header(move |doc| {
            headers.lock().unwrap().push(format!("header {}", doc.page_no()));
            doc.set_text_color((0, 128, 0));
            doc.write_text(12.0, "Header")
        })
        .footer(move |doc| {
            footers.lock().unwrap().push(format!("footer {}", doc.page_no()));
            doc.set_y(-30.0)?;
            doc.write_text(10.0, &format!("Page {}", doc.page_no()))
        })
        .build()?;
    doc.write_text(12.0, "Body")?;
    doc.add_page()?;
    doc.add_page()?;
    let finished = doc.finish()?;

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["header 1", "footer 1", "header 2", "footer 2", "header 3", "footer 3"]
    );
    let footer_texts: Vec<String> = finished
        .pages()
        .iter()
        .flat_map(|page| page.operators())
        .filter_map(|op| match op {
            ContentOperator::Text(run) if run.text.starts_with("Page") => Some(run.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(footer_texts, vec!["Page 1", "Page 2", "Page 3"]);

    // The header's text color does not leak into the body.
    let first = finished.pages()[0].operators();
    assert!(first.contains(&ContentOperator::SetColor {
        role: ColorRole::Text,
        color: Color::BLACK,
    }));
    Ok(())
}

#[test]
fn hook_errors_name_the_page() -> TestResult {
    let mut doc = DocumentBuilder::new(plain_config())
        .header(|doc| {
            if doc.page_no() == 2 {
                doc.use_image("missing", 0.0, 0.0, 10.0, 10.0)
            } else {
                Ok(())
            }
        })
        .build()?;
    let err = doc.add_page().unwrap_err();
    match err {
        Error::Hook { page, source } => {
            assert_eq!(page, 2);
            assert!(matches!(*source, Error::ImageNotFound(_)));
        }
        other => panic!("unexpected error {other:?}"),
    }
    Ok(())
}

#[test]
fn documents_build_on_separate_threads() -> TestResult {
    let handles: Vec<_> = (0..2)
        .map(|n| {
            std::thread::spawn(move || -> folio::Result<usize> {
                let mut doc = Document::new(plain_config())?;
                for i in 0..=n {
                    doc.add_page()?;
                    doc.write_text(12.0, &format!("thread {n} page {i}"))?;
                }
                let bytes = doc.write_to(Vec::new())?;
                Ok(bytes.len())
            })
        })
        .collect();
    for handle in handles {
        let len = handle.join().map_err(|_| "thread panicked")??;
        assert!(len > 0);
    }
    Ok(())
}

#[test]
fn custom_page_sizes_are_kept_per_page() -> TestResult {
    let mut doc = Document::new(plain_config())?;
    doc.add_page()?;
    doc.add_page_with_size(Size::new(300.0, 400.0))?;
    assert_eq!(doc.page_size(), Size::new(300.0, 400.0));

    let pdf = GeneratedPdf::from_document(doc)?;
    let pages = pdf.doc.get_pages();
    let second = pdf.doc.get_dictionary(pages[&2])?;
    let media_box = second.get(b"MediaBox")?.as_array()?;
    assert_eq!(media_box[2].as_float()?, 300.0);
    assert_eq!(media_box[3].as_float()?, 400.0);
    Ok(())
}
