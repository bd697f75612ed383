//! Renders a plain text file into a paginated PDF.
//!
//! Lines starting with `# ` become headings. Every heading gets an anchor and
//! an entry in a linked table of contents on the first page.
//!
//!   folio notes.txt -o notes.pdf --config folio.json

use clap::Parser;
use folio::{Align, Border, CellFlow, CellOptions, Document, DocumentBuilder, DocumentConfig};
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Render a text file into a PDF")]
struct Args {
    /// Text file to render
    input: PathBuf,

    /// Output PDF path
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// JSON document configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Title shown in the page header and the document info
    #[arg(short, long)]
    title: Option<String>,
}

const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 15.0;

enum Block {
    Heading(String),
    Paragraph(String),
}

fn parse_blocks(text: &str) -> Vec<Block> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.strip_prefix("# ") {
            Some(heading) => Block::Heading(heading.trim().to_string()),
            None => Block::Paragraph(line.to_string()),
        })
        .collect()
}

/// Starts a new page when `height` more points would run into the bottom margin.
fn reserve(doc: &mut Document, height: f32) -> folio::Result<()> {
    let limit = doc.page_size().height - doc.margins().bottom - 20.0;
    if doc.get_y() + height > limit {
        doc.add_page()?;
    }
    Ok(())
}

fn render(doc: &mut Document, blocks: &[Block]) -> folio::Result<()> {
    let headings: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            Block::Heading(text) => Some(text.as_str()),
            Block::Paragraph(_) => None,
        })
        .collect();

    if !headings.is_empty() {
        doc.set_font("Helvetica", "B", 14.0)?;
        doc.cell(CellOptions::new(0.0, 20.0).text("Contents").flow(CellFlow::NextLine))?;
        doc.set_font("Helvetica", "U", BODY_SIZE)?;
        doc.set_text_color((0, 0, 160));
        for (i, heading) in headings.iter().enumerate() {
            reserve(doc, LINE_HEIGHT)?;
            doc.write_internal_link(LINE_HEIGHT, heading, format!("section-{}", i + 1))?;
            doc.line_break(-1.0)?;
        }
        doc.set_text_color((0, 0, 0));
        doc.add_page()?;
    }

    let mut section = 0;
    for block in blocks {
        match block {
            Block::Heading(text) => {
                section += 1;
                reserve(doc, 3.0 * LINE_HEIGHT)?;
                doc.line_break(LINE_HEIGHT / 2.0)?;
                doc.define_anchor(format!("section-{}", section))?;
                doc.set_font("Helvetica", "B", 14.0)?;
                doc.cell(CellOptions::new(0.0, 20.0).text(text.as_str()).flow(CellFlow::NextLine))?;
            }
            Block::Paragraph(text) => {
                doc.set_font("Times", "", BODY_SIZE)?;
                let width = doc.page_size().width - doc.margins().left - doc.margins().right;
                for line in doc.split_text(text, width) {
                    reserve(doc, LINE_HEIGHT)?;
                    doc.write_text(LINE_HEIGHT, &line)?;
                    doc.line_break(-1.0)?;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DocumentConfig::from_path(path)?,
        None => DocumentConfig::default(),
    };
    if let Some(title) = args.title {
        config.title = title;
    }
    if config.title.is_empty() {
        config.title = args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    config.creator = format!("folio {}", env!("CARGO_PKG_VERSION"));

    let text = fs::read_to_string(&args.input)?;
    let blocks = parse_blocks(&text);
    let title = config.title.clone();

    let mut doc = DocumentBuilder::new(config)
        .header(move |doc| {
            doc.set_font("Helvetica", "B", 9.0)?;
            doc.set_draw_color((160, 160, 160));
            doc.cell(
                CellOptions::new(0.0, 14.0)
                    .text(title.as_str())
                    .border(Border::parse("B"))
                    .flow(CellFlow::NextLine),
            )?;
            doc.line_break(10.0)
        })
        .footer(|doc| {
            doc.set_y(-30.0)?;
            doc.set_font("Helvetica", "I", 8.0)?;
            let label = format!("Page {}", doc.page_no());
            doc.cell(CellOptions::new(0.0, 10.0).text(label).align(Align::Center))
        })
        .build()?;

    render(&mut doc, &blocks)?;

    let file = fs::File::create(&args.output)?;
    let pages = doc.page_count();
    doc.write_to(BufWriter::new(file))?.into_inner()?;
    log::info!("Wrote {} pages to {}", pages, args.output.display());
    println!("Wrote {}", args.output.display());
    Ok(())
}
