#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const PAGE_HEIGHT: i64 = 842;
const FONT_SIZE: i64 = 12;
/// Distance from the glyph top to the baseline for `FONT_SIZE`, matching the
/// reader's ascent estimate so that `top` round-trips exactly.
const ASCENT: i64 = 9;

/// A word placed with its left edge at `x` and its glyph top at `top`,
/// both measured from the top-left corner of an A4 page.
#[derive(Debug, Clone, Copy)]
pub struct Word<'a> {
    pub text: &'a str,
    pub x: i64,
    pub top: i64,
}

pub const fn word(text: &str, x: i64, top: i64) -> Word<'_> {
    Word { text, x, top }
}

fn page_operations(words: &[Word<'_>]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for word in words {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new(
                "Td",
                vec![word.x.into(), (PAGE_HEIGHT - word.top - ASCENT).into()],
            ),
            Operation::new("Tj", vec![Object::string_literal(word.text)]),
            Operation::new("ET", vec![]),
        ]);
    }
    operations
}

pub fn create_report_pdf(
    path: &Path,
    pages: &[Vec<Word<'_>>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for words in pages {
        let content = Content {
            operations: page_operations(words),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

/// Patient block above the table window.
pub fn patient_header() -> Vec<Word<'static>> {
    vec![
        word("Name", 40, 120),
        word(":", 80, 120),
        word("John", 90, 120),
        word("Doe", 125, 120),
        word("Collected", 300, 120),
        word(":", 360, 120),
        word("01/01/2024", 370, 120),
        word("10:00AM", 440, 120),
        word("Age", 40, 140),
        word(":", 80, 140),
        word("34", 90, 140),
        word("Gender", 300, 140),
        word(":", 360, 140),
        word("Male", 370, 140),
        word("Lab", 40, 160),
        word("No.", 62, 160),
        word(":", 85, 160),
        word("LN4821", 95, 160),
        word("Received", 300, 160),
        word(":", 360, 160),
        word("01/01/2024", 370, 160),
        word("11:30AM", 440, 160),
        word("Report", 40, 180),
        word("Status", 82, 180),
        word(":", 125, 180),
        word("Final", 135, 180),
        word("Reported", 300, 180),
        word(":", 360, 180),
        word("02/01/2024", 370, 180),
        word("04:15PM", 440, 180),
    ]
}

/// Liver function table, written bottom row first so that document order
/// has to be recovered from geometry.
pub fn liver_table() -> Vec<Word<'static>> {
    vec![
        word("SGPT", 40, 320),
        word("(ALT)", 75, 320),
        word("32", 280, 320),
        word("U/L", 390, 320),
        word("<40", 490, 320),
        word("(Diazo", 40, 302),
        word("Method)", 85, 302),
        word("Bilirubin", 40, 290),
        word("Total", 100, 290),
        word("0.8", 280, 290),
        word("mg/dL", 390, 290),
        word("0.3-1.2", 490, 290),
        word("LIVERPANEL", 40, 270),
        word("TestName", 40, 250),
        word("Results", 280, 250),
        word("Units", 390, 250),
        word("Bio.Ref.Interval", 490, 250),
        word("Page", 280, 760),
        word("1", 310, 760),
    ]
}
