use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::{BIG5, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::{PageContent, Token};
use crate::profile::VerticalWindow;
use crate::rows::cluster_rows;

const DEFAULT_PAGE_HEIGHT: f64 = 842.0;
// Font programs are not read: word starts placed by Td/Tm are exact, later
// words inside one shown string are estimated from this advance.
const AVERAGE_GLYPH_WIDTH_EM: f64 = 0.5;
const ASCENT_EM: f64 = 0.75;
const LINE_TOLERANCE: f64 = 3.0;
const MAX_PARENT_DEPTH: usize = 32;
// TJ adjustments wider than this (thousandths of an em) split words.
const WORD_GAP_ADJUSTMENT: f64 = 100.0;

fn looks_decoding_broken(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if bytes.starts_with(&[0xFE, 0xFF]) || bytes.starts_with(&[0xFF, 0xFE]) {
        let bytes = if bytes.len() > 2 { &bytes[2..] } else { bytes };
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();

        if lower.contains("utf16")
            || lower.contains("ucs2")
            || lower.contains("identity-h")
            || lower.contains("unicode")
        {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }

        if lower.contains("big5") || lower.contains("b5") || lower.contains("eten") {
            let (big5, _, had_errors) = BIG5.decode(bytes);
            if !had_errors && !big5.is_empty() {
                return big5.into_owned();
            }
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

#[allow(clippy::cast_precision_loss)]
fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn page_height(document: &Document, page_id: ObjectId) -> f64 {
    let mut current = document.get_dictionary(page_id).ok();
    for _ in 0..MAX_PARENT_DEPTH {
        let Some(dict) = current else {
            break;
        };

        if let Ok(media_box) = dict.get(b"MediaBox").and_then(|object| object.as_array()) {
            let coords = media_box.iter().filter_map(number).collect::<Vec<_>>();
            if let [_, y1, _, y2] = coords[..] {
                let height = (y2 - y1).abs();
                if height > 0.0 {
                    return height;
                }
            }
        }

        current = dict
            .get(b"Parent")
            .and_then(|object| object.as_reference())
            .and_then(|id| document.get_dictionary(id))
            .ok();
    }

    DEFAULT_PAGE_HEIGHT
}

/// Text state tracked while walking a content stream. Only translation and
/// axis scaling of the text matrix are honoured.
struct PageTokenizer<'a> {
    page_height: f64,
    encoding: Option<&'a str>,
    font_size: f64,
    leading: f64,
    scale_x: f64,
    scale_y: f64,
    line_x: f64,
    line_y: f64,
    pen_x: f64,
    word: String,
    word_start: (f64, f64),
    tokens: Vec<Token>,
}

impl PageTokenizer<'_> {
    fn new(page_height: f64) -> Self {
        Self {
            page_height,
            encoding: None,
            font_size: 12.0,
            leading: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            line_x: 0.0,
            line_y: 0.0,
            pen_x: 0.0,
            word: String::new(),
            word_start: (0.0, 0.0),
            tokens: Vec::new(),
        }
    }

    fn begin_text(&mut self) {
        self.flush_word();
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        self.set_line(0.0, 0.0);
    }

    fn set_line(&mut self, x: f64, y: f64) {
        self.flush_word();
        self.line_x = x;
        self.line_y = y;
        self.pen_x = x;
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.set_line(
            self.line_x + tx * self.scale_x,
            self.line_y + ty * self.scale_y,
        );
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, operands: &[Object]) {
        let values = operands.iter().filter_map(number).collect::<Vec<_>>();
        if let [a, _, _, d, e, f] = values[..] {
            self.scale_x = if a == 0.0 { 1.0 } else { a.abs() };
            self.scale_y = if d == 0.0 { 1.0 } else { d.abs() };
            self.set_line(e, f);
        }
    }

    fn glyph_advance(&self) -> f64 {
        self.font_size * AVERAGE_GLYPH_WIDTH_EM * self.scale_x
    }

    fn show_text(&mut self, text: &str) {
        let advance = self.glyph_advance();
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.flush_word();
            } else {
                if self.word.is_empty() {
                    self.word_start = (self.pen_x, self.line_y);
                }
                self.word.push(ch);
            }
            self.pen_x += advance;
        }
    }

    fn show_operands(&mut self, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    let text = decode_pdf_bytes(self.encoding, bytes);
                    self.show_text(&text);
                }
                Object::Array(items) => self.show_operands(items),
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = number(operand).unwrap_or_default();
                    if -adjustment > WORD_GAP_ADJUSTMENT {
                        self.flush_word();
                    }
                    self.pen_x -= adjustment / 1000.0 * self.font_size * self.scale_x;
                }
                _ => {}
            }
        }
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }

        let (x, baseline) = self.word_start;
        let glyph_top = baseline + self.font_size * self.scale_y * ASCENT_EM;
        self.tokens.push(Token {
            text: std::mem::take(&mut self.word),
            x_start: x.max(0.0),
            y_position: (self.page_height - glyph_top).max(0.0),
        });
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_word();
        self.tokens
    }
}

fn tokenize_page(document: &Document, page_id: ObjectId) -> Result<Vec<Token>, ExtractError> {
    let raw_content = document.get_page_content(page_id)?;
    let content = Content::decode(&raw_content)?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut tokenizer = PageTokenizer::new(page_height(document, page_id));
    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "BT" => tokenizer.begin_text(),
            "ET" => tokenizer.flush_word(),
            "Tf" => {
                if let Some(font_name) = operands.first().and_then(|operand| operand.as_name().ok())
                {
                    tokenizer.encoding = encodings.get(font_name).copied();
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    tokenizer.font_size = size.abs();
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    tokenizer.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if operation.operator == "TD" {
                        tokenizer.leading = -ty;
                    }
                    tokenizer.move_line(tx, ty);
                }
            }
            "Tm" => tokenizer.set_matrix(operands),
            "T*" => tokenizer.next_line(),
            "Tj" | "TJ" => {
                tokenizer.show_operands(operands);
                tokenizer.flush_word();
            }
            "'" => {
                tokenizer.next_line();
                tokenizer.show_operands(operands);
                tokenizer.flush_word();
            }
            "\"" => {
                tokenizer.next_line();
                tokenizer.show_operands(operands.get(2..).unwrap_or_default());
                tokenizer.flush_word();
            }
            _ => {}
        }
    }

    Ok(tokenizer.finish())
}

pub(crate) fn layout_text(tokens: &[Token]) -> String {
    let mut lines = cluster_rows(tokens, VerticalWindow::unbounded(), LINE_TOLERANCE, &[]);
    lines.sort_by(|left, right| left.anchor.total_cmp(&right.anchor));

    lines
        .into_iter()
        .map(|mut line| {
            line.tokens
                .sort_by(|left, right| left.x_start.total_cmp(&right.x_start));
            line.tokens
                .iter()
                .map(|token| token.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_page_of(text: &str) -> &str {
    text.split('\u{000C}').next().unwrap_or_default()
}

/// # Errors
///
/// Fails when the bytes are not a loadable PDF, the document has no pages,
/// or the first page's content stream cannot be decoded.
pub fn read_first_page(input_pdf: &[u8]) -> Result<PageContent, ExtractError> {
    let document = Document::load_mem(input_pdf)?;
    let pages = document.get_pages();
    let (&page_number, &page_id) = pages.first_key_value().ok_or(ExtractError::NoPages)?;
    if pages.len() > 1 {
        debug!(
            pages = pages.len(),
            "only the first page is read; later pages are ignored"
        );
    }

    let tokens = tokenize_page(&document, page_id)?;
    let text = if tokens.is_empty() {
        warn!(page_number, "no positioned text found; falling back to plain text extraction");
        match pdf_extract::extract_text_from_mem(input_pdf) {
            Ok(text) => first_page_of(&text).to_string(),
            Err(error) => {
                warn!(page_number, %error, "plain text extraction failed");
                String::new()
            }
        }
    } else {
        layout_text(&tokens)
    };

    debug!(page_number, tokens = tokens.len(), "tokenized page");
    Ok(PageContent { text, tokens })
}

/// # Errors
///
/// Same as [`read_first_page`], plus I/O errors reading `input_pdf`.
pub fn read_first_page_from_path(input_pdf: &Path) -> Result<PageContent, ExtractError> {
    let bytes = std::fs::read(input_pdf)?;
    read_first_page(&bytes)
}
