//! Positioned-text layer: content-stream walking, line grouping, and
//! grid detection.
//!
//! The walker tracks the PDF text state machine (`BT`/`ET`, `Tf`,
//! `Td`/`TD`/`Tm`/`T*`, `Tj`/`TJ`/`'`/`"`) and emits one [`TextSpan`]
//! per show operation. Glyph metrics are approximated: each character
//! advances `font_size * 0.5`, which is accurate enough to order spans
//! and cluster columns, the only uses downstream.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

/// A positioned text fragment on a page.
///
/// Coordinates are PDF points with the origin at the top-left of the
/// page (the walker flips the native bottom-left axis).
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// OCR word confidence in percent; `None` for vector text.
    pub conf: Option<f32>,
}

impl TextSpan {
    pub fn y_center(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

/// Spans sharing a y-band, ordered left to right.
#[derive(Debug, Clone)]
pub struct Line {
    pub spans: Vec<TextSpan>,
    /// Span texts joined with single spaces.
    pub text: String,
    pub y: f32,
}

/// A rectangular grid recovered from aligned lines.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Index into `cells` of the recognized header row, when present.
    pub header_row: Option<usize>,
    pub cells: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows below the header (all rows when no header was recognized).
    pub fn data_rows(&self) -> &[Vec<String>] {
        match self.header_row {
            Some(h) if h + 1 <= self.cells.len() => &self.cells[h + 1..],
            _ => &self.cells,
        }
    }
}

/// Two spans whose y-centers differ by no more than this share a line.
pub(crate) const LINE_Y_TOLERANCE: f32 = 2.0;

/// Approximate glyph advance as a fraction of font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Column anchors within this distance are considered the same column.
const COLUMN_SNAP: f32 = 3.0;

/// Minimum consecutive aligned lines before a grid is reported.
const MIN_TABLE_ROWS: usize = 3;

// ---------------------------------------------------------------------------
// Content-stream walker
// ---------------------------------------------------------------------------

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Mutable state tracked while walking a page's content stream.
struct TextState {
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    char_spacing: f32,
    word_spacing: f32,
    horiz_scale: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_size: 0.0,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horiz_scale: 1.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Rendered size accounting for the text matrix vertical scale.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        let size = (self.font_size * scale).abs();
        if size > 0.0 { size } else { 10.0 }
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate_line(0.0, -leading);
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn advance_after_show(&mut self, text: &str) {
        let mut dx = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale + self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        self.advance_x(dx);
    }
}

fn num(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Decode a PDF string operand without font machinery: UTF-16BE when
/// BOM-prefixed, Latin-1 otherwise. Statements that need real CMap
/// decoding are covered by the logical-text path instead.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Walk one page's content stream and return positioned spans with the
/// y axis flipped to a top-left origin.
pub(crate) fn extract_spans(
    doc: &Document,
    page_id: ObjectId,
    page_height: f32,
) -> Result<Vec<TextSpan>, lopdf::Error> {
    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();
    let mut in_text = false;

    fn emit(spans: &mut Vec<TextSpan>, state: &TextState, page_height: f32, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let size = state.effective_font_size();
        let width = text.chars().count() as f32
            * state.font_size
            * APPROX_CHAR_WIDTH_RATIO
            * state.horiz_scale;
        let x = state.x();
        let y = page_height - state.y();
        spans.push(TextSpan {
            text: text.to_string(),
            x0: x,
            y0: y - size,
            x1: x + width,
            y1: y,
            conf: None,
        });
    }

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "ET" => in_text = false,
            "Tf" => {
                if let Some(size) = op.operands.get(1).and_then(num) {
                    state.font_size = size;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) =
                    (op.operands.first().and_then(num), op.operands.get(1).and_then(num))
                {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) =
                    (op.operands.first().and_then(num), op.operands.get(1).and_then(num))
                {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "Tm" => {
                let vals: Vec<f32> = op.operands.iter().filter_map(num).collect();
                if vals.len() == 6 {
                    state.line_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
                    state.text_matrix = state.line_matrix;
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(l) = op.operands.first().and_then(num) {
                    state.leading = l;
                }
            }
            "Tc" => {
                if let Some(c) = op.operands.first().and_then(num) {
                    state.char_spacing = c;
                }
            }
            "Tw" => {
                if let Some(w) = op.operands.first().and_then(num) {
                    state.word_spacing = w;
                }
            }
            "Tz" => {
                if let Some(z) = op.operands.first().and_then(num) {
                    state.horiz_scale = z / 100.0;
                }
            }
            "Tj" if in_text => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let text = decode_pdf_string(bytes);
                    emit(&mut spans, &state, page_height, &text);
                    state.advance_after_show(&text);
                }
            }
            "'" if in_text => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let text = decode_pdf_string(bytes);
                    emit(&mut spans, &state, page_height, &text);
                    state.advance_after_show(&text);
                }
            }
            "\"" if in_text => {
                if let Some(w) = op.operands.first().and_then(num) {
                    state.word_spacing = w;
                }
                if let Some(c) = op.operands.get(1).and_then(num) {
                    state.char_spacing = c;
                }
                state.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    let text = decode_pdf_string(bytes);
                    emit(&mut spans, &state, page_height, &text);
                    state.advance_after_show(&text);
                }
            }
            "TJ" if in_text => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    // Adjacent array elements of one TJ belong to one
                    // visual run; emit them as a single span so amounts
                    // kerned glyph-by-glyph stay whole.
                    let start_x = state.x();
                    let start_y = state.y();
                    let mut run = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                let text = decode_pdf_string(bytes);
                                state.advance_after_show(&text);
                                run.push_str(&text);
                            }
                            Object::Integer(_) | Object::Real(_) => {
                                if let Some(adj) = num(item) {
                                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                                    state.advance_x(dx);
                                    // A large negative kern is a layout gap.
                                    if dx > state.font_size * APPROX_CHAR_WIDTH_RATIO {
                                        run.push(' ');
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                    if !run.trim().is_empty() {
                        let size = state.effective_font_size();
                        let y = page_height - start_y;
                        spans.push(TextSpan {
                            text: run,
                            x0: start_x,
                            y0: y - size,
                            x1: state.x().max(start_x + size),
                            y1: y,
                            conf: None,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    trace!("extracted {} spans from page content", spans.len());
    Ok(spans)
}

// ---------------------------------------------------------------------------
// Line grouping and layout text
// ---------------------------------------------------------------------------

/// Group spans into lines by y-band, then order each line by x.
pub(crate) fn group_lines(spans: &[TextSpan]) -> Vec<Line> {
    group_lines_with_tolerance(spans, LINE_Y_TOLERANCE)
}

pub(crate) fn group_lines_with_tolerance(spans: &[TextSpan], tolerance: f32) -> Vec<Line> {
    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        a.y_center()
            .partial_cmp(&b.y_center())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    let mut band_y = f32::NEG_INFINITY;

    for span in sorted {
        if (span.y_center() - band_y).abs() <= tolerance {
            lines.last_mut().unwrap().push(span.clone());
        } else {
            lines.push(vec![span.clone()]);
        }
        // Chain against the latest member so slightly sloped baselines
        // (common in OCR output) stay on one line.
        band_y = span.y_center();
    }

    lines
        .into_iter()
        .map(|mut spans| {
            spans.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
            let text = spans
                .iter()
                .map(|s| s.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let y = spans.iter().map(|s| s.y_center()).sum::<f32>() / spans.len() as f32;
            Line { spans, text, y }
        })
        .collect()
}

/// Rebuild whitespace-significant text: each span lands at a column
/// derived from its x position, preserving on-page column gaps.
pub(crate) fn layout_text(lines: &[Line]) -> String {
    // ~6pt per character matches 12pt body text at the walker's
    // approximate advance ratio.
    const CHAR_UNIT: f32 = 6.0;

    let mut out = String::new();
    for line in lines {
        let mut rendered = String::new();
        for span in &line.spans {
            let col = (span.x0 / CHAR_UNIT).max(0.0) as usize;
            if col > rendered.chars().count() {
                let pad = col - rendered.chars().count();
                rendered.extend(std::iter::repeat_n(' ', pad));
            } else if !rendered.is_empty() && !rendered.ends_with(' ') {
                rendered.push(' ');
            }
            rendered.push_str(span.text.trim_end());
        }
        out.push_str(rendered.trim_end());
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Grid detection
// ---------------------------------------------------------------------------

/// Header vocabulary used to mark a table's header row.
const HEADER_TOKENS: &[&str] = &[
    "date", "description", "narrative", "details", "particulars", "amount", "debit", "credit",
    "balance", "withdrawals", "deposits",
];

fn column_anchors(line: &Line) -> Vec<f32> {
    line.spans.iter().map(|s| s.x0).collect()
}

fn anchors_match(a: &[f32], b: &[f32]) -> bool {
    if a.len() < 2 || a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).all(|(x, y)| (x - y).abs() <= COLUMN_SNAP)
}

/// Detect rectangular grids: runs of `MIN_TABLE_ROWS`+ consecutive
/// lines whose span x-anchors coincide. Returns nothing on free-form
/// pages, which is a legitimate outcome.
pub(crate) fn detect_tables(lines: &[Line]) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run_start = 0;

    let mut flush = |start: usize, end: usize, tables: &mut Vec<Table>| {
        if end - start < MIN_TABLE_ROWS {
            return;
        }
        let cells: Vec<Vec<String>> = lines[start..end]
            .iter()
            .map(|l| l.spans.iter().map(|s| s.text.trim().to_string()).collect())
            .collect();
        let header_row = cells.iter().position(|row| {
            let hits = row
                .iter()
                .filter(|c| {
                    let c = c.to_lowercase();
                    HEADER_TOKENS.iter().any(|t| c.contains(t))
                })
                .count();
            hits >= 2
        });
        debug!("detected table: {} rows, header at {:?}", cells.len(), header_row);
        tables.push(Table { header_row, cells });
    };

    for i in 1..=lines.len() {
        let extends = i < lines.len()
            && anchors_match(&column_anchors(&lines[i - 1]), &column_anchors(&lines[i]));
        if !extends {
            flush(run_start, i, &mut tables);
            run_start = i;
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x0: x,
            y0: y - 10.0,
            x1: x + text.len() as f32 * 5.0,
            y1: y,
            conf: None,
        }
    }

    #[test]
    fn test_group_lines_y_band() {
        let spans = vec![
            span("01/15", 40.0, 100.0),
            span("COFFEE", 120.0, 101.5), // within 2pt band
            span("4.50", 400.0, 99.0),
            span("01/16", 40.0, 120.0),
        ];
        let lines = group_lines(&spans);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "01/15 COFFEE 4.50");
        assert_eq!(lines[1].text, "01/16");
    }

    #[test]
    fn test_group_lines_orders_by_x() {
        let spans = vec![span("4.50", 400.0, 50.0), span("01/15", 40.0, 50.0)];
        let lines = group_lines(&spans);
        assert_eq!(lines[0].text, "01/15 4.50");
    }

    #[test]
    fn test_detect_tables_requires_aligned_run() {
        let mut spans = Vec::new();
        for (i, y) in [100.0f32, 115.0, 130.0, 145.0].iter().enumerate() {
            spans.push(span("Date", 40.0, *y));
            spans.push(span(&format!("desc {i}"), 150.0, *y));
            spans.push(span("10.00", 400.0, *y));
        }
        let lines = group_lines(&spans);
        let tables = detect_tables(&lines);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 4);
        assert_eq!(tables[0].cells[0].len(), 3);
    }

    #[test]
    fn test_detect_tables_header_row() {
        let mut spans = Vec::new();
        let rows: [&[&str]; 4] = [
            &["Date", "Description", "Amount"],
            &["01/02", "COFFEE", "4.50"],
            &["01/03", "GROCER", "12.00"],
            &["01/04", "FUEL", "30.00"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                spans.push(span(cell, 40.0 + c as f32 * 150.0, 100.0 + r as f32 * 15.0));
            }
        }
        let lines = group_lines(&spans);
        let tables = detect_tables(&lines);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header_row, Some(0));
        assert_eq!(tables[0].data_rows().len(), 3);
    }

    #[test]
    fn test_no_table_on_freeform_text() {
        let spans = vec![
            span("Dear customer", 40.0, 100.0),
            span("your statement", 60.0, 115.0),
            span("is attached", 80.0, 130.0),
        ];
        let lines = group_lines(&spans);
        assert!(detect_tables(&lines).is_empty());
    }

    #[test]
    fn test_layout_text_preserves_columns() {
        let spans = vec![span("01/15", 12.0, 50.0), span("4.50", 300.0, 50.0)];
        let lines = group_lines(&spans);
        let text = layout_text(&lines);
        let line = text.lines().next().unwrap();
        let amount_col = line.find("4.50").unwrap();
        assert!(amount_col >= 45, "amount should sit in its x column, got {amount_col}");
    }

    #[test]
    fn test_decode_pdf_string_latin1() {
        assert_eq!(decode_pdf_string(b"COFFEE 4.50"), "COFFEE 4.50");
        assert_eq!(decode_pdf_string(&[0xA3, b'5', b'0']), "£50");
    }

    #[test]
    fn test_decode_pdf_string_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, b'A', 0x00, b'B'];
        assert_eq!(decode_pdf_string(&bytes), "AB");
    }
}
