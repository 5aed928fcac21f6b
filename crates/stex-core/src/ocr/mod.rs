//! OCR path for image-based statements.
//!
//! The backend is optional twice over: compile-time behind the `ocr`
//! cargo feature, and run-time behind the model directory. Either
//! absence yields [`OcrError::Unavailable`](crate::error::OcrError),
//! which is fatal only when OCR was the last strategy standing.

mod engine;

pub use engine::OcrEngine;

use crate::pdf::{Line, TextSpan};

/// Words below this confidence (percent) are discarded.
pub const MIN_WORD_CONFIDENCE: f32 = 30.0;

/// Header vocabulary that must never survive into a description.
pub const HEADER_TOKENS: &[&str] = &["date", "description", "debit", "credit", "balance", "amount"];

/// A recognized word with its position and confidence (percent).
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub conf: f32,
}

/// Result of recognizing one page image.
#[derive(Debug, Clone, Default)]
pub struct OcrResult {
    /// Words in reading order.
    pub words: Vec<OcrWord>,
    /// Page dimensions in pixels.
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Drop unreliable words and sort the rest top-to-bottom,
    /// left-to-right.
    pub fn finish(mut self) -> Self {
        self.words.retain(|w| w.conf >= MIN_WORD_CONFIDENCE);
        self.words.sort_by(|a, b| {
            let row_a = (a.y0 / 20.0) as i32;
            let row_b = (b.y0 / 20.0) as i32;
            row_a
                .cmp(&row_b)
                .then(a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal))
        });
        self
    }

    /// Cluster words into text lines compatible with the vector path,
    /// so the column-clustered extractor runs unchanged on OCR output.
    ///
    /// OCR y jitter is larger than vector text positioning, so the
    /// band tolerance scales with median word height.
    pub fn to_lines(&self) -> Vec<Line> {
        if self.words.is_empty() {
            return Vec::new();
        }

        let mut heights: Vec<f32> = self.words.iter().map(|w| w.y1 - w.y0).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let tolerance = (heights[heights.len() / 2] / 2.0).max(4.0);

        let spans: Vec<TextSpan> = self
            .words
            .iter()
            .map(|w| TextSpan {
                text: w.text.clone(),
                x0: w.x0,
                y0: w.y0,
                x1: w.x1,
                y1: w.y1,
                conf: Some(w.conf),
            })
            .collect();

        crate::pdf::group_lines_with_tolerance(&spans, tolerance)
    }
}

/// True for a bare column-header word.
pub fn is_header_token(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    HEADER_TOKENS.iter().any(|t| lower == *t)
}
