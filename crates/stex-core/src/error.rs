//! Error types for the stex-core library.

use thiserror::Error;

/// Main error type for the stex library.
#[derive(Error, Debug)]
pub enum StexError {
    /// PDF acquisition error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to opening and reading a PDF.
///
/// All three variants mean the document is unreadable as a whole;
/// per-page extraction faults are contained inside the document layer
/// and never surface here.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is password-protected and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),
}

/// Errors related to the OCR path.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No OCR backend is available (feature disabled or models missing).
    ///
    /// Surfaced only when OCR was the last remaining strategy for a
    /// document; otherwise it is downgraded to a diagnostic issue.
    #[error("OCR backend unavailable: {0}")]
    Unavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed on a page image.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// No raster could be produced for an image-based page.
    #[error("no page image: {0}")]
    NoPageImage(String),
}

/// Result type for the stex library.
pub type Result<T> = std::result::Result<T, StexError>;
