//! PDF acquisition: positioned text, lines, tables, and page rasters.

mod document;
mod layout;

pub use document::StatementDocument;
pub use layout::{Line, Table, TextSpan};

pub(crate) use layout::group_lines_with_tolerance;

use crate::error::PdfError;

/// Fewer extracted characters per page than this (averaged over the
/// first three pages) marks a document as image-based.
pub const IMAGE_BASED_CHARS_PER_PAGE: usize = 100;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
