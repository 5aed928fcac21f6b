//! Structured-table strategy: extract from grids the acquisition layer
//! already detected.

use crate::models::{RawTransaction, StatementContext};
use crate::parse::table::extract_from_tables;
use crate::pdf::StatementDocument;

/// Extract from every detected table with a recognizable header.
pub fn extract(doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
    extract_from_tables(doc, ctx)
}
