//! Transaction parsing: shared utilities and the per-bank parsers.

pub mod amounts;
pub mod banks;
pub mod dates;
pub mod line;
pub mod patterns;
pub mod table;
pub mod text;

pub use banks::parser_for;
pub use line::BankConfig;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::pdf::StatementDocument;

/// A bank-specific extraction strategy.
///
/// Implementations are pure over the document and context, never
/// panic on malformed rows, and return an empty vec rather than an
/// error — dispatch falls through to the generic cascade either way.
pub trait BankParser {
    fn tag(&self) -> BankTag;

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction>;
}

/// The standard two-mode flow: table mode first, line mode when the
/// tables yield nothing.
pub(crate) fn table_then_lines<F>(
    doc: &StatementDocument,
    ctx: &StatementContext,
    cfg: &BankConfig,
    hook: F,
) -> Vec<RawTransaction>
where
    F: FnMut(&str, Option<text::Section>, usize, usize) -> line::HookResult,
{
    let mut rows = table::extract_from_tables(doc, ctx);
    for row in &mut rows {
        if row.sign == SignHint::Unknown {
            row.sign = cfg.resolve_sign(&row.description, None);
        }
    }
    if !rows.is_empty() {
        return rows;
    }
    line::extract_lines(doc, ctx, cfg, hook)
}
