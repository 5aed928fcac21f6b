//! Dispatch: one entry point from PDF path to normalized transactions.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::banks::{BankTag, classify};
use crate::context::extract_context;
use crate::error::{OcrError, Result, StexError};
use crate::fallback::{self, Strategy};
use crate::models::{ParseReport, StatementContext, Transaction};
use crate::normalize::{NormalizeStats, normalize};
use crate::ocr::OcrEngine;
use crate::parse::parser_for;
use crate::parse::banks::WESTPAC_DATE_NOTE;
use crate::pdf::StatementDocument;

/// Cooperative cancellation flag, honored at page and strategy
/// boundaries. Clone freely; all clones observe one flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The extraction engine.
///
/// Holds no per-document state: one engine value may serve any number
/// of sequential parses, and separate instances are fully independent
/// (the only process-wide data are compiled regexes).
#[derive(Default)]
pub struct Engine {
    ocr_model_dir: Option<PathBuf>,
    cancel: CancelToken,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding OCR models; without it the OCR strategy
    /// reports itself unavailable.
    pub fn with_ocr_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ocr_model_dir = Some(dir.into());
        self
    }

    /// Attach a caller-owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Parse a statement PDF into normalized transactions.
    ///
    /// An empty vec is a legitimate result; only an unreadable file
    /// (or OCR missing when it was the last resort) is an error.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
        self.parse_with_report(path).map(|report| report.transactions)
    }

    /// Parse with diagnostics: identified bank, winning strategy, and
    /// reject counts.
    pub fn parse_with_report(&self, path: impl AsRef<Path>) -> Result<ParseReport> {
        let path = path.as_ref();
        let doc = match StatementDocument::load(path) {
            Ok(doc) => doc,
            // A zero-page document has zero transactions; that is a
            // result, not a failure.
            Err(crate::error::PdfError::NoPages) => {
                return Ok(empty_report(
                    BankTag::Unknown,
                    vec!["pdf has no pages".to_string()],
                ));
            }
            Err(e) => return Err(e.into()),
        };
        let tag = classify(&doc);
        let ctx = extract_context(&doc, tag);

        info!(
            "parsing {}: bank={}, year={:?}, pages={}",
            path.display(),
            tag,
            ctx.year,
            doc.page_count()
        );

        self.run(&doc, tag, &ctx)
    }

    /// Dispatch over an already-loaded document.
    pub fn run(
        &self,
        doc: &StatementDocument,
        tag: BankTag,
        ctx: &StatementContext,
    ) -> Result<ParseReport> {
        let mut issues: Vec<String> = Vec::new();

        if tag == BankTag::Westpac {
            issues.push(WESTPAC_DATE_NOTE.to_string());
        }

        if let Some(parser) = parser_for(tag) {
            if self.cancelled(&mut issues) {
                return Ok(empty_report(tag, issues));
            }
            let raws = parser.extract(doc, ctx);
            let (transactions, stats) = normalize(raws, ctx);
            self.note_rejects(&mut issues, parser.tag().as_str(), &stats);
            if !transactions.is_empty() {
                debug!(
                    "bank parser {} produced {} transaction(s)",
                    tag,
                    transactions.len()
                );
                return Ok(ParseReport {
                    transactions,
                    bank: tag,
                    strategy_used: format!("bank:{tag}"),
                    issues,
                });
            }
            issues.push(format!("bank parser {tag} yielded nothing; using fallback"));
        }

        // First strategy whose rows survive normalization wins; the
        // cascade never discards a non-empty result in favor of a
        // later strategy.
        let image_based = doc.is_image_based();
        for strategy in Strategy::TEXT_CASCADE {
            if self.cancelled(&mut issues) {
                return Ok(empty_report(tag, issues));
            }
            let raws = match strategy {
                Strategy::Tables => fallback::tables::extract(doc, ctx),
                Strategy::Columns => fallback::columns::extract(doc, ctx),
                Strategy::Lines => fallback::lines::extract(doc, ctx),
                Strategy::Ocr => unreachable!("OCR is gated separately"),
            };
            let (transactions, stats) = normalize(raws, ctx);
            self.note_rejects(&mut issues, strategy.name(), &stats);
            if !transactions.is_empty() {
                return Ok(ParseReport {
                    transactions,
                    bank: tag,
                    strategy_used: strategy.name().to_string(),
                    issues,
                });
            }
        }

        // OCR: reached when the document is a scan or every text
        // strategy produced zero rows (which a scan guarantees).
        if self.cancelled(&mut issues) {
            return Ok(empty_report(tag, issues));
        }
        let engine = self.load_ocr_engine(&mut issues);
        match fallback::ocr::extract(doc, ctx, engine.as_ref()) {
            Ok(raws) => {
                let (transactions, stats) = normalize(raws, ctx);
                self.note_rejects(&mut issues, Strategy::Ocr.name(), &stats);
                if !transactions.is_empty() {
                    return Ok(ParseReport {
                        transactions,
                        bank: tag,
                        strategy_used: Strategy::Ocr.name().to_string(),
                        issues,
                    });
                }
            }
            Err(e @ OcrError::Unavailable(_)) if image_based => {
                // Nothing cheaper could have worked; surface it.
                return Err(StexError::Ocr(e));
            }
            Err(e) => {
                warn!("OCR strategy failed: {}", e);
                issues.push(format!("ocr strategy failed: {e}"));
            }
        }

        Ok(empty_report(tag, issues))
    }

    fn cancelled(&self, issues: &mut Vec<String>) -> bool {
        if self.cancel.is_cancelled() {
            issues.push("parse cancelled by caller".to_string());
            true
        } else {
            false
        }
    }

    fn load_ocr_engine(&self, issues: &mut Vec<String>) -> Option<OcrEngine> {
        let dir = self.ocr_model_dir.as_deref()?;
        match OcrEngine::from_dir(dir) {
            Ok(engine) => Some(engine),
            Err(e) => {
                issues.push(format!("ocr engine load failed: {e}"));
                None
            }
        }
    }

    fn note_rejects(&self, issues: &mut Vec<String>, source: &str, stats: &NormalizeStats) {
        for line in stats.issues() {
            issues.push(format!("{source}: {line}"));
        }
    }
}

/// The zero-transaction report: a legitimate outcome, not an error.
fn empty_report(bank: BankTag, issues: Vec<String>) -> ParseReport {
    ParseReport {
        transactions: Vec::new(),
        bank,
        strategy_used: "none".to_string(),
        issues,
    }
}

/// One-shot convenience over a default engine.
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    Engine::new().parse(path)
}

/// One-shot diagnostic parse over a default engine.
pub fn parse_with_report(path: impl AsRef<Path>) -> Result<ParseReport> {
    Engine::new().parse_with_report(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = parse("/nonexistent/statement.pdf").unwrap_err();
        assert!(matches!(err, StexError::Pdf(_)));
    }

    #[test]
    fn test_empty_report_shape() {
        let report = empty_report(BankTag::Unknown, vec!["note".to_string()]);
        assert!(report.transactions.is_empty());
        assert_eq!(report.strategy_used, "none");
        assert_eq!(report.issues, vec!["note".to_string()]);
    }
}
