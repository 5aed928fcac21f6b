//! Transaction models: raw parser candidates and normalized output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::banks::BankTag;

/// Sign information attached to a raw candidate by the producing parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignHint {
    /// Amount came from a debit column or a debit section.
    Debit,
    /// Amount came from a credit column or a credit section.
    Credit,
    /// The amount string itself carries the sign (`-`, parentheses, DR/CR).
    Explicit,
    /// No information; the normalizer keeps the parsed sign as-is.
    #[default]
    Unknown,
}

/// A candidate record emitted by a parser, before normalization.
///
/// Fields are kept as raw strings so the normalizer owns all
/// validation; an invalid candidate is dropped there, not here.
#[derive(Debug, Clone, Default)]
pub struct RawTransaction {
    /// Date text as found on the page. May be partial (`MM/DD`, `5 Jul`).
    pub date_text: String,
    /// Date already resolved by the producing parser. Set when a bank
    /// applies its own year source or component order (RBC, Westpac);
    /// the normalizer takes it over re-parsing `date_text`.
    pub resolved_date: Option<NaiveDate>,
    /// Raw description text.
    pub description: String,
    /// Raw amount text (`1,234.56`, `(42.00)`, `50.00 CR`).
    pub amount_text: String,
    /// Sign resolution hint from the producing parser.
    pub sign: SignHint,
    /// Raw running-balance text, when the statement prints one.
    pub balance_text: Option<String>,
    /// Source page index (0-based).
    pub page: usize,
    /// Source line index within the page.
    pub line: usize,
}

impl RawTransaction {
    /// Minimal constructor for the common date/description/amount triple.
    pub fn new(date_text: impl Into<String>, description: impl Into<String>, amount_text: impl Into<String>) -> Self {
        Self {
            date_text: date_text.into(),
            description: description.into(),
            amount_text: amount_text.into(),
            ..Default::default()
        }
    }

    pub fn with_sign(mut self, sign: SignHint) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.resolved_date = Some(date);
        self
    }

    pub fn with_balance(mut self, balance_text: impl Into<String>) -> Self {
        self.balance_text = Some(balance_text.into());
        self
    }

    pub fn at(mut self, page: usize, line: usize) -> Self {
        self.page = page;
        self.line = line;
        self
    }
}

/// A normalized transaction.
///
/// Negative `amount` is a debit, positive a credit. `date` is fully
/// resolved (year applied) and never in the future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// ISO transaction date.
    pub date: NaiveDate,
    /// Cleaned description, internal whitespace collapsed.
    pub description: String,
    /// Signed amount, at most 2 fractional digits.
    pub amount: Decimal,
    /// Running balance when the statement provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
}

impl Transaction {
    /// Deduplication key: `(iso date, amount to 2dp, first 50 chars)`.
    pub fn dedup_key(&self) -> (String, Decimal, String) {
        let prefix: String = self.description.chars().take(50).collect();
        (self.date.to_string(), self.amount.round_dp(2), prefix)
    }
}

/// Diagnostic output of [`crate::engine::Engine::parse_with_report`].
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    /// Normalized transactions.
    pub transactions: Vec<Transaction>,
    /// Identified institution.
    pub bank: BankTag,
    /// Name of the strategy that produced the result
    /// (`"bank:anz"`, `"fallback:tables"`, `"fallback:ocr"`, `"none"`).
    pub strategy_used: String,
    /// Human-readable diagnostics: rejected-row counts, strategy
    /// fallthroughs, known format quirks.
    pub issues: Vec<String>,
}
