//! Result normalizer: raw candidates in, validated ordered
//! transactions out.
//!
//! Every reject is counted rather than logged away, so the diagnostic
//! report can say how many rows each gate dropped.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{RawTransaction, SignHint, StatementContext, Transaction};
use crate::parse::amounts::{AmountSign, MAX_AMOUNT, parse_amount};
use crate::parse::dates::parse_date;
use crate::parse::text::{clean_description, is_phone_shaped};

/// Reject counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Date, amount, or description missing entirely.
    pub missing_field: usize,
    /// Date text failed to parse or landed in the future.
    pub bad_date: usize,
    /// Date text was phone-shaped noise.
    pub phone_date: usize,
    /// Amount unparsable or over the ceiling.
    pub bad_amount: usize,
    /// Description cleaned down to nothing.
    pub bad_description: usize,
    /// Rows dropped as duplicates.
    pub duplicates: usize,
}

impl NormalizeStats {
    pub fn total_rejected(&self) -> usize {
        self.missing_field
            + self.bad_date
            + self.phone_date
            + self.bad_amount
            + self.bad_description
            + self.duplicates
    }

    /// Human-readable issue lines for the diagnostic report.
    pub fn issues(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut push = |count: usize, what: &str| {
            if count > 0 {
                out.push(format!("normalizer dropped {count} row(s): {what}"));
            }
        };
        push(self.missing_field, "missing date, amount, or description");
        push(self.bad_date, "invalid or future date");
        push(self.phone_date, "phone-shaped date token");
        push(self.bad_amount, "unparsable or out-of-range amount");
        push(self.bad_description, "noise-only description");
        push(self.duplicates, "duplicate of an earlier row");
        out
    }
}

fn signed_amount(raw: &RawTransaction) -> Option<Decimal> {
    let parsed = parse_amount(&raw.amount_text)?;
    let amount = match raw.sign {
        SignHint::Debit => -parsed.value,
        SignHint::Credit => parsed.value,
        SignHint::Explicit | SignHint::Unknown => parsed.signed(false),
    };
    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        return None;
    }
    Some(amount.round_dp(2))
}

fn parse_balance(raw: &RawTransaction) -> Option<Decimal> {
    let text = raw.balance_text.as_deref()?;
    let parsed = parse_amount(text)?;
    let value = match parsed.sign {
        AmountSign::Negative => -parsed.value,
        _ => parsed.value,
    };
    Some(value.round_dp(2))
}

/// Normalize a batch of raw candidates.
///
/// Drops incomplete and invalid rows, resolves partial dates against
/// the context year, deduplicates, and sorts ascending by date with
/// input order preserved inside a date. An empty result is an
/// ordinary outcome, not an error.
pub fn normalize(
    raws: Vec<RawTransaction>,
    ctx: &StatementContext,
) -> (Vec<Transaction>, NormalizeStats) {
    let mut stats = NormalizeStats::default();
    let mut transactions: Vec<Transaction> = Vec::with_capacity(raws.len());

    for raw in raws {
        if raw.date_text.trim().is_empty() || raw.amount_text.trim().is_empty() {
            stats.missing_field += 1;
            continue;
        }

        if is_phone_shaped(&raw.date_text) {
            stats.phone_date += 1;
            continue;
        }

        let date = match raw.resolved_date.or_else(|| parse_date(&raw.date_text, ctx)) {
            Some(date) if date <= ctx.today => date,
            _ => {
                stats.bad_date += 1;
                continue;
            }
        };

        let Some(amount) = signed_amount(&raw) else {
            stats.bad_amount += 1;
            continue;
        };

        let Some(description) = clean_description(&raw.description) else {
            stats.bad_description += 1;
            continue;
        };

        transactions.push(Transaction {
            date,
            description,
            amount,
            balance: parse_balance(&raw),
        });
    }

    // Dedupe before sorting so "first occurrence" means input order.
    let mut seen = std::collections::HashSet::new();
    transactions.retain(|t| {
        let fresh = seen.insert(t.dedup_key());
        if !fresh {
            stats.duplicates += 1;
        }
        fresh
    });

    // Stable: ties keep the producing parser's order.
    transactions.sort_by_key(|t| t.date);

    debug!(
        "normalized {} transaction(s), rejected {}",
        transactions.len(),
        stats.total_rejected()
    );

    (transactions, stats)
}
