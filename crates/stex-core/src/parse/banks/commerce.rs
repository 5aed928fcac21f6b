//! Commerce Bank statements.
//!
//! Besides the usual dated rows, Commerce prints paid checks as a
//! four-column table: `MM-DD <check#> <amount> <reference>`. Check
//! rows are always debits and get a synthesized `CHECK <n>`
//! description because the table has no text column.

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, HookResult};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    /// `05-12 1001 75.00 00012576589` — date, check number, amount,
    /// long reference. The reference length keeps ordinary rows out.
    static ref CHECK_ROW: Regex = Regex::new(
        r"^\s*(?P<date>\d{1,2}-\d{1,2})\s+(?P<check>\d{3,6})\*?\s+(?P<amount>[\d,]+\.\d{2})\s+(?P<ref>\d{8,15})\s*$"
    )
    .unwrap();
}

pub struct CommerceParser {
    config: BankConfig,
}

impl CommerceParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "check", "debit", "purchase", "fee"],
                credit_keywords: &["deposit", "credit", "interest"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }

    fn parse_check_row(line: &str, page: usize, line_idx: usize) -> Option<RawTransaction> {
        let caps = CHECK_ROW.captures(line)?;
        Some(
            RawTransaction::new(
                caps.name("date").unwrap().as_str(),
                format!("CHECK {}", caps.name("check").unwrap().as_str()),
                caps.name("amount").unwrap().as_str(),
            )
            .with_sign(SignHint::Debit)
            .at(page, line_idx),
        )
    }
}

impl Default for CommerceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for CommerceParser {
    fn tag(&self) -> BankTag {
        BankTag::Commerce
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, |line, _, page, line_idx| {
            match Self::parse_check_row(line, page, line_idx) {
                Some(raw) => HookResult::Take(raw),
                None => HookResult::Pass,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_row() {
        let raw = CommerceParser::parse_check_row("05-12 1001 75.00 00012576589", 0, 0).unwrap();
        assert_eq!(raw.date_text, "05-12");
        assert_eq!(raw.description, "CHECK 1001");
        assert_eq!(raw.amount_text, "75.00");
        assert_eq!(raw.sign, SignHint::Debit);
    }

    #[test]
    fn test_check_row_with_out_of_sequence_marker() {
        let raw =
            CommerceParser::parse_check_row("05-14 1003* 120.50 00012576601", 0, 0).unwrap();
        assert_eq!(raw.description, "CHECK 1003");
    }

    #[test]
    fn test_ordinary_row_not_a_check() {
        assert!(CommerceParser::parse_check_row("05-12 GROCERY STORE 75.00", 0, 0).is_none());
        // Short trailing number is a row amount, not a check reference.
        assert!(CommerceParser::parse_check_row("05-12 1001 75.00 12.00", 0, 0).is_none());
    }
}
