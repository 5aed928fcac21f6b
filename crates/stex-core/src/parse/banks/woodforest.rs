//! Woodforest National Bank statements.
//!
//! Rows put the numbers before the words: `MM-DD <credit> <debit>
//! <balance> DESCRIPTION`, with `0.00` printed for the empty side.
//! Rows that omit a column entirely carry two numbers — amount and
//! balance — and the description decides the side.

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::amounts::{AMOUNT_TOKEN, parse_amount};
use crate::parse::line::{BankConfig, HookResult};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    /// `02-01 203.00 205.01 DEPOSIT` — date, 2-3 numbers, then words.
    static ref NUMBERS_FIRST_ROW: Regex = Regex::new(
        r"^\s*(?P<date>\d{1,2}-\d{1,2})\s+(?P<nums>(?:\(?-?\$?[\d,]+\.\d{2}\)?\s+){2,3})(?P<desc>[A-Za-z#].*)$"
    )
    .unwrap();
}

pub struct WoodforestParser {
    config: BankConfig,
}

impl WoodforestParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["purchase", "withdrawal", "debit", "check", "fee", "pos"],
                credit_keywords: &["deposit", "credit", "payroll", "refund"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }

    fn parse_row(&self, line: &str, page: usize, line_idx: usize) -> Option<RawTransaction> {
        let caps = NUMBERS_FIRST_ROW.captures(line)?;
        let date = caps.name("date").unwrap().as_str();
        let desc = caps.name("desc").unwrap().as_str().trim();

        let nums: Vec<&str> = AMOUNT_TOKEN
            .find_iter(caps.name("nums").unwrap().as_str())
            .map(|m| m.as_str())
            .collect();

        let zero = |s: &str| parse_amount(s).map(|a| a.value.is_zero()).unwrap_or(true);

        let (amount_text, sign, balance_text) = match nums.as_slice() {
            // Full credit/debit/balance triple; 0.00 marks the absent side.
            [credit, debit, balance] => {
                if !zero(credit) {
                    (credit.to_string(), SignHint::Credit, balance.to_string())
                } else if !zero(debit) {
                    (debit.to_string(), SignHint::Debit, balance.to_string())
                } else {
                    return None;
                }
            }
            // One money column omitted: amount then balance.
            [amount, balance] => {
                if zero(amount) {
                    return None;
                }
                let sign = self.config.resolve_sign(desc, None);
                (amount.to_string(), sign, balance.to_string())
            }
            _ => return None,
        };

        Some(
            RawTransaction::new(date, desc, amount_text)
                .with_sign(sign)
                .with_balance(balance_text)
                .at(page, line_idx),
        )
    }
}

impl Default for WoodforestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for WoodforestParser {
    fn tag(&self) -> BankTag {
        BankTag::Woodforest
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, |line, _, page, line_idx| {
            match self.parse_row(line, page, line_idx) {
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
    fn test_two_number_deposit_row() {
        let parser = WoodforestParser::new();
        let raw = parser.parse_row("02-01 203.00 205.01 DEPOSIT", 0, 0).unwrap();
        assert_eq!(raw.date_text, "02-01");
        assert_eq!(raw.description, "DEPOSIT");
        assert_eq!(raw.amount_text, "203.00");
        assert_eq!(raw.sign, SignHint::Credit);
        assert_eq!(raw.balance_text.as_deref(), Some("205.01"));
    }

    #[test]
    fn test_three_number_debit_row() {
        let parser = WoodforestParser::new();
        let raw = parser
            .parse_row("02-03 0.00 45.00 160.01 POS PURCHASE GROCERY", 0, 0)
            .unwrap();
        assert_eq!(raw.amount_text, "45.00");
        assert_eq!(raw.sign, SignHint::Debit);
        assert_eq!(raw.balance_text.as_deref(), Some("160.01"));
    }

    #[test]
    fn test_three_number_credit_row() {
        let parser = WoodforestParser::new();
        let raw = parser
            .parse_row("02-05 500.00 0.00 660.01 DIRECT DEPOSIT PAYROLL", 0, 0)
            .unwrap();
        assert_eq!(raw.amount_text, "500.00");
        assert_eq!(raw.sign, SignHint::Credit);
    }

    #[test]
    fn test_all_zero_row_rejected() {
        let parser = WoodforestParser::new();
        assert!(parser.parse_row("02-07 0.00 0.00 660.01 VOID", 0, 0).is_none());
    }

    #[test]
    fn test_ordinary_lines_fall_through() {
        let parser = WoodforestParser::new();
        assert!(parser.parse_row("Beginning Balance 2.01", 0, 0).is_none());
    }
}
