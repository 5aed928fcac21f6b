//! UK banks (Lloyds, Metro, Nationwide) and Rabobank.
//!
//! UK statements run `DD Mon YY description <out> <in> <balance>` with
//! "Money Out"/"Money In" (or "Paid out"/"Paid in") column headers.
//! Rabobank rows are Dutch-formatted (`1.234,56`) and mark direction
//! with a trailing `Af` (debit) / `Bij` (credit).

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, HookResult, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct LloydsParser {
    config: BankConfig,
}

impl LloydsParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["debit", "payment", "direct debit", "cash withdrawal", "fee"],
                credit_keywords: &["credit", "deposit", "faster payment in", "salary", "bgc"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for LloydsParser {
    fn tag(&self) -> BankTag {
        BankTag::Lloyds
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct MetroParser {
    config: BankConfig,
}

impl MetroParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["card purchase", "direct debit", "withdrawal", "charge"],
                credit_keywords: &["inward payment", "deposit", "credit", "interest"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for MetroParser {
    fn tag(&self) -> BankTag {
        BankTag::Metro
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct NationwideParser {
    config: BankConfig,
}

impl NationwideParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["direct debit", "visa purchase", "withdrawal", "payment to"],
                credit_keywords: &["bank credit", "transfer from", "deposit", "interest"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for NationwideParser {
    fn tag(&self) -> BankTag {
        BankTag::Nationwide
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

lazy_static! {
    /// `01-03-2024 Betaalautomaat ALBERT HEIJN 12,50 Af 1.234,56`
    static ref RABO_ROW: Regex = Regex::new(
        r"^\s*(?P<date>\d{1,2}-\d{1,2}-\d{4})\s+(?P<desc>.+?)\s+(?P<amount>\d{1,3}(?:\.\d{3})*,\d{2})\s+(?P<dir>Af|Bij)(?:\s+(?P<balance>\d{1,3}(?:\.\d{3})*,\d{2}))?\s*$"
    )
    .unwrap();
}

pub struct RabobankParser {
    config: BankConfig,
}

impl RabobankParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["af", "betaalautomaat", "incasso", "overboeking naar"],
                credit_keywords: &["bij", "salaris", "storting", "overboeking van"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }

    fn parse_row(line: &str, page: usize, line_idx: usize) -> Option<RawTransaction> {
        let caps = RABO_ROW.captures(line)?;
        let sign = match caps.name("dir").unwrap().as_str() {
            "Af" => SignHint::Debit,
            _ => SignHint::Credit,
        };
        let mut raw = RawTransaction::new(
            caps.name("date").unwrap().as_str(),
            caps.name("desc").unwrap().as_str(),
            caps.name("amount").unwrap().as_str(),
        )
        .with_sign(sign)
        .at(page, line_idx);
        if let Some(balance) = caps.name("balance") {
            raw.balance_text = Some(balance.as_str().to_string());
        }
        Some(raw)
    }
}

impl BankParser for RabobankParser {
    fn tag(&self) -> BankTag {
        BankTag::Rabobank
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, |line, _, page, line_idx| {
            match Self::parse_row(line, page, line_idx) {
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
    fn test_rabobank_af_row() {
        let raw = RabobankParser::parse_row(
            "01-03-2024 Betaalautomaat ALBERT HEIJN 12,50 Af 1.234,56",
            0,
            0,
        )
        .unwrap();
        assert_eq!(raw.date_text, "01-03-2024");
        assert_eq!(raw.description, "Betaalautomaat ALBERT HEIJN");
        assert_eq!(raw.amount_text, "12,50");
        assert_eq!(raw.sign, SignHint::Debit);
        assert_eq!(raw.balance_text.as_deref(), Some("1.234,56"));
    }

    #[test]
    fn test_rabobank_bij_row() {
        let raw =
            RabobankParser::parse_row("25-03-2024 Salaris WERKGEVER BV 2.500,00 Bij", 0, 0)
                .unwrap();
        assert_eq!(raw.sign, SignHint::Credit);
        assert_eq!(raw.amount_text, "2.500,00");
        assert_eq!(raw.balance_text, None);
    }

    #[test]
    fn test_non_dutch_row_falls_through() {
        assert!(RabobankParser::parse_row("01/03 CARD PURCHASE 12.50", 0, 0).is_none());
    }

    #[test]
    fn test_lloyds_keywords() {
        let parser = LloydsParser::new();
        assert_eq!(
            parser.config.resolve_sign("FASTER PAYMENT IN J DOE", None),
            SignHint::Credit
        );
        assert_eq!(
            parser.config.resolve_sign("DIRECT DEBIT BRITISH GAS", None),
            SignHint::Debit
        );
    }
}
