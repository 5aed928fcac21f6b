//! Commonwealth Bank of Australia statements.
//!
//! Rows carry the running balance after the transaction amount, with
//! the bank's `CR`/`DR` convention on the balance column:
//! `05 Jul Transfer to J Smith 250.00 1,234.56 CR`. When two amounts
//! end a line, the transaction amount is the second-to-last and the
//! balance is the last — never the other way around.

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::amounts::find_amounts;
use crate::parse::line::{BankConfig, HookResult};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    static ref ROW_START: Regex =
        Regex::new(r"^\s*(?P<date>\d{1,2}\s+[A-Za-z]{3,9}|\d{1,2}/\d{1,2})\s+(?P<rest>.+)$")
            .unwrap();
}

pub struct CommonwealthParser {
    config: BankConfig,
}

impl CommonwealthParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["transfer to", "withdrawal", "purchase", "payment to", "fee"],
                credit_keywords: &[
                    "transfer from",
                    "deposit",
                    "salary",
                    "credit interest",
                    "refund",
                ],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl Default for CommonwealthParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonwealthParser {
    fn parse_row(&self, line: &str, page: usize, line_idx: usize) -> Option<RawTransaction> {
        let caps = ROW_START.captures(line)?;
        let rest = caps.name("rest").unwrap();
        let amounts = find_amounts(rest.as_str());
        if amounts.len() < 2 {
            return None;
        }

        // Last amount must close the line, or this is not a
        // balance-carrying row.
        let (_, last_range) = &amounts[amounts.len() - 1];
        if !rest.as_str()[last_range.end..].trim().is_empty() {
            return None;
        }

        let (txn, txn_range) = &amounts[amounts.len() - 2];
        let (_, balance_range) = &amounts[amounts.len() - 1];
        let description = rest.as_str()[..txn_range.start].trim();
        if description.is_empty() {
            return None;
        }

        let sign = match txn.sign {
            crate::parse::amounts::AmountSign::Unsigned => {
                self.config.resolve_sign(description, None)
            }
            _ => SignHint::Explicit,
        };

        let balance_text = rest.as_str()[balance_range.start..balance_range.end].to_string();

        Some(
            RawTransaction::new(
                caps.name("date").unwrap().as_str(),
                description,
                &rest.as_str()[txn_range.start..txn_range.end],
            )
            .with_sign(sign)
            .with_balance(balance_text)
            .at(page, line_idx),
        )
    }
}

impl BankParser for CommonwealthParser {
    fn tag(&self) -> BankTag {
        BankTag::Commonwealth
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
