//! Monese statements.
//!
//! Each transaction shows two dates — processed date and payment
//! date — and a signed amount followed by the balance. The dates
//! either share the row or the processed date sits alone on the line
//! above. The processed (first) date is the transaction date; the
//! second is reference only.

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::amounts::{AmountSign, parse_amount};
use crate::parse::line::{BankConfig, HookResult};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    /// `12/03/2024 14/03/2024 TESCO STORES -23.50 476.50`
    static ref TWO_DATE_ROW: Regex = Regex::new(
        r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{2,4})\s+(?P<ref_date>\d{1,2}/\d{1,2}/\d{2,4})\s+(?P<desc>.+?)\s+(?P<amount>[+-]?[£€]?[\d,]+\.\d{2})\s+(?P<balance>[£€]?[\d,]+\.\d{2})\s*$"
    )
    .unwrap();

    /// A processed date alone on its line.
    static ref LONE_ROW_DATE: Regex =
        Regex::new(r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{2,4})\s*$").unwrap();

    /// The continuation: payment date, description, amount, balance.
    static ref CONTINUATION_ROW: Regex = Regex::new(
        r"^\s*(?:\d{1,2}/\d{1,2}/\d{2,4}\s+)?(?P<desc>\D.+?)\s+(?P<amount>[+-][£€]?[\d,]+\.\d{2})\s+(?P<balance>[£€]?[\d,]+\.\d{2})\s*$"
    )
    .unwrap();
}

pub struct MoneseParser {
    config: BankConfig,
}

impl MoneseParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["payment", "purchase", "withdrawal", "fee"],
                credit_keywords: &["top-up", "topup", "received", "refund"],
                // Monese prints explicit +/- signs; the default rarely
                // decides anything.
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }

    fn sign_of(amount_text: &str) -> SignHint {
        match parse_amount(amount_text).map(|a| a.sign) {
            Some(AmountSign::Unsigned) | None => SignHint::Unknown,
            Some(_) => SignHint::Explicit,
        }
    }
}

impl Default for MoneseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for MoneseParser {
    fn tag(&self) -> BankTag {
        BankTag::Monese
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        // Processed date waiting for its continuation line.
        let mut pending_date: Option<String> = None;

        table_then_lines(doc, ctx, &self.config, |line, _, page, line_idx| {
            if let Some(caps) = TWO_DATE_ROW.captures(line) {
                pending_date = None;
                let raw = RawTransaction::new(
                    caps.name("date").unwrap().as_str(),
                    caps.name("desc").unwrap().as_str(),
                    caps.name("amount").unwrap().as_str(),
                )
                .with_sign(Self::sign_of(caps.name("amount").unwrap().as_str()))
                .with_balance(caps.name("balance").unwrap().as_str())
                .at(page, line_idx);
                return HookResult::Take(raw);
            }

            if let Some(caps) = LONE_ROW_DATE.captures(line) {
                pending_date = Some(caps.name("date").unwrap().as_str().to_string());
                return HookResult::Skip;
            }

            if let Some(date) = pending_date.take() {
                if let Some(caps) = CONTINUATION_ROW.captures(line) {
                    let raw = RawTransaction::new(
                        date,
                        caps.name("desc").unwrap().as_str(),
                        caps.name("amount").unwrap().as_str(),
                    )
                    .with_sign(Self::sign_of(caps.name("amount").unwrap().as_str()))
                    .with_balance(caps.name("balance").unwrap().as_str())
                    .at(page, line_idx);
                    return HookResult::Take(raw);
                }
            }

            HookResult::Pass
        })
    }
}
