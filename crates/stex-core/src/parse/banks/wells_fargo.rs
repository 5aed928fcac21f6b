//! Wells Fargo checking and savings statements.
//!
//! The activity table runs `MM/DD description [deposits] [withdrawals]
//! [balance]`, split under "Deposits and Additions" / "Withdrawals and
//! Subtractions" headings on older layouts. Section headings carry the
//! sign; the amount column itself is unsigned.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct WellsFargoParser {
    config: BankConfig,
}

impl WellsFargoParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &[
                    "purchase",
                    "withdrawal",
                    "payment",
                    "fee",
                    "check",
                    "bill pay",
                    "atm",
                ],
                credit_keywords: &[
                    "deposit",
                    "direct dep",
                    "payroll",
                    "interest payment",
                    "refund",
                    "reversal",
                ],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl Default for WellsFargoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for WellsFargoParser {
    fn tag(&self) -> BankTag {
        BankTag::WellsFargo
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}
