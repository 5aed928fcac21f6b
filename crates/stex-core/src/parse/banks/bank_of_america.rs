//! Bank of America checking statements.
//!
//! Activity is sectioned — "Deposits and other additions", then
//! "Withdrawals and other subtractions", then service fees — with
//! `MM/DD/YY description amount` rows inside each.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct BankOfAmericaParser {
    config: BankConfig,
}

impl BankOfAmericaParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &[
                    "checkcard",
                    "purchase",
                    "withdrawal",
                    "payment",
                    "fee",
                    "keep the change",
                ],
                credit_keywords: &["deposit", "des:payroll", "direct deposit", "refund", "zelle from"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl Default for BankOfAmericaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for BankOfAmericaParser {
    fn tag(&self) -> BankTag {
        BankTag::BankOfAmerica
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::line::match_generic_line;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_checkcard_row_is_debit() {
        let parser = BankOfAmericaParser::new();
        let raw = match_generic_line(
            "01/17/24 CHECKCARD 0116 STARBUCKS SEATTLE WA 6.45",
            0,
            0,
            &parser.config,
            None,
        )
        .unwrap();
        assert_eq!(raw.sign, SignHint::Debit);
        assert_eq!(raw.date_text, "01/17/24");
    }

    #[test]
    fn test_zelle_from_is_credit() {
        let parser = BankOfAmericaParser::new();
        let raw = match_generic_line(
            "01/19/24 Zelle from SMITH JOHN Conf# abc123 75.00",
            0,
            0,
            &parser.config,
            None,
        )
        .unwrap();
        assert_eq!(raw.sign, SignHint::Credit);
    }
}
