//! PayPal account statements.
//!
//! Activity rows name the counterparty as `From <sender>` or
//! `To <recipient>`; the preposition is the sign. Rows without either
//! lean on keywords, then on PayPal's credit-leaning default — money
//! arriving is the common case in exported activity.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct PaypalParser {
    config: BankConfig,
}

impl PaypalParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["payment to", "purchase", "fee", "withdrawal", "sent"],
                credit_keywords: &["payment from", "refund", "received", "deposit"],
                default_sign: SignHint::Credit,
                use_sections: false,
            },
        }
    }

    fn preposition_sign(description: &str) -> Option<SignHint> {
        let lower = description.trim_start().to_lowercase();
        if lower.starts_with("from ") {
            Some(SignHint::Credit)
        } else if lower.starts_with("to ") {
            Some(SignHint::Debit)
        } else {
            None
        }
    }
}

impl Default for PaypalParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for PaypalParser {
    fn tag(&self) -> BankTag {
        BankTag::Paypal
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        let mut rows = table_then_lines(doc, ctx, &self.config, noop_hook);

        for raw in &mut rows {
            if raw.sign != SignHint::Explicit {
                if let Some(sign) = Self::preposition_sign(&raw.description) {
                    raw.sign = sign;
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_is_credit() {
        assert_eq!(
            PaypalParser::preposition_sign("From Jane Smith"),
            Some(SignHint::Credit)
        );
    }

    #[test]
    fn test_to_is_debit() {
        assert_eq!(
            PaypalParser::preposition_sign("To Acme Webshop"),
            Some(SignHint::Debit)
        );
    }

    #[test]
    fn test_other_descriptions_undecided() {
        assert_eq!(PaypalParser::preposition_sign("Currency conversion"), None);
        // "Tomorrow Labs" must not read as "To ...".
        assert_eq!(PaypalParser::preposition_sign("Tomorrow Labs refund"), None);
    }

    #[test]
    fn test_default_leans_credit() {
        let parser = PaypalParser::new();
        assert_eq!(
            parser.config.resolve_sign("Currency conversion", None),
            SignHint::Credit
        );
    }
}
