//! BECU (Boeing Employees' Credit Union) statements.
//!
//! Descriptions arrive with an `External <kind> ` routing prefix that
//! carries the direction, and payroll rows end in the abbreviation
//! `- DIR DEP`. The prefix is stripped after it decides the sign; the
//! abbreviation is expanded.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

/// `(prefix, sign it implies)`. Transfer and Payment carry no
/// direction of their own; keywords and the default decide.
const EXTERNAL_PREFIXES: &[(&str, Option<SignHint>)] = &[
    ("External Deposit ", Some(SignHint::Credit)),
    ("External Withdrawal ", Some(SignHint::Debit)),
    ("External Transfer ", None),
    ("External Payment ", Some(SignHint::Debit)),
];

const DIR_DEP_SUFFIX: &str = "- DIR DEP";

pub struct BecuParser {
    config: BankConfig,
}

impl BecuParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "payment", "purchase", "fee", "transfer to"],
                credit_keywords: &["deposit", "payroll", "dividend", "transfer from"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }

    /// Strip the routing prefix and expand `- DIR DEP`, returning the
    /// cleaned description and any sign the prefix implied.
    fn rewrite_description(description: &str) -> (String, Option<SignHint>) {
        let mut desc = description.trim().to_string();
        let mut implied = None;

        for (prefix, sign) in EXTERNAL_PREFIXES {
            if let Some(rest) = desc.strip_prefix(prefix) {
                implied = *sign;
                desc = rest.trim_start().to_string();
                break;
            }
        }

        if let Some(head) = desc.strip_suffix(DIR_DEP_SUFFIX) {
            desc = format!("{}- Direct Deposit", head);
            if implied.is_none() {
                implied = Some(SignHint::Credit);
            }
        }

        (desc, implied)
    }
}

impl Default for BecuParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for BecuParser {
    fn tag(&self) -> BankTag {
        BankTag::Becu
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        let mut rows = table_then_lines(doc, ctx, &self.config, noop_hook);

        for raw in &mut rows {
            let (desc, implied) = Self::rewrite_description(&raw.description);
            raw.description = desc;
            // The prefix knows the direction better than the default
            // did; explicit notation still wins.
            if raw.sign != SignHint::Explicit {
                if let Some(sign) = implied {
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
    fn test_external_deposit_prefix() {
        let (desc, sign) = BecuParser::rewrite_description("External Deposit ACME CORP - DIR DEP");
        assert_eq!(desc, "ACME CORP - Direct Deposit");
        assert_eq!(sign, Some(SignHint::Credit));
    }

    #[test]
    fn test_external_withdrawal_prefix() {
        let (desc, sign) =
            BecuParser::rewrite_description("External Withdrawal VENMO PAYMENT");
        assert_eq!(desc, "VENMO PAYMENT");
        assert_eq!(sign, Some(SignHint::Debit));
    }

    #[test]
    fn test_external_transfer_keeps_sign_open() {
        let (desc, sign) = BecuParser::rewrite_description("External Transfer SAVINGS 0042");
        assert_eq!(desc, "SAVINGS 0042");
        assert_eq!(sign, None);
    }

    #[test]
    fn test_plain_description_untouched() {
        let (desc, sign) = BecuParser::rewrite_description("DEBIT CARD GROCERY OUTLET");
        assert_eq!(desc, "DEBIT CARD GROCERY OUTLET");
        assert_eq!(sign, None);
    }

    #[test]
    fn test_dir_dep_without_prefix() {
        let (desc, sign) = BecuParser::rewrite_description("BOEING COMPANY - DIR DEP");
        assert_eq!(desc, "BOEING COMPANY - Direct Deposit");
        assert_eq!(sign, Some(SignHint::Credit));
    }
}
