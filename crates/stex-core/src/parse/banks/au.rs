//! Bendigo Bank statements: `DD/MM/YYYY description <debit> <credit>
//! <balance>` rows, regional date order, no layout quirks.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct BendigoParser {
    config: BankConfig,
}

impl BendigoParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "eftpos", "payment to", "transfer to", "fee"],
                credit_keywords: &["deposit", "salary", "transfer from", "interest"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl Default for BendigoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for BendigoParser {
    fn tag(&self) -> BankTag {
        BankTag::Bendigo
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
    fn test_debit_credit_balance_row() {
        let parser = BendigoParser::new();
        let raw = match_generic_line(
            "14/03/2024 EFTPOS WOOLWORTHS 3042 54.20 0.00 1,203.55",
            0,
            0,
            &parser.config,
            None,
        )
        .unwrap();
        assert_eq!(raw.sign, SignHint::Debit);
        assert_eq!(raw.amount_text, "54.20");
        assert_eq!(raw.balance_text.as_deref(), Some("1,203.55"));
    }
}
