//! Westpac statements.
//!
//! Westpac's PDF producer prints full dates US-style even though the
//! bank is Australian: `07/04/2024` on a Westpac statement is July 4.
//! An ambiguous date therefore resolves as `M/D/YYYY` here, against
//! the regional convention. The engine surfaces this quirk as a
//! diagnostic issue so downstream users can see it was applied.

use crate::banks::BankTag;
use crate::models::{DateOrder, RawTransaction, SignHint, StatementContext};
use crate::parse::dates::parse_date_with_order;
use crate::parse::line::{BankConfig, HookResult, match_generic_line};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

/// Diagnostic string attached to every Westpac parse.
pub const WESTPAC_DATE_NOTE: &str =
    "westpac: ambiguous dates read as US-style M/D/YYYY (producer quirk)";

pub struct WestpacParser {
    config: BankConfig,
}

impl WestpacParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "payment", "purchase", "transfer to", "fee"],
                credit_keywords: &["deposit", "salary", "transfer from", "refund"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl Default for WestpacParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for WestpacParser {
    fn tag(&self) -> BankTag {
        BankTag::Westpac
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, |line, section, page, line_idx| {
            let Some(mut raw) = match_generic_line(line, page, line_idx, &self.config, section)
            else {
                return HookResult::Pass;
            };
            // Resolve under the forced US order and pin the result so
            // the normalizer cannot re-read it regionally. Rows whose
            // date only works D/M-first still parse (the order
            // recovers when the leading group cannot be a month).
            match parse_date_with_order(&raw.date_text, DateOrder::Mdy, ctx) {
                Some(date) => {
                    raw.resolved_date = Some(date);
                    HookResult::Take(raw)
                }
                None => HookResult::Skip,
            }
        })
    }
}

/// Resolve a Westpac date: always month-first for ambiguous tokens.
pub fn resolve_date(text: &str, ctx: &StatementContext) -> Option<chrono::NaiveDate> {
    parse_date_with_order(text, DateOrder::Mdy, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ctx() -> StatementContext {
        StatementContext {
            year: Some(2024),
            currency: Currency::Aud,
            // The document-level context is regional (DMY); Westpac's
            // parser overrides it per date token.
            date_order: DateOrder::Dmy,
            today: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        }
    }

    #[test]
    fn test_ambiguous_date_reads_us_style() {
        // July 4, not April 7.
        assert_eq!(
            resolve_date("07/04/2024", &ctx()),
            Some(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap())
        );
    }

    #[test]
    fn test_unambiguous_date_still_parses() {
        // 14 cannot be a month; the order recovers.
        assert_eq!(
            resolve_date("14/07/2024", &ctx()),
            Some(NaiveDate::from_ymd_opt(2024, 7, 14).unwrap())
        );
    }

    #[test]
    fn test_line_parses_with_us_date() {
        let parser = WestpacParser::new();
        let raw =
            match_generic_line("07/04/2024 COFFEE 4.50", 0, 0, &parser.config, None).unwrap();
        assert_eq!(raw.date_text, "07/04/2024");
        assert_eq!(raw.sign, SignHint::Debit);
        assert_eq!(
            resolve_date(&raw.date_text, &ctx()),
            Some(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap())
        );
    }
}
