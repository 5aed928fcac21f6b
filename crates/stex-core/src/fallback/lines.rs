//! Generic line-regex extraction: the shared shape families applied to
//! every layout line, with no bank knowledge.
//!
//! One multi-line shape is handled here: a date-led line whose amount
//! wrapped onto the following line on its own.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::amounts::{AmountSign, find_amounts, parse_amount};
use crate::parse::dates::looks_like_date;
use crate::parse::line::{BankConfig, HookResult, extract_lines};
use crate::parse::patterns::{DATE_PAT, LONE_AMOUNT};
use crate::pdf::StatementDocument;

lazy_static! {
    /// A line starting with a date token and carrying only text after.
    static ref DATE_LED: Regex =
        Regex::new(&format!(r"^\s*(?P<date>{DATE_PAT})\s+(?P<rest>.+)$")).unwrap();
}

/// Layout-agnostic configuration: no keywords, no sections, and no
/// sign default — an unknown bank's unsigned amounts stay as printed.
fn generic_config() -> BankConfig {
    BankConfig {
        debit_keywords: &[],
        credit_keywords: &[],
        default_sign: SignHint::Unknown,
        use_sections: false,
    }
}

/// Apply the generic regex families to all lines of the document.
pub fn extract(doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
    // A date+description line with no amount, waiting for the amount
    // to trail on the next line.
    let mut pending: Option<(String, String, usize, usize)> = None;

    extract_lines(doc, ctx, &generic_config(), move |line, _, page, line_idx| {
        if let Some(caps) = LONE_AMOUNT.captures(line) {
            if let Some((date, desc, p, i)) = pending.take() {
                let amount_text = caps.name("amount").unwrap().as_str();
                let sign = match parse_amount(amount_text).map(|a| a.sign) {
                    Some(AmountSign::Unsigned) | None => SignHint::Unknown,
                    Some(_) => SignHint::Explicit,
                };
                return HookResult::Take(
                    RawTransaction::new(date, desc, amount_text).with_sign(sign).at(p, i),
                );
            }
            return HookResult::Pass;
        }

        pending = None;
        if let Some(caps) = DATE_LED.captures(line) {
            let date = caps.name("date").unwrap().as_str();
            let rest = caps.name("rest").unwrap().as_str();
            if looks_like_date(date) && find_amounts(rest).is_empty() && !rest.trim().is_empty() {
                pending = Some((date.to_string(), rest.trim().to_string(), page, line_idx));
            }
        }
        HookResult::Pass
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::line::match_generic_line;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generic_config_leaves_sign_open() {
        let cfg = generic_config();
        let raw = match_generic_line("01/05 SOMETHING 42.00", 0, 0, &cfg, None).unwrap();
        assert_eq!(raw.sign, SignHint::Unknown);
        let raw = match_generic_line("01/05 SOMETHING -42.00", 0, 0, &cfg, None).unwrap();
        assert_eq!(raw.sign, SignHint::Explicit);
    }

    #[test]
    fn test_date_led_shape() {
        let caps = DATE_LED.captures("01/05 CARD PAYMENT TO SOMEWHERE").unwrap();
        assert_eq!(&caps["date"], "01/05");
        assert_eq!(&caps["rest"], "CARD PAYMENT TO SOMEWHERE");
        assert!(find_amounts(&caps["rest"]).is_empty());
    }

    #[test]
    fn test_lone_amount_shape() {
        let caps = LONE_AMOUNT.captures("   23.50").unwrap();
        assert_eq!(caps.name("amount").unwrap().as_str().trim(), "23.50");
    }
}
