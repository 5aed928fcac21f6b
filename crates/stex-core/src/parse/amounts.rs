//! Amount parsing: currency symbols, separators, and sign notation.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Engine-wide ceiling; anything larger is noise, not money.
pub const MAX_AMOUNT: i64 = 1_000_000;

/// Sign carried by the amount text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSign {
    /// `-`, parentheses, or a `DR` suffix.
    Negative,
    /// A `CR` suffix (or an explicit `+`).
    Positive,
    /// No sign notation; column or keyword context decides.
    Unsigned,
}

/// A parsed amount with its notation-derived sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAmount {
    /// Absolute value.
    pub value: Decimal,
    pub sign: AmountSign,
}

impl ParsedAmount {
    /// Signed value, applying a fallback sign when the text carried none.
    pub fn signed(&self, default_negative: bool) -> Decimal {
        match self.sign {
            AmountSign::Negative => -self.value,
            AmountSign::Positive => self.value,
            AmountSign::Unsigned => {
                if default_negative { -self.value } else { self.value }
            }
        }
    }
}

lazy_static! {
    /// Bare monetary token inside a line: `1,234.56`, `4.50`, `(42.00)`.
    /// The word boundary stops `4250.00` from matching as `250.00`.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"\(?-?[£€$]?\s?\b(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}\)?(?:\s?(?:CR|DR|Cr|Dr)\b)?"
    )
    .unwrap();

    static ref AMOUNT_BODY: Regex = Regex::new(r"^\d+\.\d{2}$").unwrap();
}

/// Parse an amount string.
///
/// Handles currency symbols, thousands separators, parenthesized
/// negatives, leading signs, and `CR`/`DR` suffixes. Rejects values
/// over one million and anything that is not cleanly numeric.
pub fn parse_amount(text: &str) -> Option<ParsedAmount> {
    let mut s = text.trim().to_string();
    let mut sign = AmountSign::Unsigned;

    if s.starts_with('(') && s.ends_with(')') {
        sign = AmountSign::Negative;
        s = s[1..s.len() - 1].trim().to_string();
    }

    let upper = s.to_uppercase();
    if upper.ends_with("DR") {
        sign = AmountSign::Negative;
        s.truncate(s.len() - 2);
    } else if upper.ends_with("CR") {
        sign = AmountSign::Positive;
        s.truncate(s.len() - 2);
    }
    s = s.trim().to_string();

    if let Some(rest) = s.strip_prefix('-') {
        sign = AmountSign::Negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_suffix('-') {
        // Some ledgers print trailing-minus debits.
        sign = AmountSign::Negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix('+') {
        sign = AmountSign::Positive;
        s = rest.to_string();
    }

    // Strip currency symbols and whitespace, keep the separators.
    s = s
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ' ' | '\u{00a0}'))
        .collect();

    // Separator normalization: whichever of `,`/`.` sits rightmost is
    // the decimal mark, covering both `1,234.56` and Dutch `1.234,56`.
    s = match (s.rfind(','), s.rfind('.')) {
        (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(c), None) if s.len() - c - 1 == 2 => s.replace(',', "."),
        (Some(_), None) => s.replace(',', ""),
        _ => s,
    };

    if s.is_empty() || !AMOUNT_BODY.is_match(&s) {
        return None;
    }

    let value = Decimal::from_str(&s).ok()?;
    if value > Decimal::from(MAX_AMOUNT) {
        return None;
    }

    Some(ParsedAmount { value, sign })
}

/// True for tokens shaped like money (used by column classification).
pub fn looks_like_amount(text: &str) -> bool {
    parse_amount(text).is_some() && text.chars().any(|c| c.is_ascii_digit())
}

/// All monetary tokens on a line, left to right.
pub fn find_amounts(line: &str) -> Vec<(ParsedAmount, std::ops::Range<usize>)> {
    AMOUNT_TOKEN
        .find_iter(line)
        .filter_map(|m| parse_amount(m.as_str()).map(|a| (a, m.range())))
        .collect()
}
