//! Shared regex building blocks and the generic transaction-line shapes.
//!
//! Every regex here has one name and matches one shape; bank modules
//! add their own variants on top rather than widening these.

use lazy_static::lazy_static;
use regex::Regex;

/// A numeric or `D Mon` date token at the start of a line.
pub const DATE_PAT: &str =
    r"\d{1,2}[/\-.]\d{1,2}(?:[/\-.]\d{2,4})?|\d{1,2}\s+[A-Za-z]{3,9}|[A-Za-z]{3,9}\s+\d{1,2}";

/// A monetary token, optionally parenthesized/signed/suffixed.
pub const AMOUNT_PAT: &str =
    r"\(?-?[£€$]?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}\)?(?:\s?(?:CR|DR|Cr|Dr))?";

lazy_static! {
    /// `<date> <description> <amount>`
    pub static ref LINE_DATE_DESC_AMOUNT: Regex = Regex::new(&format!(
        r"^\s*(?P<date>{DATE_PAT})\s+(?P<desc>.+?)\s+(?P<amount>{AMOUNT_PAT})\s*$"
    ))
    .unwrap();

    /// `<date> <ref> <description> <amount> [<balance>]`
    pub static ref LINE_DATE_REF_DESC_AMOUNT_BALANCE: Regex = Regex::new(&format!(
        r"^\s*(?P<date>{DATE_PAT})\s+(?P<ref>\d{{3,12}})\s+(?P<desc>\D.*?)\s+(?P<amount>{AMOUNT_PAT})(?:\s+(?P<balance>{AMOUNT_PAT}))?\s*$"
    ))
    .unwrap();

    /// `<date> <description> <amount> <balance>`
    pub static ref LINE_DATE_DESC_AMOUNT_BALANCE: Regex = Regex::new(&format!(
        r"^\s*(?P<date>{DATE_PAT})\s+(?P<desc>.+?)\s+(?P<amount>{AMOUNT_PAT})\s+(?P<balance>{AMOUNT_PAT})\s*$"
    ))
    .unwrap();

    /// `<date> <description> <debit> <credit> <balance>`
    pub static ref LINE_DATE_DESC_DEBIT_CREDIT_BALANCE: Regex = Regex::new(&format!(
        r"^\s*(?P<date>{DATE_PAT})\s+(?P<desc>.+?)\s+(?P<debit>{AMOUNT_PAT})\s+(?P<credit>{AMOUNT_PAT})\s+(?P<balance>{AMOUNT_PAT})\s*$"
    ))
    .unwrap();

    /// A line that is a date token and nothing else (multi-line rows).
    pub static ref LONE_DATE: Regex =
        Regex::new(&format!(r"^\s*(?P<date>{DATE_PAT})\s*$")).unwrap();

    /// A line that is a single amount (amount trailing on next line).
    pub static ref LONE_AMOUNT: Regex =
        Regex::new(&format!(r"^\s*(?P<amount>{AMOUNT_PAT})\s*$")).unwrap();
}
