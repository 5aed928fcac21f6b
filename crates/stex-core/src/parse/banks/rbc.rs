//! Canadian banks: RBC Royal Bank and Scotiabank.
//!
//! RBC rows date themselves `D Mon` with no year anywhere near; the
//! year lives in the period header (`From December 15, 2023 to
//! January 14, 2024`) and a statement regularly spans the year
//! boundary, so each row picks its side of the period.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::dates::month_from_name;
use crate::parse::line::{BankConfig, HookResult, match_generic_line, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    /// `From <Mon> <D>, <YYYY> to <Mon> <D>, <YYYY>`.
    static ref PERIOD_HEADER: Regex = Regex::new(
        r"(?i)\bfrom\s+([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\s+to\s+([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})"
    )
    .unwrap();

    /// `20 Dec` / `5 Jan` row date.
    static ref DAY_MON: Regex =
        Regex::new(r"(?i)^\s*(\d{1,2})\s+([A-Za-z]{3,9})\.?\s*$").unwrap();
}

/// Statement period taken from the RBC header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Period {
    from_month: u32,
    from_year: i32,
    to_year: i32,
}

impl Period {
    fn find(text: &str) -> Option<Self> {
        let caps = PERIOD_HEADER.captures(text)?;
        Some(Self {
            from_month: month_from_name(&caps[1])?,
            from_year: caps[3].parse().ok()?,
            to_year: caps[6].parse().ok()?,
        })
    }

    /// Year for a row month: months at or after the period start
    /// belong to the opening year, earlier months to the closing year.
    fn year_for_month(&self, month: u32) -> i32 {
        if self.from_year == self.to_year || month >= self.from_month {
            self.from_year
        } else {
            self.to_year
        }
    }
}

pub struct RbcParser {
    config: BankConfig,
}

impl RbcParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "payment", "purchase", "fee", "e-transfer sent"],
                credit_keywords: &["deposit", "payroll", "e-transfer received", "refund"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }

    fn resolve_row_date(date_text: &str, period: Option<Period>) -> Option<NaiveDate> {
        let caps = DAY_MON.captures(date_text)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let period = period?;
        NaiveDate::from_ymd_opt(period.year_for_month(month), month, day)
    }
}

impl Default for RbcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for RbcParser {
    fn tag(&self) -> BankTag {
        BankTag::Rbc
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        let mut header = String::new();
        for page in 0..doc.page_count().min(2) {
            header.push_str(doc.page_text(page));
            header.push('\n');
            header.push_str(doc.layout_text(page));
            header.push('\n');
        }
        let period = Period::find(&header);

        table_then_lines(doc, ctx, &self.config, |line, section, page, line_idx| {
            let Some(mut raw) = match_generic_line(line, page, line_idx, &self.config, section)
            else {
                return HookResult::Pass;
            };
            if let Some(date) = Self::resolve_row_date(&raw.date_text, period) {
                raw.resolved_date = Some(date);
            }
            HookResult::Take(raw)
        })
    }
}

/// Scotiabank statements: conventional dated rows with deposit and
/// withdrawal columns, no year quirks.
pub struct ScotiabankParser {
    config: BankConfig,
}

impl ScotiabankParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "payment", "purchase", "fee", "bill payment"],
                credit_keywords: &["deposit", "payroll", "transfer in", "interest"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl Default for ScotiabankParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for ScotiabankParser {
    fn tag(&self) -> BankTag {
        BankTag::Scotiabank
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_period_header() {
        let p = Period::find("From December 15, 2023 to January 14, 2024").unwrap();
        assert_eq!(p.from_month, 12);
        assert_eq!(p.from_year, 2023);
        assert_eq!(p.to_year, 2024);
    }

    #[test]
    fn test_period_header_abbreviated() {
        let p = Period::find("Your account, From Dec 15, 2023 to Jan 14, 2024").unwrap();
        assert_eq!(p.from_month, 12);
    }

    #[test]
    fn test_rows_split_across_year_boundary() {
        let p = Period::find("From December 15, 2023 to January 14, 2024");
        assert_eq!(
            RbcParser::resolve_row_date("20 Dec", p),
            Some(NaiveDate::from_ymd_opt(2023, 12, 20).unwrap())
        );
        assert_eq!(
            RbcParser::resolve_row_date("5 Jan", p),
            Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
    }

    #[test]
    fn test_single_year_period() {
        let p = Period::find("From March 1, 2024 to March 31, 2024");
        assert_eq!(
            RbcParser::resolve_row_date("15 Mar", p),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_no_period_leaves_date_unresolved() {
        assert_eq!(RbcParser::resolve_row_date("20 Dec", None), None);
    }
}
