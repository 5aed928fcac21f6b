//! Transaction-date parsing with statement-year resolution.
//!
//! Statement rows rarely carry a year. A partial date takes the year
//! from [`StatementContext`], then rolls back one year if that lands
//! more than 30 days past "today" — a December statement listing
//! January entries is about the turn of the year, not eleven months
//! into the future.

use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{DateOrder, StatementContext};

/// A date that parsed ambiguously under both component orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    /// True when the token also parsed under the opposite order.
    pub ambiguous: bool,
}

/// Days into the future a resolved date may sit before the year rolls back.
const FUTURE_TOLERANCE_DAYS: u64 = 30;

/// Days into the past beyond which the statement year is stale and the
/// row belongs to the following year (a January row on a statement
/// whose header names the old December year).
const PAST_TOLERANCE_DAYS: u64 = 335;

lazy_static! {
    /// `M/D`, `M-D`, `M/D/YY`, `M/D/YYYY` (component order per context).
    static ref NUMERIC_DATE: Regex =
        Regex::new(r"^(\d{1,2})[/\-](\d{1,2})(?:[/\-](\d{2,4}))?$").unwrap();

    /// Dotted European dates need all three components, or `15.01`
    /// would swallow the amount `15.01`.
    static ref NUMERIC_DATE_DOTTED: Regex =
        Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{2,4})$").unwrap();

    /// `5 Jul`, `05 July`, `5 Jul 2023`.
    static ref DAY_MONTH_NAME: Regex =
        Regex::new(r"(?i)^(\d{1,2})\s+([A-Za-z]{3,9})\.?(?:\s+(\d{4}))?$").unwrap();

    /// `Jul 5`, `July 5, 2023`.
    static ref MONTH_NAME_DAY: Regex =
        Regex::new(r"(?i)^([A-Za-z]{3,9})\.?\s+(\d{1,2})(?:,?\s+(\d{4}))?$").unwrap();

    /// ISO `2023-07-05`.
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
}

pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let months = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    months
        .iter()
        .position(|m| m.starts_with(&name) && name.len() >= 3 || *m == name)
        .map(|i| i as u32 + 1)
}

fn expand_year(raw: i32) -> i32 {
    if raw < 100 {
        if raw <= 50 { 2000 + raw } else { 1900 + raw }
    } else {
        raw
    }
}

/// Apply the statement year to a month/day pair.
///
/// The resolved date must land in the one-year window ending 30 days
/// after "today": more than 30 days ahead rolls the year back, more
/// than ~11 months behind rolls it forward (the Dec/Jan boundary case
/// where the header names the older year).
fn resolve_partial(month: u32, day: u32, ctx: &StatementContext) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(ctx.effective_year(), month, day)?;
    let horizon = ctx.today.checked_add_days(Days::new(FUTURE_TOLERANCE_DAYS))?;
    let floor = ctx.today.checked_sub_days(Days::new(PAST_TOLERANCE_DAYS))?;
    if date > horizon {
        NaiveDate::from_ymd_opt(ctx.effective_year() - 1, month, day)
    } else if date < floor {
        let forward = NaiveDate::from_ymd_opt(ctx.effective_year() + 1, month, day)?;
        if forward <= horizon { Some(forward) } else { Some(date) }
    } else {
        Some(date)
    }
}

/// Parse a transaction-date token under the context's component order.
pub fn parse_date(text: &str, ctx: &StatementContext) -> Option<NaiveDate> {
    parse_date_detailed(text, ctx).map(|p| p.date)
}

/// Like [`parse_date`] but reporting order ambiguity, which Westpac's
/// parser needs to apply its non-regional preference.
pub fn parse_date_detailed(text: &str, ctx: &StatementContext) -> Option<ParsedDate> {
    let text = text.trim();

    if let Some(caps) = ISO_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(ParsedDate { date, ambiguous: false });
    }

    if let Some(caps) = NUMERIC_DATE
        .captures(text)
        .or_else(|| NUMERIC_DATE_DOTTED.captures(text))
    {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => Some(expand_year(y.as_str().parse().ok()?)),
            None => None,
        };

        let (month, day) = match ctx.date_order {
            DateOrder::Mdy => (a, b),
            DateOrder::Dmy => (b, a),
        };
        let (alt_month, alt_day) = (day, month);
        let primary_valid = month >= 1 && month <= 12 && day >= 1 && day <= 31;
        let alt_valid = alt_month >= 1 && alt_month <= 12 && alt_day >= 1 && alt_day <= 31;

        let (month, day) = if primary_valid {
            (month, day)
        } else if alt_valid {
            (alt_month, alt_day)
        } else {
            return None;
        };
        let ambiguous = primary_valid && alt_valid && month != day;

        let date = match year {
            Some(y) => NaiveDate::from_ymd_opt(y, month, day)?,
            None => resolve_partial(month, day, ctx)?,
        };
        return Some(ParsedDate { date, ambiguous });
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let date = match caps.get(3) {
            Some(y) => NaiveDate::from_ymd_opt(y.as_str().parse().ok()?, month, day)?,
            None => resolve_partial(month, day, ctx)?,
        };
        return Some(ParsedDate { date, ambiguous: false });
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(text) {
        let month = month_from_name(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let date = match caps.get(3) {
            Some(y) => NaiveDate::from_ymd_opt(y.as_str().parse().ok()?, month, day)?,
            None => resolve_partial(month, day, ctx)?,
        };
        return Some(ParsedDate { date, ambiguous: false });
    }

    None
}

/// Parse under a forced component order, ignoring the context default.
pub fn parse_date_with_order(
    text: &str,
    order: DateOrder,
    ctx: &StatementContext,
) -> Option<NaiveDate> {
    let forced = StatementContext { date_order: order, ..ctx.clone() };
    parse_date(text, &forced)
}

/// True for tokens shaped like a transaction date.
pub fn looks_like_date(text: &str) -> bool {
    let text = text.trim();
    NUMERIC_DATE.is_match(text)
        || NUMERIC_DATE_DOTTED.is_match(text)
        || DAY_MONTH_NAME.is_match(text)
        || MONTH_NAME_DAY.is_match(text)
        || ISO_DATE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use pretty_assertions::assert_eq;

    /// Context with "today" mid-way through the statement year, the
    /// usual relationship between a statement and the day it is parsed.
    fn ctx(year: i32, order: DateOrder) -> StatementContext {
        StatementContext {
            year: Some(year),
            currency: Currency::Usd,
            date_order: order,
            today: NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_partial_mdy() {
        assert_eq!(parse_date("1/15", &ctx(2023, DateOrder::Mdy)), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("02-01", &ctx(2024, DateOrder::Mdy)), Some(d(2024, 2, 1)));
    }

    #[test]
    fn test_partial_dmy() {
        assert_eq!(parse_date("15/1", &ctx(2023, DateOrder::Dmy)), Some(d(2023, 1, 15)));
    }

    #[test]
    fn test_order_recovery_when_primary_invalid() {
        // 15 cannot be a month, so MDY context still reads day 15.
        assert_eq!(parse_date("15/01", &ctx(2023, DateOrder::Mdy)), Some(d(2023, 1, 15)));
    }

    #[test]
    fn test_full_date_with_year() {
        assert_eq!(
            parse_date("07/04/2024", &ctx(2024, DateOrder::Mdy)),
            Some(d(2024, 7, 4))
        );
        assert_eq!(
            parse_date("07/04/2024", &ctx(2024, DateOrder::Dmy)),
            Some(d(2024, 4, 7))
        );
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("1/15/23", &ctx(2023, DateOrder::Mdy)), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("1/15/99", &ctx(2023, DateOrder::Mdy)), Some(d(1999, 1, 15)));
    }

    #[test]
    fn test_day_month_name() {
        assert_eq!(parse_date("5 Jul", &ctx(2023, DateOrder::Dmy)), Some(d(2023, 7, 5)));
        assert_eq!(
            parse_date("28 February 2022", &ctx(2023, DateOrder::Dmy)),
            Some(d(2022, 2, 28))
        );
    }

    #[test]
    fn test_month_name_day() {
        assert_eq!(parse_date("Jul 5", &ctx(2023, DateOrder::Mdy)), Some(d(2023, 7, 5)));
        assert_eq!(
            parse_date("July 5, 2023", &ctx(2023, DateOrder::Mdy)),
            Some(d(2023, 7, 5))
        );
    }

    #[test]
    fn test_year_boundary_rollback() {
        // Header said 2024, today is June 2024: a December row stays in
        // 2023 only if it would land >30 days ahead. December 2024 is
        // more than 30 days past June 15, so it rolls back.
        let c = ctx(2024, DateOrder::Mdy);
        assert_eq!(parse_date("12/28", &c), Some(d(2023, 12, 28)));
        // A date within the tolerance window stays put.
        assert_eq!(parse_date("7/1", &c), Some(d(2024, 7, 1)));
    }

    #[test]
    fn test_january_rolls_forward_across_year_boundary() {
        // Dec/Jan statement whose header names the older year. The
        // December rows keep 2023; the January rows would be eleven
        // months stale under 2023, so they resolve into 2024.
        let c = StatementContext {
            year: Some(2023),
            currency: Currency::Usd,
            date_order: DateOrder::Mdy,
            today: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        assert_eq!(parse_date("12/30", &c), Some(d(2023, 12, 30)));
        assert_eq!(parse_date("1/02", &c), Some(d(2024, 1, 2)));
    }

    #[test]
    fn test_ambiguity_detection() {
        let p = parse_date_detailed("07/04/2024", &ctx(2024, DateOrder::Mdy)).unwrap();
        assert!(p.ambiguous);
        let p = parse_date_detailed("07/14/2024", &ctx(2024, DateOrder::Mdy)).unwrap();
        assert!(!p.ambiguous);
    }

    #[test]
    fn test_rejects_non_dates() {
        let c = ctx(2023, DateOrder::Mdy);
        assert_eq!(parse_date("hello", &c), None);
        assert_eq!(parse_date("99/99", &c), None);
        assert_eq!(parse_date("", &c), None);
    }

    #[test]
    fn test_looks_like_date() {
        assert!(looks_like_date("1/15"));
        assert!(looks_like_date("5 Jul"));
        assert!(looks_like_date("2023-07-05"));
        assert!(looks_like_date("15.01.2024"));
        assert!(!looks_like_date("COFFEE"));
        // Dotted two-part tokens are amounts, not dates.
        assert!(!looks_like_date("4.50"));
        assert!(!looks_like_date("15.01"));
    }

    #[test]
    fn test_dotted_date_needs_year() {
        let c = ctx(2024, DateOrder::Dmy);
        assert_eq!(parse_date("15.01.2024", &c), Some(d(2024, 1, 15)));
        assert_eq!(parse_date("15.01", &c), None);
    }
}
