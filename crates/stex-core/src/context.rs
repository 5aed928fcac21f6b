//! Statement context extraction: year, currency, and date order.
//!
//! Runs once per document, before any transaction parsing. The year is
//! the piece parsers depend on most: statement rows usually print
//! `MM/DD` or `5 Jul` with no year at all.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::banks::BankTag;
use crate::models::{Currency, DateOrder, StatementContext};
use crate::pdf::StatementDocument;

/// Years outside this window are treated as noise, not evidence.
pub const MIN_STATEMENT_YEAR: i32 = 1990;

/// How many date-shaped tokens the order sniffer inspects.
const ORDER_SNIFF_TOKENS: usize = 30;

lazy_static! {
    /// `Statement Period ... 2023` / `For the period ... 2023` / `Period ... 2023`.
    static ref PERIOD_YEAR: Regex = Regex::new(
        r"(?i)(?:statement\s+period|for\s+the\s+period|period)[^\n]*?\b((?:19|20)\d{2})\b"
    )
    .unwrap();

    /// Any plausible four-digit year, filtered by range at the call site.
    static ref YEAR_TOKEN: Regex = Regex::new(r"\b((?:19|20)\d{2})\b").unwrap();

    /// Leading group of a numeric date token, for the MDY/DMY sniffer.
    static ref DATE_TOKEN_LEAD: Regex =
        Regex::new(r"\b(\d{1,2})[/\-]\d{1,2}(?:[/\-]\d{2,4})?\b").unwrap();
}

/// Infer the parse context for a classified document.
pub fn extract_context(doc: &StatementDocument, tag: BankTag) -> StatementContext {
    let today = chrono::Local::now().date_naive();
    let mut header = String::new();
    for page in 0..doc.page_count().min(2) {
        header.push_str(doc.page_text(page));
        header.push('\n');
        // The layout path sometimes catches header text the logical
        // path merges away; both feed the same regexes.
        header.push_str(doc.layout_text(page));
        header.push('\n');
    }
    from_header_text(&header, tag, today)
}

/// Context inference over already-extracted header text.
pub fn from_header_text(header: &str, tag: BankTag, today: NaiveDate) -> StatementContext {
    let year = infer_year(header, today);
    let currency = infer_currency(header, tag);
    let date_order = infer_date_order(header, tag);

    debug!(
        "context for {}: year={:?}, currency={}, order={:?}",
        tag,
        year,
        currency.code(),
        date_order
    );

    StatementContext { year, currency, date_order, today }
}

fn year_in_range(year: i32, today: NaiveDate) -> bool {
    (MIN_STATEMENT_YEAR..=today.year() + 1).contains(&year)
}

/// Statement year, in priority order: period phrasing, then a plausible
/// year on a line mentioning "statement" or "date". `None` means the
/// current calendar year applies.
fn infer_year(header: &str, today: NaiveDate) -> Option<i32> {
    if let Some(caps) = PERIOD_YEAR.captures(header) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        if year_in_range(year, today) {
            return Some(year);
        }
    }

    for line in header.lines() {
        let lower = line.to_lowercase();
        if !lower.contains("statement") && !lower.contains("date") {
            continue;
        }
        for caps in YEAR_TOKEN.captures_iter(line) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            if year_in_range(year, today) {
                return Some(year);
            }
        }
    }

    None
}

fn infer_currency(header: &str, tag: BankTag) -> Currency {
    if header.contains('£') || header.contains("GBP") {
        Currency::Gbp
    } else if header.contains('€') || header.contains("EUR") {
        Currency::Eur
    } else if header.contains("AUD") || header.contains("AU$") {
        Currency::Aud
    } else if header.contains("CAD") {
        Currency::Cad
    } else if header.contains('$') || header.contains("USD") {
        match tag.family() {
            // `$` is ambiguous between US, Australian, and Canadian
            // statements; the family decides.
            crate::banks::BankFamily::Australia => Currency::Aud,
            crate::banks::BankFamily::Canada => Currency::Cad,
            _ => Currency::Usd,
        }
    } else {
        tag.family().currency()
    }
}

fn infer_date_order(header: &str, tag: BankTag) -> DateOrder {
    if let Some(order) = tag.family().date_order() {
        return order;
    }

    // Unknown bank: sniff the first date-shaped tokens. A leading
    // group above 12 can only be a day, which settles DMY.
    let mut saw_over_twelve = false;
    for caps in DATE_TOKEN_LEAD.captures_iter(header).take(ORDER_SNIFF_TOKENS) {
        let lead: u32 = caps[1].parse().unwrap_or(0);
        if lead > 12 {
            saw_over_twelve = true;
            break;
        }
    }
    if saw_over_twelve { DateOrder::Dmy } else { DateOrder::Mdy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_year_from_statement_period() {
        let ctx = from_header_text(
            "Statement Period: January 1, 2023 through January 31, 2023",
            BankTag::WellsFargo,
            today(),
        );
        assert_eq!(ctx.year, Some(2023));
    }

    #[test]
    fn test_year_from_for_the_period() {
        let ctx = from_header_text(
            "For the period 05/01/2022 to 05/31/2022",
            BankTag::Pnc,
            today(),
        );
        assert_eq!(ctx.year, Some(2022));
    }

    #[test]
    fn test_year_near_date_keyword() {
        let ctx = from_header_text(
            "Account 1234\nStatement date: 15 March 2023\n",
            BankTag::Lloyds,
            today(),
        );
        assert_eq!(ctx.year, Some(2023));
    }

    #[test]
    fn test_no_year_defaults_to_current() {
        let ctx = from_header_text("Account Summary", BankTag::WellsFargo, today());
        assert_eq!(ctx.year, None);
        assert_eq!(ctx.effective_year(), 2024);
    }

    #[test]
    fn test_phone_number_not_a_year() {
        // 1212 and 1980 in a support line must not become the year;
        // 1980 < 1990 and 9999 is out of range.
        let ctx = from_header_text(
            "Statement questions? Call 1-800-555-1212 or 1-888-555-1980",
            BankTag::WellsFargo,
            today(),
        );
        assert_eq!(ctx.year, None);
    }

    #[test]
    fn test_future_year_rejected() {
        let ctx = from_header_text("Statement Period 2031", BankTag::WellsFargo, today());
        assert_eq!(ctx.year, None);
    }

    #[test]
    fn test_year_in_valid_range_invariant() {
        let ctx = from_header_text("Statement Period March 2025", BankTag::Anz, today());
        // today is 2024: now_year + 1 is allowed.
        assert_eq!(ctx.year, Some(2025));
    }

    #[test]
    fn test_currency_by_symbol() {
        let ctx = from_header_text("Balance: £1,234.56", BankTag::Unknown, today());
        assert_eq!(ctx.currency, Currency::Gbp);
    }

    #[test]
    fn test_currency_family_default() {
        let ctx = from_header_text("no symbols here", BankTag::Rabobank, today());
        assert_eq!(ctx.currency, Currency::Eur);
    }

    #[test]
    fn test_dollar_disambiguated_by_family() {
        let ctx = from_header_text("Balance: $500.00", BankTag::Anz, today());
        assert_eq!(ctx.currency, Currency::Aud);
        let ctx = from_header_text("Balance: $500.00", BankTag::Chase, today());
        assert_eq!(ctx.currency, Currency::Usd);
    }

    #[test]
    fn test_date_order_by_family() {
        assert_eq!(
            from_header_text("", BankTag::WellsFargo, today()).date_order,
            DateOrder::Mdy
        );
        assert_eq!(
            from_header_text("", BankTag::Lloyds, today()).date_order,
            DateOrder::Dmy
        );
    }

    #[test]
    fn test_date_order_sniff_for_unknown() {
        let dmy = from_header_text(
            "01/02/2024 05/02/2024 28/02/2024",
            BankTag::Unknown,
            today(),
        );
        assert_eq!(dmy.date_order, DateOrder::Dmy);

        let mdy = from_header_text(
            "01/02/2024 05/02/2024 12/28/2024",
            BankTag::Unknown,
            today(),
        );
        // 12/28: the lead fits a month; the sniffer only flips on a
        // lead above 12.
        assert_eq!(mdy.date_order, DateOrder::Mdy);
    }
}
