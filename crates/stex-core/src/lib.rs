//! Core library for bank-statement transaction extraction.
//!
//! This crate provides:
//! - PDF acquisition (positioned text, lines, tables, page rasters)
//! - bank identification and statement-context inference
//! - per-bank parsers for ~25 institutions plus a generic fallback
//!   cascade (tables, column clustering, line regexes, OCR)
//! - a normalizer producing validated, deduplicated, date-ordered
//!   transactions

pub mod banks;
pub mod context;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod parse;
pub mod pdf;

pub use banks::{BankTag, classify};
pub use context::extract_context;
pub use engine::{CancelToken, Engine, parse, parse_with_report};
pub use error::{OcrError, PdfError, Result, StexError};
pub use models::{ParseReport, RawTransaction, SignHint, StatementContext, Transaction};
pub use normalize::{NormalizeStats, normalize};
pub use pdf::StatementDocument;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{Currency, DateOrder};
    use parse::line::match_generic_line;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn us_ctx(year: i32) -> StatementContext {
        StatementContext {
            year: Some(year),
            currency: Currency::Usd,
            date_order: DateOrder::Mdy,
            today: NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
        }
    }

    fn au_ctx(year: i32) -> StatementContext {
        StatementContext {
            year: Some(year),
            currency: Currency::Aud,
            date_order: DateOrder::Dmy,
            today: NaiveDate::from_ymd_opt(year, 8, 1).unwrap(),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // End-to-end seed scenarios at the line-to-transaction level: a
    // statement line goes through the generic shapes (with the owning
    // bank's config where the sign matters) and the normalizer.

    #[test]
    fn test_seed_anz_line() {
        let cfg = parse::line::BankConfig::default();
        let raw = match_generic_line("1/15 COLES SUPERMARKET 42.30", 0, 0, &cfg, None).unwrap();
        let (out, _) = normalize(vec![raw], &au_ctx(2023));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, d(2023, 1, 15));
        assert_eq!(out[0].description, "COLES SUPERMARKET");
        assert_eq!(out[0].amount, dec("-42.30"));
    }

    #[test]
    fn test_seed_anz_continuation_produces_nothing() {
        // `/15 ETHEL ST` is a wrapped description, not a transaction;
        // it matches no shape and normalizes to nothing even before
        // the ANZ hook skips it explicitly.
        let cfg = parse::line::BankConfig::default();
        assert!(match_generic_line("/15 ETHEL ST", 0, 0, &cfg, None).is_none());
    }

    #[test]
    fn test_seed_woodforest_row() {
        let (out, _) = normalize(
            vec![
                RawTransaction::new("02-01", "DEPOSIT", "203.00")
                    .with_sign(SignHint::Credit)
                    .with_balance("205.01"),
            ],
            &us_ctx(2024),
        );
        assert_eq!(out[0].date, d(2024, 2, 1));
        assert_eq!(out[0].amount, dec("203.00"));
        assert_eq!(out[0].balance, Some(dec("205.01")));
    }

    #[test]
    fn test_seed_commonwealth_row() {
        let (out, _) = normalize(
            vec![
                RawTransaction::new("05 Jul", "Transfer to J Smith", "250.00")
                    .with_sign(SignHint::Debit)
                    .with_balance("1,234.56 CR"),
            ],
            &au_ctx(2023),
        );
        assert_eq!(out[0].date, d(2023, 7, 5));
        assert_eq!(out[0].amount, dec("-250.00"));
        assert_eq!(out[0].balance, Some(dec("1234.56")));
    }

    #[test]
    fn test_seed_commerce_check_row() {
        let (out, _) = normalize(
            vec![RawTransaction::new("05-12", "CHECK 1001", "75.00").with_sign(SignHint::Debit)],
            &us_ctx(2024),
        );
        assert_eq!(out[0].date, d(2024, 5, 12));
        assert_eq!(out[0].description, "CHECK 1001");
        assert_eq!(out[0].amount, dec("-75.00"));
    }

    #[test]
    fn test_seed_westpac_date_preference() {
        let c = au_ctx(2024);
        let date =
            parse::dates::parse_date_with_order("07/04/2024", DateOrder::Mdy, &c).unwrap();
        assert_eq!(date, d(2024, 7, 4));

        let (out, _) = normalize(
            vec![
                RawTransaction::new("07/04/2024", "COFFEE SHOP", "4.50")
                    .with_sign(SignHint::Debit)
                    .with_date(date),
            ],
            &c,
        );
        assert_eq!(out[0].date, d(2024, 7, 4));
        assert_eq!(out[0].amount, dec("-4.50"));
    }

    #[test]
    fn test_seed_phone_number_header_yields_nothing() {
        let (out, stats) = normalize(
            vec![RawTransaction::new("1-800-555-1212", "QUESTIONS CALL US", "0.00")],
            &us_ctx(2024),
        );
        assert!(out.is_empty());
        assert_eq!(stats.phone_date, 1);
    }

    #[test]
    fn test_determinism_same_input_same_output() {
        let rows = || {
            vec![
                RawTransaction::new("1/15", "COFFEE SHOP", "4.50").with_sign(SignHint::Debit),
                RawTransaction::new("1/05", "PAYROLL ACME", "1,200.00")
                    .with_sign(SignHint::Credit),
                RawTransaction::new("1/15", "COFFEE SHOP", "4.50").with_sign(SignHint::Debit),
            ]
        };
        let (a, _) = normalize(rows(), &us_ctx(2024));
        let (b, _) = normalize(rows(), &us_ctx(2024));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_output_invariants_hold() {
        let (out, _) = normalize(
            vec![
                RawTransaction::new("1/15", "ROW ONE", "4.50"),
                RawTransaction::new("2/01", "ROW TWO", "(12.00)"),
                RawTransaction::new("1/20", "ROW THREE", "50.00 CR"),
            ],
            &us_ctx(2024),
        );

        let today = us_ctx(2024).today;
        for t in &out {
            assert!(t.date <= today);
            assert!(t.amount.abs() <= Decimal::from(1_000_000));
            assert!(t.description.trim().chars().count() >= 2);
            assert_eq!(t.amount, t.amount.round_dp(2));
        }
        assert!(out.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
