//! Document-level parse hints inferred before any transaction parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which component comes first in an ambiguous numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// US convention: month/day/year.
    Mdy,
    /// UK, Australian, and Dutch convention: day/month/year.
    Dmy,
}

/// Statement currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Gbp,
    Aud,
    Cad,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Currency::Usd | Currency::Aud | Currency::Cad => '$',
            Currency::Gbp => '£',
            Currency::Eur => '€',
        }
    }
}

/// Parse hints inferred from the statement header region.
///
/// Built once per document by [`crate::context::extract_context`] and
/// borrowed read-only by every parser.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementContext {
    /// Statement year, when the header names one. Always in
    /// `[1990, today.year() + 1]`; `None` means no header evidence was
    /// found and the current calendar year is in effect.
    pub year: Option<i32>,
    /// Statement currency.
    pub currency: Currency,
    /// Date-component order for ambiguous numeric dates.
    pub date_order: DateOrder,
    /// "Today" as seen by this parse. Injected so year rollover and
    /// future-date validation are deterministic under test.
    pub today: NaiveDate,
}

impl StatementContext {
    /// The year applied to partial dates: the inferred year, or the
    /// current calendar year when the header gave no evidence.
    pub fn effective_year(&self) -> i32 {
        self.year.unwrap_or_else(|| {
            use chrono::Datelike;
            self.today.year()
        })
    }
}
