//! Description cleaning and statement-section tracking.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref DIGITS_ONLY: Regex = Regex::new(r"^\d+$").unwrap();
    static ref DASHES_ONLY: Regex = Regex::new(r"^[-\s]+$").unwrap();
    static ref PUNCT_ONLY: Regex = Regex::new(r"^[^\w\s]+$").unwrap();

    /// Phone-shaped tokens that must never be read as dates:
    /// `1-800…`, `555-1212`, `NNN-NNN-NNNN`, and 10–11 digit runs.
    static ref PHONE_SHAPED: Regex = Regex::new(
        r"^(?:1-\d{2,3}(?:-\d{3,4}){1,2}|\d{3}-\d{3}-\d{4}|\d{3}-\d{4}|\d{10,11})$"
    )
    .unwrap();
}

/// Collapse whitespace and reject noise-only descriptions.
///
/// Returns `None` for text that cleans down to digits, dashes, bare
/// punctuation, or fewer than two characters.
pub fn clean_description(text: &str) -> Option<String> {
    let cleaned = WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned();
    if cleaned.chars().count() < 2 {
        return None;
    }
    if DIGITS_ONLY.is_match(&cleaned)
        || DASHES_ONLY.is_match(&cleaned)
        || PUNCT_ONLY.is_match(&cleaned)
    {
        return None;
    }
    Some(cleaned)
}

/// True for tokens shaped like phone numbers, not dates.
pub fn is_phone_shaped(text: &str) -> bool {
    PHONE_SHAPED.is_match(text.trim())
}

/// Sign forced by the statement section a line sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Deposits,
    Withdrawals,
}

/// Tracks the labeled deposit/withdrawal section of a statement.
///
/// US checking statements list deposits and withdrawals under separate
/// headings; the amount column inside each carries no sign of its own.
/// State is created fresh per extraction pass — section entry always
/// initializes it explicitly.
#[derive(Debug, Default)]
pub struct SectionTracker {
    current: Option<Section>,
}

/// Headings that open a deposits section.
const DEPOSIT_HEADINGS: &[&str] = &[
    "deposits and additions",
    "deposits and other credits",
    "deposits and other additions",
    "deposits/credits",
    "deposits",
    "credits",
    "additions",
];

/// Headings that open a withdrawals section.
const WITHDRAWAL_HEADINGS: &[&str] = &[
    "withdrawals and subtractions",
    "withdrawals and other debits",
    "withdrawals and other subtractions",
    "withdrawals/debits",
    "withdrawals",
    "electronic withdrawals",
    "debits",
    "purchases and other debits",
    "checks paid",
    "atm and debit card withdrawals",
];

/// Lines that close the current section.
const SECTION_TERMINATORS: &[&str] = &["total", "totals", "ending balance", "subtotal"];

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from a line; returns the section now in effect.
    pub fn observe(&mut self, line: &str) -> Option<Section> {
        let lower = line.trim().to_lowercase();

        if SECTION_TERMINATORS.iter().any(|t| lower.starts_with(t)) {
            self.current = None;
            return self.current;
        }

        // Heading lines are short; a transaction line that merely
        // mentions "deposit" must not flip the section.
        if lower.len() <= 48 {
            if WITHDRAWAL_HEADINGS.iter().any(|h| lower.starts_with(h)) {
                self.current = Some(Section::Withdrawals);
            } else if DEPOSIT_HEADINGS.iter().any(|h| lower.starts_with(h)) {
                self.current = Some(Section::Deposits);
            }
        }

        self.current
    }

    pub fn current(&self) -> Option<Section> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(
            clean_description("  COLES   SUPERMARKET  ").as_deref(),
            Some("COLES SUPERMARKET")
        );
    }

    #[test]
    fn test_clean_rejects_noise() {
        assert_eq!(clean_description("12345"), None);
        assert_eq!(clean_description("--- -"), None);
        assert_eq!(clean_description("***"), None);
        assert_eq!(clean_description("X"), None);
        assert_eq!(clean_description(""), None);
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_phone_shaped("1-800-555-1212"));
        assert!(is_phone_shaped("555-123-4567"));
        assert!(is_phone_shaped("18005551212"));
        assert!(is_phone_shaped("555-1212"));
        assert!(!is_phone_shaped("1/15"));
        assert!(!is_phone_shaped("02-01"));
    }

    #[test]
    fn test_section_tracking() {
        let mut tracker = SectionTracker::new();
        assert_eq!(tracker.observe("DEPOSITS AND ADDITIONS"), Some(Section::Deposits));
        assert_eq!(tracker.observe("01/05 PAYROLL 1,200.00"), Some(Section::Deposits));
        assert_eq!(tracker.observe("Total Deposits $1,200.00"), None);
        assert_eq!(
            tracker.observe("WITHDRAWALS AND SUBTRACTIONS"),
            Some(Section::Withdrawals)
        );
        assert_eq!(tracker.observe("Ending Balance"), None);
    }

    #[test]
    fn test_transaction_line_does_not_flip_section() {
        let mut tracker = SectionTracker::new();
        tracker.observe("WITHDRAWALS");
        // Long transaction line mentioning a deposit-ish word.
        let section =
            tracker.observe("01/07 Reversal of duplicate deposit adjustment item 42.00");
        assert_eq!(section, Some(Section::Withdrawals));
    }
}
