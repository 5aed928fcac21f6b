//! Generic fallback cascade for unknown banks and bank parsers that
//! came back empty.
//!
//! Strategies are tried in fixed order — structured tables, column
//! clustering, line regexes, OCR — and each is a pure function of the
//! document and context. The dispatch layer owns the stop-on-first-
//! non-empty policy and the OCR gating.

pub mod columns;
pub mod lines;
pub mod ocr;
pub mod tables;

use serde::Serialize;

/// A fallback strategy, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Tables,
    Columns,
    Lines,
    Ocr,
}

impl Strategy {
    /// Cheap strategies, in the order the cascade runs them.
    pub const TEXT_CASCADE: [Strategy; 3] = [Strategy::Tables, Strategy::Columns, Strategy::Lines];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Tables => "fallback:tables",
            Strategy::Columns => "fallback:columns",
            Strategy::Lines => "fallback:lines",
            Strategy::Ocr => "fallback:ocr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_order() {
        assert_eq!(
            Strategy::TEXT_CASCADE,
            [Strategy::Tables, Strategy::Columns, Strategy::Lines]
        );
        assert_eq!(Strategy::Ocr.name(), "fallback:ocr");
    }
}
