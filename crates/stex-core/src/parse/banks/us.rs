//! US banks and cards whose statements follow the common shapes:
//! PNC, Citizens, Navy Federal, DCU, USAA, SunTrust, Walmart
//! MoneyCard, Green Dot, Netspend, and Discover.
//!
//! Each owns its keyword lists and section behavior; none need a
//! custom line shape beyond the generic families.

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, noop_hook};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

pub struct PncParser {
    config: BankConfig,
}

impl PncParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["debit card", "purchase", "withdrawal", "check", "fee", "web pmt"],
                credit_keywords: &["deposit", "direct dep", "payroll", "refund", "interest"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl BankParser for PncParser {
    fn tag(&self) -> BankTag {
        BankTag::Pnc
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct CitizensParser {
    config: BankConfig,
}

impl CitizensParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["debit", "purchase", "withdrawal", "check", "fee"],
                credit_keywords: &["deposit", "payroll", "refund", "interest"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl BankParser for CitizensParser {
    fn tag(&self) -> BankTag {
        BankTag::Citizens
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct NavyFederalParser {
    config: BankConfig,
}

impl NavyFederalParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["pos debit", "withdrawal", "transfer to", "fee", "paid to"],
                credit_keywords: &["deposit", "transfer from", "dividend", "payroll"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for NavyFederalParser {
    fn tag(&self) -> BankTag {
        BankTag::NavyFederal
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct DcuParser {
    config: BankConfig,
}

impl DcuParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "debit", "check", "fee"],
                credit_keywords: &["deposit", "dividend", "payroll", "credit"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for DcuParser {
    fn tag(&self) -> BankTag {
        BankTag::Dcu
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct UsaaParser {
    config: BankConfig,
}

impl UsaaParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["debit card", "purchase", "withdrawal", "check", "usaa funds transfer db"],
                credit_keywords: &["deposit", "payroll", "interest paid", "usaa funds transfer cr"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl BankParser for UsaaParser {
    fn tag(&self) -> BankTag {
        BankTag::Usaa
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

pub struct SuntrustParser {
    config: BankConfig,
}

impl SuntrustParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["card purchase", "withdrawal", "check", "fee", "debit"],
                credit_keywords: &["deposit", "payroll", "interest", "credit"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl BankParser for SuntrustParser {
    fn tag(&self) -> BankTag {
        BankTag::Suntrust
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

/// Walmart MoneyCard: prepaid, single amount column, purchase-heavy.
pub struct WalmartParser {
    config: BankConfig,
}

impl WalmartParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["purchase", "withdrawal", "fee", "bill pay"],
                credit_keywords: &["reload", "deposit", "refund", "cash back reward"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for WalmartParser {
    fn tag(&self) -> BankTag {
        BankTag::Walmart
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

/// Green Dot prepaid card statements.
pub struct GreenDotParser {
    config: BankConfig,
}

impl GreenDotParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["purchase", "withdrawal", "fee", "bill pay"],
                credit_keywords: &["reload", "deposit", "refund"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for GreenDotParser {
    fn tag(&self) -> BankTag {
        BankTag::GreenDot
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

/// Netspend prepaid card statements.
pub struct NetspendParser {
    config: BankConfig,
}

impl NetspendParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["purchase", "withdrawal", "fee", "signature"],
                credit_keywords: &["load", "deposit", "refund", "credit"],
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl BankParser for NetspendParser {
    fn tag(&self) -> BankTag {
        BankTag::Netspend
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

/// Discover Bank (checking/savings) statements.
pub struct DiscoverParser {
    config: BankConfig,
}

impl DiscoverParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["debit", "purchase", "withdrawal", "check", "fee"],
                credit_keywords: &["deposit", "interest paid", "refund", "cashback"],
                default_sign: SignHint::Debit,
                use_sections: true,
            },
        }
    }
}

impl BankParser for DiscoverParser {
    fn tag(&self) -> BankTag {
        BankTag::Discover
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, noop_hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::line::match_generic_line;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prepaid_reload_is_credit() {
        let parser = WalmartParser::new();
        let raw = match_generic_line(
            "03/02 RELOAD AT REGISTER WALMART 0451 100.00",
            0,
            0,
            &parser.config,
            None,
        )
        .unwrap();
        assert_eq!(raw.sign, SignHint::Credit);
    }

    #[test]
    fn test_pnc_default_is_debit() {
        let parser = PncParser::new();
        let raw = match_generic_line(
            "03/04 4412 DEBIT CARD PURCHASE WAWA 12.80",
            0,
            0,
            &parser.config,
            None,
        )
        .unwrap();
        assert_eq!(raw.sign, SignHint::Debit);
    }

    #[test]
    fn test_dcu_dividend_is_credit() {
        let parser = DcuParser::new();
        let raw =
            match_generic_line("12/31 DIVIDEND EARNED 1.23", 0, 0, &parser.config, None).unwrap();
        assert_eq!(raw.sign, SignHint::Credit);
    }
}
