//! ANZ (Australia and New Zealand Banking Group) statements.
//!
//! Rows read `D/M DESCRIPTION AMOUNT [BALANCE]`. Long descriptions
//! wrap, and the wrapped tail often begins with an address fragment
//! (`/15 ETHEL ST`) or a lone street suffix — those continuations must
//! not become transactions of their own.

use lazy_static::lazy_static;
use regex::Regex;

use crate::banks::BankTag;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::parse::line::{BankConfig, HookResult};
use crate::parse::{BankParser, table_then_lines};
use crate::pdf::StatementDocument;

lazy_static! {
    /// Wrapped-description tail: `/15 ETHEL ST`, `/203 HIGH STREET`.
    static ref CONTINUATION_FRAGMENT: Regex = Regex::new(r"^\s*/\d+\s").unwrap();

    /// A lone street-suffix token left behind by a wrap.
    static ref LONE_STREET_SUFFIX: Regex =
        Regex::new(r"(?i)^\s*(?:ST|RD|AVE|CRES|PDE|HWY|CT|PL)\s*$").unwrap();
}

pub struct AnzParser {
    config: BankConfig,
}

impl AnzParser {
    pub fn new() -> Self {
        Self {
            config: BankConfig {
                debit_keywords: &["withdrawal", "eftpos", "payment to", "transfer to", "fee"],
                credit_keywords: &[
                    "deposit",
                    "salary",
                    "transfer from",
                    "payment from",
                    "interest paid",
                ],
                // ANZ rows are card purchases unless marked otherwise.
                default_sign: SignHint::Debit,
                use_sections: false,
            },
        }
    }
}

impl Default for AnzParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for AnzParser {
    fn tag(&self) -> BankTag {
        BankTag::Anz
    }

    fn extract(&self, doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
        table_then_lines(doc, ctx, &self.config, |line, _, _, _| {
            if CONTINUATION_FRAGMENT.is_match(line) || LONE_STREET_SUFFIX.is_match(line) {
                return HookResult::Skip;
            }
            HookResult::Pass
        })
    }
}
