//! Data models: parse hints, raw candidates, and normalized transactions.

pub mod context;
pub mod transaction;

pub use context::{Currency, DateOrder, StatementContext};
pub use transaction::{ParseReport, RawTransaction, SignHint, Transaction};
