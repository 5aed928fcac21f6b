//! Table-mode extraction: map a detected grid's header to columns and
//! walk its data rows.

use tracing::debug;

use super::amounts::{AmountSign, parse_amount};
use super::dates::looks_like_date;
use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::pdf::{StatementDocument, Table};

/// Column roles recognized in a statement table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
    pub balance: Option<usize>,
}

impl ColumnMap {
    /// A usable map names a date column and some money column.
    pub fn is_usable(&self) -> bool {
        self.date.is_some()
            && (self.amount.is_some() || self.debit.is_some() || self.credit.is_some())
    }
}

/// Map header cells to column roles.
pub fn map_header(cells: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (idx, cell) in cells.iter().enumerate() {
        let c = cell.to_lowercase();
        if map.date.is_none() && c.contains("date") {
            map.date = Some(idx);
        } else if map.description.is_none()
            && (c.contains("description")
                || c.contains("narrative")
                || c.contains("details")
                || c.contains("particulars")
                || c.contains("transaction"))
        {
            map.description = Some(idx);
        } else if map.debit.is_none()
            && (c.contains("debit")
                || c.contains("withdrawal")
                || c.contains("money out")
                || c.contains("paid out"))
        {
            map.debit = Some(idx);
        } else if map.credit.is_none()
            && (c.contains("credit")
                || c.contains("deposit")
                || c.contains("money in")
                || c.contains("paid in"))
        {
            map.credit = Some(idx);
        } else if map.balance.is_none() && c.contains("balance") {
            map.balance = Some(idx);
        } else if map.amount.is_none() && c.contains("amount") {
            map.amount = Some(idx);
        }
    }
    map
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| row.get(i)).map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// Extract raw candidates from one mapped table.
pub fn extract_table(table: &Table, map: &ColumnMap, page: usize) -> Vec<RawTransaction> {
    let mut out = Vec::new();

    for (line_idx, row) in table.data_rows().iter().enumerate() {
        let Some(date_text) = cell(row, map.date) else {
            continue;
        };
        if !looks_like_date(date_text) {
            continue;
        }

        let description = cell(row, map.description)
            .map(str::to_string)
            .unwrap_or_else(|| {
                // No description column mapped: concatenate the cells
                // not claimed by any other role.
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| {
                        Some(*i) != map.date
                            && Some(*i) != map.amount
                            && Some(*i) != map.debit
                            && Some(*i) != map.credit
                            && Some(*i) != map.balance
                    })
                    .map(|(_, c)| c.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        // Separate debit/credit columns: the populated one wins and
        // decides the sign; a single amount column stays unsigned.
        let (amount_text, sign) = if map.debit.is_some() || map.credit.is_some() {
            if let Some(debit) = cell(row, map.debit).filter(|c| parse_amount(c).is_some()) {
                (debit.to_string(), SignHint::Debit)
            } else if let Some(credit) = cell(row, map.credit).filter(|c| parse_amount(c).is_some())
            {
                (credit.to_string(), SignHint::Credit)
            } else {
                continue;
            }
        } else if let Some(amount) = cell(row, map.amount) {
            let sign = match parse_amount(amount).map(|a| a.sign) {
                Some(AmountSign::Unsigned) => SignHint::Unknown,
                Some(_) => SignHint::Explicit,
                None => continue,
            };
            (amount.to_string(), sign)
        } else {
            continue;
        };

        let mut raw = RawTransaction::new(date_text, description, amount_text)
            .with_sign(sign)
            .at(page, line_idx);
        if let Some(balance) = cell(row, map.balance) {
            raw.balance_text = Some(balance.to_string());
        }
        out.push(raw);
    }

    out
}

/// Table-mode pass over a whole document: every table with a usable
/// header contributes rows.
pub fn extract_from_tables(
    doc: &StatementDocument,
    _ctx: &StatementContext,
) -> Vec<RawTransaction> {
    let mut out = Vec::new();
    for page in 0..doc.page_count() {
        for table in doc.page_tables(page) {
            let Some(header_idx) = table.header_row else {
                continue;
            };
            let map = map_header(&table.cells[header_idx]);
            if !map.is_usable() {
                continue;
            }
            let rows = extract_table(table, &map, page);
            debug!("table on page {}: {} rows extracted", page, rows.len());
            out.extend(rows);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rows: &[&[&str]], header: Option<usize>) -> Table {
        Table {
            header_row: header,
            cells: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_map_header_single_amount() {
        let map = map_header(&[
            "Date".to_string(),
            "Description".to_string(),
            "Amount".to_string(),
            "Balance".to_string(),
        ]);
        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.balance, Some(3));
        assert!(map.is_usable());
    }

    #[test]
    fn test_map_header_debit_credit() {
        let map = map_header(&[
            "Date".to_string(),
            "Particulars".to_string(),
            "Debit".to_string(),
            "Credit".to_string(),
            "Balance".to_string(),
        ]);
        assert_eq!(map.debit, Some(2));
        assert_eq!(map.credit, Some(3));
        assert!(map.is_usable());
    }

    #[test]
    fn test_extract_single_amount_table() {
        let t = table(
            &[
                &["Date", "Description", "Amount"],
                &["01/05", "PAYROLL", "1,200.00"],
                &["01/07", "COFFEE", "(4.50)"],
                &["", "continuation text", ""],
            ],
            Some(0),
        );
        let map = map_header(&t.cells[0]);
        let rows = extract_table(&t, &map, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_text, "01/05");
        assert_eq!(rows[0].sign, SignHint::Unknown);
        assert_eq!(rows[1].amount_text, "(4.50)");
        assert_eq!(rows[1].sign, SignHint::Explicit);
    }

    #[test]
    fn test_extract_debit_credit_table() {
        let t = table(
            &[
                &["Date", "Details", "Debit", "Credit", "Balance"],
                &["15/01", "COLES SUPERMARKET", "42.30", "", "957.70"],
                &["16/01", "SALARY", "", "2,000.00", "2,957.70"],
            ],
            Some(0),
        );
        let map = map_header(&t.cells[0]);
        let rows = extract_table(&t, &map, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sign, SignHint::Debit);
        assert_eq!(rows[1].sign, SignHint::Credit);
        assert_eq!(rows[0].balance_text.as_deref(), Some("957.70"));
    }

    #[test]
    fn test_non_date_rows_skipped() {
        let t = table(
            &[
                &["Date", "Description", "Amount"],
                &["Total", "", "1,204.50"],
            ],
            Some(0),
        );
        let map = map_header(&t.cells[0]);
        assert!(extract_table(&t, &map, 0).is_empty());
    }
}
