//! Column-clustered extraction: recover table structure from span
//! x-positions when no grid was detected.
//!
//! Works on [`Line`]s, so the vector path and the OCR path (whose
//! words are clustered into the same shape) share one implementation.

use tracing::debug;

use crate::models::{RawTransaction, SignHint, StatementContext};
use crate::ocr::is_header_token;
use crate::parse::amounts::{looks_like_amount, parse_amount};
use crate::parse::dates::{looks_like_date, parse_date};
use crate::pdf::{Line, StatementDocument};

/// Anchors closer than this merge into one column.
const ANCHOR_MERGE: f32 = 14.0;

/// A span belongs to the nearest anchor within this distance.
const ANCHOR_ATTACH: f32 = 40.0;

/// Minimum data rows before a clustered layout is trusted.
const MIN_ROWS: usize = 2;

/// Role a clustered column plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Date,
    Description,
    Debit,
    Credit,
    Amount,
    Balance,
    Other,
}

/// Role named by a header cell, when the page printed one.
fn role_from_header(cell: &str) -> Option<ColumnRole> {
    let c = cell.trim().to_lowercase();
    match c.as_str() {
        "date" => Some(ColumnRole::Date),
        "description" | "narrative" | "details" | "particulars" | "transaction" => {
            Some(ColumnRole::Description)
        }
        "debit" | "withdrawals" | "money out" | "paid out" => Some(ColumnRole::Debit),
        "credit" | "deposits" | "money in" | "paid in" => Some(ColumnRole::Credit),
        "balance" => Some(ColumnRole::Balance),
        "amount" => Some(ColumnRole::Amount),
        _ => None,
    }
}

/// Cluster span x-positions into column anchors.
fn cluster_anchors(lines: &[Line]) -> Vec<f32> {
    let mut xs: Vec<f32> = lines
        .iter()
        .filter(|l| l.spans.len() >= 2)
        .flat_map(|l| l.spans.iter().map(|s| s.x0))
        .collect();
    if xs.is_empty() {
        return Vec::new();
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut anchors: Vec<(f32, usize)> = Vec::new();
    for x in xs {
        match anchors.last_mut() {
            Some((anchor, count)) if (x - *anchor).abs() <= ANCHOR_MERGE => {
                // Running mean keeps the anchor centered on its column.
                *anchor = (*anchor * *count as f32 + x) / (*count as f32 + 1.0);
                *count += 1;
            }
            _ => anchors.push((x, 1)),
        }
    }

    anchors
        .into_iter()
        .filter(|(_, count)| *count >= MIN_ROWS)
        .map(|(anchor, _)| anchor)
        .collect()
}

/// Assign each line's spans to anchors, producing a cell row.
fn line_to_cells(line: &Line, anchors: &[f32]) -> Vec<String> {
    let mut cells = vec![String::new(); anchors.len()];
    for span in &line.spans {
        let nearest = anchors
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (span.x0 - **a)
                    .abs()
                    .partial_cmp(&(span.x0 - **b).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, a)| (i, (span.x0 - *a).abs()));
        if let Some((idx, distance)) = nearest {
            if distance <= ANCHOR_ATTACH {
                if !cells[idx].is_empty() {
                    cells[idx].push(' ');
                }
                cells[idx].push_str(span.text.trim());
            }
        }
    }
    cells
}

/// Classify columns: printed header names first, cell content second.
fn classify_columns(rows: &[Vec<String>]) -> Vec<ColumnRole> {
    let cols = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut roles = vec![ColumnRole::Other; cols];

    for col in 0..cols {
        if let Some(role) = rows
            .iter()
            .take(6)
            .find_map(|row| role_from_header(&row[col]))
        {
            roles[col] = role;
        }
    }

    for (col, role) in roles.iter_mut().enumerate() {
        if *role != ColumnRole::Other {
            continue;
        }

        let mut dates = 0usize;
        let mut amounts = 0usize;
        let mut texts = 0usize;
        let mut filled = 0usize;

        for row in rows {
            let cell = row[col].trim();
            if cell.is_empty() || is_header_token(cell) {
                continue;
            }
            filled += 1;
            // Amount first: `15.01` is money, even though it is also
            // shaped like a European date fragment.
            if looks_like_amount(cell) {
                amounts += 1;
            } else if looks_like_date(cell) {
                dates += 1;
            } else {
                texts += 1;
            }
        }

        if filled < MIN_ROWS {
            continue;
        }
        let ratio = |n: usize| n as f32 / filled as f32;
        if ratio(dates) >= 0.5 {
            *role = ColumnRole::Date;
        } else if ratio(amounts) >= 0.6 {
            *role = ColumnRole::Amount;
        } else if ratio(texts) >= 0.5 {
            *role = ColumnRole::Description;
        }
    }

    // With several unnamed money columns the rightmost is the balance.
    let amount_cols: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == ColumnRole::Amount)
        .map(|(i, _)| i)
        .collect();
    if amount_cols.len() >= 2 && !roles.contains(&ColumnRole::Balance) {
        roles[*amount_cols.last().unwrap()] = ColumnRole::Balance;
    }

    roles
}

/// Column-clustered extraction over pre-grouped lines.
pub(crate) fn extract_from_lines(
    lines: &[Line],
    page: usize,
    ctx: &StatementContext,
) -> Vec<RawTransaction> {
    let anchors = cluster_anchors(lines);
    if anchors.len() < 2 {
        return Vec::new();
    }

    let rows: Vec<Vec<String>> = lines.iter().map(|l| line_to_cells(l, &anchors)).collect();
    let roles = classify_columns(&rows);

    let find = |role: ColumnRole| roles.iter().position(|r| *r == role);
    let date_col = find(ColumnRole::Date);
    let debit_col = find(ColumnRole::Debit);
    let credit_col = find(ColumnRole::Credit);
    let balance_col = find(ColumnRole::Balance);
    let amount_cols: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == ColumnRole::Amount)
        .map(|(i, _)| i)
        .collect();
    let desc_cols: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == ColumnRole::Description || **r == ColumnRole::Other)
        .map(|(i, _)| i)
        .collect();

    let has_money = debit_col.is_some() || credit_col.is_some() || !amount_cols.is_empty();
    let (Some(date_col), true) = (date_col, has_money) else {
        return Vec::new();
    };

    debug!(
        "clustered layout: {} anchors, date col {}, debit/credit {:?}/{:?}, {} amount cols",
        anchors.len(),
        date_col,
        debit_col,
        credit_col,
        amount_cols.len()
    );

    let nonzero_cell = |row: &[String], col: Option<usize>| -> Option<String> {
        let cell = col.and_then(|c| row.get(c)).map(|c| c.trim())?;
        let amount = parse_amount(cell)?;
        if amount.value.is_zero() { None } else { Some(cell.to_string()) }
    };

    let mut out = Vec::new();
    for (line_idx, row) in rows.iter().enumerate() {
        let date_text = row[date_col].trim();
        if parse_date(date_text, ctx).is_none() {
            continue;
        }

        let description: String = desc_cols
            .iter()
            .map(|c| row[*c].trim())
            .filter(|t| !t.is_empty() && !is_header_token(t))
            .collect::<Vec<_>>()
            .join(" ");

        // Named debit/credit columns decide the sign outright; paired
        // unnamed money columns read left debit, right credit; a single
        // column keeps whatever sign its text carries.
        let (amount_text, sign) = if debit_col.is_some() || credit_col.is_some() {
            if let Some(debit) = nonzero_cell(row, debit_col) {
                (debit, SignHint::Debit)
            } else if let Some(credit) = nonzero_cell(row, credit_col) {
                (credit, SignHint::Credit)
            } else {
                continue;
            }
        } else if amount_cols.len() >= 2 {
            if let Some(debit) = nonzero_cell(row, Some(amount_cols[0])) {
                (debit, SignHint::Debit)
            } else if let Some(credit) = nonzero_cell(row, Some(amount_cols[1])) {
                (credit, SignHint::Credit)
            } else {
                continue;
            }
        } else {
            let amount = row[amount_cols[0]].trim();
            if parse_amount(amount).is_none() {
                continue;
            }
            (amount.to_string(), SignHint::Unknown)
        };

        let mut raw = RawTransaction::new(date_text, description, amount_text)
            .with_sign(sign)
            .at(page, line_idx);
        if let Some(balance_col) = balance_col {
            let balance = row[balance_col].trim();
            if !balance.is_empty() {
                raw.balance_text = Some(balance.to_string());
            }
        }
        out.push(raw);
    }

    out
}

/// Column-clustered extraction over the whole document.
pub fn extract(doc: &StatementDocument, ctx: &StatementContext) -> Vec<RawTransaction> {
    let mut out = Vec::new();
    for page in 0..doc.page_count() {
        out.extend(extract_from_lines(doc.page_lines(page), page, ctx));
    }
    out
}
