//! Row merging and running-position recomputation.
//!
//! A `Row` is dated by `Purchase/F1` or `Sale/F6`. Rows with neither sort after every dated row
//! and do not move the position. The merged sequence is ordered by `(date, encounter index)`,
//! where primary rows are enumerated before secondary rows, so equal dates keep the primary
//! report first and each side in its original order.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::RowError;
use crate::tags::{F1, F3, F6, F7, F8, PURCHASE, ROW_ID, SALE};
use edavki_xml::Element;

/// Date given to rows that are neither a purchase nor a sale.
pub const UNDATED_DATE: &str = "9999-12-31";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fractional digits written to `F8`.
pub const POSITION_SCALE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Purchase,
    Sale,
    Undated,
}

impl RowKind {
    /// A row with both sub-elements counts as a purchase.
    pub fn of(row: &Element) -> Self {
        if row.child(PURCHASE).is_some() {
            Self::Purchase
        } else if row.child(SALE).is_some() {
            Self::Sale
        } else {
            Self::Undated
        }
    }
}

fn field(row: &Element, kind: &'static str, field: &'static str) -> Result<String, RowError> {
    row.child(kind)
        .and_then(|k| k.child(field))
        .map(Element::text)
        .ok_or(RowError::MissingField { kind, field })
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RowError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| RowError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

fn parse_quantity(field: &'static str, value: &str) -> Result<Decimal, RowError> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| RowError::InvalidQuantity {
            field,
            value: value.to_string(),
        })
}

/// Sort key date of a row.
pub fn date_key(row: &Element) -> Result<NaiveDate, RowError> {
    let value = match RowKind::of(row) {
        RowKind::Purchase => field(row, PURCHASE, F1)?,
        RowKind::Sale => field(row, SALE, F6)?,
        RowKind::Undated => UNDATED_DATE.to_string(),
    };
    parse_date(&value)
}

/// Position change of a row: `+F3` for a purchase, `-F7` for a sale, zero otherwise.
pub fn signed_quantity(row: &Element) -> Result<Decimal, RowError> {
    match RowKind::of(row) {
        RowKind::Purchase => parse_quantity(F3, &field(row, PURCHASE, F3)?),
        RowKind::Sale => Ok(-parse_quantity(F7, &field(row, SALE, F7)?)?),
        RowKind::Undated => Ok(Decimal::ZERO),
    }
}

/// Exclusive bound on the magnitude of a position written to `F8`.
fn position_limit() -> Decimal {
    Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)
}

/// `F8` text: rounded to eight places, never a negative zero.
///
/// Positions of 10^20 or more in magnitude are rejected.
pub fn format_position(value: Decimal) -> Result<String, RowError> {
    if value.abs() >= position_limit() {
        return Err(RowError::PositionOutOfRange { value });
    }
    let rounded = value.round_dp(POSITION_SCALE);
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    Ok(format!("{:.8}", rounded))
}

/// Interleaves two detached row lists into one date-ordered sequence.
///
/// Fails on the first row whose date cannot be read; nothing is reordered in that case.
pub fn merge_rows(primary: Vec<Element>, secondary: Vec<Element>) -> Result<Vec<Element>, RowError> {
    let mut keyed = Vec::with_capacity(primary.len() + secondary.len());
    for (encounter, row) in primary.into_iter().chain(secondary).enumerate() {
        keyed.push((date_key(&row)?, encounter, row));
    }
    keyed.sort_by_key(|(date, encounter, _)| (*date, *encounter));
    Ok(keyed.into_iter().map(|(_, _, row)| row).collect())
}

/// Rewrites `ID` (zero-based sequence) and `F8` (running position) on every row, in order.
///
/// Missing `ID` or `F8` children are appended. Returns the final position.
pub fn recompute_positions(rows: &mut [Element]) -> Result<Decimal, RowError> {
    let mut running = Decimal::ZERO;
    for (sequence, row) in rows.iter_mut().enumerate() {
        row.child_or_insert(ROW_ID).set_text(sequence.to_string());
        let quantity = signed_quantity(row)?;
        running = running
            .checked_add(quantity)
            .ok_or(RowError::PositionOverflow { quantity })?;
        row.child_or_insert(F8).set_text(format_position(running)?);
    }
    Ok(running)
}
