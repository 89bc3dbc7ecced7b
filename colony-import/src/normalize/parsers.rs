//! Cell parsers
//!
//! All parsers are total: malformed input yields the field default.

use chrono::{Days, NaiveDate};
use colony_common::db::Sex;

use crate::sheet::Cell;

/// Litter marker; a quantity like "1窝" counts as one entry
const LITTER_MARKER: char = '窝';

/// Day zero of spreadsheet date serials
///
/// 1899-12-30 rather than 1900-01-01 so that serials after Feb 1900 land on
/// the right day despite the fictitious 1900-02-29.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

pub fn parse_sex(cell: &Cell) -> Sex {
    let Some(value) = cell.trimmed() else {
        return Sex::Unknown;
    };
    let lower = value.to_lowercase();

    let english_female = lower == "f" || lower.contains("female");
    let english_male = lower == "m" || (lower.contains("male") && !english_female);

    if value == "♂" || value.contains('雄') || english_male {
        Sex::Male
    } else if value == "♀" || value.contains('雌') || english_female {
        Sex::Female
    } else {
        // Includes "子代" (offspring, not yet sexed)
        Sex::Unknown
    }
}

/// Quantity of a mouse entry, always >= 1
pub fn parse_quantity(cell: &Cell) -> i64 {
    match cell {
        Cell::Number(f) if f.is_finite() && *f >= 1.0 => f.trunc().min(i64::MAX as f64) as i64,
        Cell::Text(s) => {
            let s = s.trim();
            if s.contains(LITTER_MARKER) {
                return 1;
            }
            leading_integer(s).filter(|n| *n >= 1).unwrap_or(1)
        }
        _ => 1,
    }
}

/// Leading optionally-signed integer, e.g. "3只" -> 3
fn leading_integer(s: &str) -> Option<i64> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Date from a spreadsheet serial
///
/// Numeric cells and numeric text are accepted; the time-of-day fraction is
/// dropped. Zero, negative, non-numeric and out-of-range values give `None`.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let serial = match cell {
        Cell::Number(f) => *f,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    serial_to_date(serial)
}

pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > u32::MAX as f64 {
        return None;
    }
    serial_epoch().checked_add_days(Days::new(serial.trunc() as u64))
}

/// Trimmed text, `None` when blank
pub fn parse_text(cell: &Cell) -> Option<String> {
    cell.trimmed()
}

/// Cage number cell; a numeric zero counts as no cage
pub fn parse_cage_number(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Number(n) if *n == 0.0 => None,
        other => parse_text(other),
    }
}
