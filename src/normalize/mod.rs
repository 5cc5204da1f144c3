//! Value normalization for raw extract cells
//!
//! This module provides the text folding, number parsing and date parsing
//! used everywhere raw cells are read. Every function here is total: bad
//! input yields an empty string or `None`, never an error.

use chrono::NaiveDate;

use crate::model::CellValue;

/// Spreadsheet serial day 1 maps to 1900-01-01; the epoch sits two days
/// earlier because of the fictitious 1900-02-29.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Highest serial accepted (9999-12-31)
const SERIAL_MAX: i64 = 2_958_465;

/// Normalize free text for comparison and grouping
///
/// Strips diacritics, trims, uppercases and collapses internal whitespace
/// runs to a single space. Total over any input.
#[must_use]
pub fn fold_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for upper in c.to_uppercase() {
            out.push(strip_diacritic(upper));
        }
    }
    out
}

/// Map an uppercase accented Latin letter to its base letter
const fn strip_diacritic(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        _ => c,
    }
}

/// Render a cell as normalized comparison text
///
/// `Empty` becomes the empty string, text is folded, numbers render in
/// canonical decimal form and dates render as ISO.
#[must_use]
pub fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => fold_text(s),
        CellValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::Empty => String::new(),
    }
}

/// Parse a decimal number from locale-ambiguous text
///
/// When both comma and dot appear, the right-most one is taken as the
/// decimal separator and the other is removed as a thousands separator.
/// A lone comma is treated as a decimal separator. Blank text is absence,
/// not zero.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (Some(_), None) => s.replace(',', "."),
        _ => s.to_string(),
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a numeric value from a cell
///
/// `Empty` and blank text yield `None` (absence, not zero); non-finite
/// numbers are rejected.
#[must_use]
pub fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n).filter(|v| v.is_finite()),
        CellValue::Text(s) => parse_decimal(s),
        CellValue::Date(_) | CellValue::Empty => None,
    }
}

/// Parse a calendar date from a cell
///
/// Accepts native dates, spreadsheet serial numbers and the text formats
/// described on [`parse_date_text`]. Unparseable input yields `None`;
/// this function never panics.
#[must_use]
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => serial_to_date(*n),
        CellValue::Text(s) => parse_date_text(s),
        CellValue::Empty => None,
    }
}

/// Convert a spreadsheet serial number to a calendar date
///
/// Serials count days since 1899-12-30 at UTC midnight. Serials below 61
/// carry the classic off-by-one from the fictitious 1900 leap day, so
/// serial 1 is 1900-01-01 and serial 61 is 1900-03-01. Fractional time of
/// day is discarded; out-of-range serials are rejected.
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor() as i64;
    if !(1..=SERIAL_MAX).contains(&days) {
        return None;
    }
    let adjusted = if days < 61 { days + 1 } else { days };
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(chrono::Duration::days(adjusted))
}

/// Parse a date from free text
///
/// Tries an ISO `YYYY-MM-DD` prefix first, then the ambiguous
/// `D[./-]M[./-]Y` family with 2- or 4-digit years (2-digit years are
/// assumed to mean the 2000s): the day-then-month reading is accepted when
/// it forms a valid calendar date, otherwise the components are swapped.
#[must_use]
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(prefix) = s.get(..10) {
        let b = prefix.as_bytes();
        if b[4] == b'-' && b[7] == b'-' {
            if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }

    let parts: Vec<&str> = s.split(['.', '/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year_part = parts[2].trim();
    let year: i32 = match year_part.len() {
        2 => 2000 + year_part.parse::<i32>().ok()?,
        4 => year_part.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, day, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fold_text() {
        assert_eq!(fold_text("  hipertensión   arterial "), "HIPERTENSION ARTERIAL");
        assert_eq!(fold_text("Nariño"), "NARINO");
        assert_eq!(fold_text("bogotá\td.c."), "BOGOTA D.C.");
        assert_eq!(fold_text(""), "");
        assert_eq!(fold_text("   "), "");
    }

    #[test]
    fn test_parse_decimal_locale_variants() {
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("130,5"), Some(130.5));
        assert_eq!(parse_decimal("130.5"), Some(130.5));
        assert_eq!(parse_decimal("85"), Some(85.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_parse_number_cells() {
        assert_eq!(parse_number(&CellValue::Number(7.5)), Some(7.5));
        assert_eq!(parse_number(&CellValue::Number(f64::NAN)), None);
        assert_eq!(parse_number(&CellValue::Text("6,9".into())), Some(6.9));
        assert_eq!(parse_number(&CellValue::Empty), None);
        assert_eq!(parse_number(&CellValue::Date(date(2024, 1, 1))), None);
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(serial_to_date(1.0), Some(date(1900, 1, 1)));
        assert_eq!(serial_to_date(61.0), Some(date(1900, 3, 1)));
        assert_eq!(serial_to_date(45_292.0), Some(date(2024, 1, 1)));
        // fractional time of day is discarded
        assert_eq!(serial_to_date(45_292.75), Some(date(2024, 1, 1)));
        assert_eq!(serial_to_date(0.0), None);
        assert_eq!(serial_to_date(-3.0), None);
        assert_eq!(serial_to_date(3_000_000.0), None);
    }

    #[test]
    fn test_parse_date_text_formats() {
        assert_eq!(parse_date_text("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_text("2024-03-15T10:30:00"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_text("15/03/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_text("15.03.2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_text("15-03-24"), Some(date(2024, 3, 15)));
        // day-then-month fails, swapped reading accepted
        assert_eq!(parse_date_text("03/15/2024"), Some(date(2024, 3, 15)));
        // invalid under both readings
        assert_eq!(parse_date_text("2024/02/30"), None);
        assert_eq!(parse_date_text("31/11/2024"), None);
        assert_eq!(parse_date_text("garbage"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn test_parse_date_cells() {
        assert_eq!(parse_date(&CellValue::Date(date(2024, 5, 1))), Some(date(2024, 5, 1)));
        assert_eq!(parse_date(&CellValue::Number(45_292.0)), Some(date(2024, 1, 1)));
        assert_eq!(parse_date(&CellValue::Text("01/05/2024".into())), Some(date(2024, 5, 1)));
        assert_eq!(parse_date(&CellValue::Empty), None);
    }

    #[test]
    fn test_date_round_trip_per_format_class() {
        let dates = [date(2024, 1, 31), date(2023, 12, 1), date(2000, 2, 29)];
        for d in dates {
            assert_eq!(parse_date_text(&d.format("%Y-%m-%d").to_string()), Some(d));
            assert_eq!(parse_date_text(&d.format("%d/%m/%Y").to_string()), Some(d));
            let serial = (d - date(1899, 12, 30)).num_days() as f64;
            assert_eq!(serial_to_date(serial), Some(d));
            assert_eq!(parse_date(&CellValue::Date(d)), Some(d));
        }
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&CellValue::Text("  Sí ".into())), "SI");
        assert_eq!(cell_text(&CellValue::Number(130.0)), "130");
        assert_eq!(cell_text(&CellValue::Number(6.5)), "6.5");
        assert_eq!(cell_text(&CellValue::Date(date(2024, 1, 2))), "2024-01-02");
        assert_eq!(cell_text(&CellValue::Empty), "");
    }
}
