//! Per-cell coercion functions.
//!
//! Every function here maps one raw cell to a typed value and degrades to
//! `None` instead of failing. Row-level policy (which nulls drop a row) lives
//! in [`crate::processors::transformer`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Decimal places kept on every numeric measurement.
pub const DECIMAL_PLACES: i32 = 3;

/// Date-only layouts, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time layouts, tried in order after the date-only ones. The time of
/// day is discarded.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Trim a text cell; blank cells become `None`.
pub fn parse_text(cell: Option<&str>) -> Option<String> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a calendar date from the accepted layouts.
///
/// # Example
///
/// ```
/// use climate_pipeline::core::transforms::parse_date;
///
/// let date = parse_date(Some("2021-03-05 14:00:00")).unwrap();
/// assert_eq!(date.to_string(), "2021-03-05");
/// assert!(parse_date(Some("bad-date")).is_none());
/// ```
pub fn parse_date(cell: Option<&str>) -> Option<NaiveDate> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse a finite floating-point number. `NaN` and infinities are rejected
/// because they have no JSON representation.
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let value: f64 = cell?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Round to `decimals` places, resolving exact halfway cases to the even
/// neighbour (`0.0625 -> 0.062`, `0.1875 -> 0.188`).
///
/// Values too large to scale are returned unchanged; they carry no
/// fractional digits at that magnitude anyway.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Parse and round a measurement cell to [`DECIMAL_PLACES`].
pub fn parse_measurement(cell: Option<&str>) -> Option<f64> {
    parse_number(cell).map(|v| round_half_even(v, DECIMAL_PLACES))
}

/// Parse an integer cell. Integral floats such as `2020.0` are accepted;
/// fractional values are not.
pub fn parse_integer(cell: Option<&str>) -> Option<i64> {
    let s = cell?.trim();
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }

    let value: f64 = s.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse a year cell.
pub fn parse_year(cell: Option<&str>) -> Option<i32> {
    parse_integer(cell).and_then(|v| i32::try_from(v).ok())
}

/// Parse a month cell, accepting only `1..=12`.
pub fn parse_month(cell: Option<&str>) -> Option<u32> {
    parse_integer(cell)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|m| (1..=12).contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text(Some("  Asia ")), Some("Asia".to_string()));
        assert_eq!(parse_text(Some("   ")), None);
        assert_eq!(parse_text(Some("")), None);
        assert_eq!(parse_text(None), None);
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date(Some("2021-03-05")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("2021/03/05")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("03/05/2021")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("05.03.2021")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("2021-03-05 23:59:59")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("2021-03-05T08:30:00")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("2021-03-05 08:30:00.250")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some("2021-03-05T08:30:00+02:00")), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date(Some(" 2021-03-05 ")), Some(ymd(2021, 3, 5)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(Some("bad-date")), None);
        assert_eq!(parse_date(Some("2021-02-30")), None);
        assert_eq!(parse_date(Some("2021-13-01")), None);
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("27.456789")), Some(27.456789));
        assert_eq!(parse_number(Some(" 80 ")), Some(80.0));
        assert_eq!(parse_number(Some("-1e2")), Some(-100.0));
        assert_eq!(parse_number(Some("n/a")), None);
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(27.456789, 3), 27.457);
        assert_eq!(round_half_even(410.2, 3), 410.2);
        assert_eq!(round_half_even(-3.14159, 3), -3.142);
        // exact binary halves
        assert_eq!(round_half_even(0.0625, 3), 0.062);
        assert_eq!(round_half_even(0.1875, 3), 0.188);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(f64::MAX, 3), f64::MAX);
    }

    #[test]
    fn test_parse_measurement_has_at_most_three_decimals() {
        for cell in ["1.23456", "0.1", "99999.99951", "-0.0004", "12.3"] {
            let value = parse_measurement(Some(cell)).unwrap();
            let text = value.to_string();
            let decimals = text.split_once('.').map_or(0, |(_, frac)| frac.len());
            assert!(decimals <= 3, "{cell} -> {text}");
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer(Some("2020")), Some(2020));
        assert_eq!(parse_integer(Some("2020.0")), Some(2020));
        assert_eq!(parse_integer(Some(" 7 ")), Some(7));
        assert_eq!(parse_integer(Some("2020.5")), None);
        assert_eq!(parse_integer(Some("year")), None);
        assert_eq!(parse_integer(Some("")), None);
    }

    #[test]
    fn test_parse_year_and_month() {
        assert_eq!(parse_year(Some("2019")), Some(2019));
        assert_eq!(parse_year(Some("99999999999")), None);
        assert_eq!(parse_month(Some("12")), Some(12));
        assert_eq!(parse_month(Some("1.0")), Some(1));
        assert_eq!(parse_month(Some("0")), None);
        assert_eq!(parse_month(Some("13")), None);
        assert_eq!(parse_month(Some("-3")), None);
    }
}
