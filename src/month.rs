//! EMI month normalization and demand-date helpers
//!
//! Months are compared everywhere in the canonical `Mon-YY` form (e.g.
//! `Aug-25`). Comparison is case-sensitive and format-sensitive: anything that
//! cannot be normalized simply fails to match, it never errors.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed month-name lookup table used for `Mon-YY` construction
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day of month the backend keys demand records on
const DEMAND_DAY: u32 = 5;

/// An EMI month in canonical `Mon-YY` form.
///
/// The inner string is always `Mon-YY`; construction goes through one of the
/// parsing entry points, so two equal months always compare equal as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmiMonth(String);

impl EmiMonth {
    /// Normalize an arbitrary month/date string into `Mon-YY`.
    ///
    /// Accepts `Mon-YY` (passed through untouched), `YYYY-MM-DD`, and ISO
    /// datetime strings. Returns `None` for anything else; a `None` never
    /// matches a known month.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_canonical(raw) {
            return Some(EmiMonth(raw.to_string()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Self::from_date(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Self::from_date(dt.date());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::from_date(dt.date_naive());
        }
        None
    }

    /// Build from separate month-number (1..=12) and four-digit year fields.
    pub fn from_parts(month: u32, year: i32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let name = MONTH_NAMES[(month - 1) as usize];
        Some(EmiMonth(format!("{}-{:02}", name, year.rem_euclid(100))))
    }

    /// Build from a calendar date.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::from_parts(date.month(), date.year())
    }

    /// The current calendar month.
    pub fn current() -> Self {
        // Always constructible from a real date.
        Self::from_date(Utc::now().date_naive()).expect("current date is a valid month")
    }

    /// The month following this one.
    pub fn next(&self) -> Self {
        let (month, year) = self.parts();
        if month == 12 {
            Self::from_parts(1, year + 1)
        } else {
            Self::from_parts(month + 1, year)
        }
        .expect("month arithmetic stays in range")
    }

    /// The month preceding this one.
    pub fn previous(&self) -> Self {
        let (month, year) = self.parts();
        if month == 1 {
            Self::from_parts(12, year - 1)
        } else {
            Self::from_parts(month - 1, year)
        }
        .expect("month arithmetic stays in range")
    }

    /// Month number (1..=12) and four-digit year (two-digit years are taken
    /// as 20YY, matching the backend's data range).
    pub fn parts(&self) -> (u32, i32) {
        let (name, yy) = self.0.split_at(3);
        let month = MONTH_NAMES
            .iter()
            .position(|m| *m == name)
            .expect("canonical month name") as u32
            + 1;
        let year: i32 = yy[1..].parse().expect("canonical two-digit year");
        (month, 2000 + year)
    }

    /// Canonical demand date for this month: the day is fixed to the 5th,
    /// which is how the backend addresses per-month records.
    pub fn demand_date(&self) -> NaiveDate {
        let (month, year) = self.parts();
        NaiveDate::from_ymd_opt(year, month, DEMAND_DAY).expect("5th exists in every month")
    }

    /// Sort key for "most recent month" fallbacks.
    pub fn ordinal(&self) -> i32 {
        let (month, year) = self.parts();
        year * 12 + month as i32
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmiMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check for the exact `Mon-YY` shape: a known three-letter month name, a
/// dash, and two digits.
fn is_canonical(s: &str) -> bool {
    let bytes = s.as_bytes();
    if !s.is_ascii() || bytes.len() != 6 || bytes[3] != b'-' {
        return false;
    }
    MONTH_NAMES.contains(&&s[..3])
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
}

/// Format a PTP date for display as `DD-MMM-YY`, with `"Not Set"` standing in
/// for an absent value. Unparseable input is shown as-is rather than erroring.
pub fn format_ptp_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Not Set".to_string();
    };
    if raw.is_empty() {
        return "Not Set".to_string();
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        });
    match parsed {
        Some(date) => format!(
            "{:02}-{}-{:02}",
            date.day(),
            MONTH_NAMES[(date.month() - 1) as usize],
            date.year().rem_euclid(100)
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_passthrough() {
        assert_eq!(EmiMonth::parse("Aug-25").unwrap().as_str(), "Aug-25");
        assert_eq!(EmiMonth::parse("Jan-26").unwrap().as_str(), "Jan-26");
    }

    #[test]
    fn test_parse_demand_date() {
        assert_eq!(EmiMonth::parse("2025-08-05").unwrap().as_str(), "Aug-25");
        assert_eq!(EmiMonth::parse("2025-12-31").unwrap().as_str(), "Dec-25");
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            EmiMonth::parse("2025-09-05T00:00:00").unwrap().as_str(),
            "Sep-25"
        );
        assert_eq!(
            EmiMonth::parse("2025-09-05T00:00:00+05:30").unwrap().as_str(),
            "Sep-25"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(EmiMonth::parse("").is_none());
        assert!(EmiMonth::parse("August 2025").is_none());
        assert!(EmiMonth::parse("aug-25").is_none()); // case-sensitive
        assert!(EmiMonth::parse("Aug-2025").is_none()); // format-sensitive
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(EmiMonth::from_parts(8, 2025).unwrap().as_str(), "Aug-25");
        assert_eq!(EmiMonth::from_parts(1, 2026).unwrap().as_str(), "Jan-26");
        assert!(EmiMonth::from_parts(0, 2025).is_none());
        assert!(EmiMonth::from_parts(13, 2025).is_none());
    }

    #[test]
    fn test_next_and_previous() {
        let dec = EmiMonth::parse("Dec-25").unwrap();
        assert_eq!(dec.next().as_str(), "Jan-26");
        assert_eq!(dec.previous().as_str(), "Nov-25");

        let jan = EmiMonth::parse("Jan-26").unwrap();
        assert_eq!(jan.previous().as_str(), "Dec-25");
    }

    #[test]
    fn test_demand_date_fixed_to_fifth() {
        let month = EmiMonth::parse("Sep-25").unwrap();
        assert_eq!(
            month.demand_date(),
            NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()
        );
    }

    #[test]
    fn test_ordinal_ordering() {
        let aug = EmiMonth::parse("Aug-25").unwrap();
        let sep = EmiMonth::parse("Sep-25").unwrap();
        let jan = EmiMonth::parse("Jan-26").unwrap();
        assert!(aug.ordinal() < sep.ordinal());
        assert!(sep.ordinal() < jan.ordinal());
    }

    #[test]
    fn test_format_ptp_date() {
        assert_eq!(format_ptp_date(Some("2025-08-14")), "14-Aug-25");
        assert_eq!(format_ptp_date(None), "Not Set");
        assert_eq!(format_ptp_date(Some("")), "Not Set");
        // Unparseable values pass through unchanged.
        assert_eq!(format_ptp_date(Some("soonish")), "soonish");
    }
}
