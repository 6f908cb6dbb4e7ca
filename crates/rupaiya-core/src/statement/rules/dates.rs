//! Date extraction and normalization for statement rows.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_LOOSE};

/// Which date shapes an extractor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `DD-MM-YYYY` / `DD/MM/YY` only.
    DayFirst,
    /// Day-first plus `YYYY-MM-DD`; the 4-digit segment locates the year.
    Loose,
}

/// First date-shaped substring of a line, parsed or not.
#[derive(Debug, Clone, PartialEq)]
pub struct DateHit {
    /// `None` when the text looked like a date but is not a calendar date.
    pub date: Option<NaiveDate>,
    pub position: (usize, usize),
    pub source: String,
}

/// Date field extractor.
pub struct DateExtractor {
    style: DateStyle,
}

impl DateExtractor {
    pub fn new(style: DateStyle) -> Self {
        Self { style }
    }

    pub fn day_first() -> Self {
        Self::new(DateStyle::DayFirst)
    }

    pub fn loose() -> Self {
        Self::new(DateStyle::Loose)
    }

    /// True if the line contains anything date-shaped.
    pub fn is_match(&self, text: &str) -> bool {
        match self.style {
            DateStyle::DayFirst => DATE_DAY_FIRST.is_match(text),
            DateStyle::Loose => DATE_LOOSE.is_match(text),
        }
    }

    /// Locate the first date-shaped substring and try to parse it.
    pub fn first(&self, text: &str) -> Option<DateHit> {
        let caps = match self.style {
            DateStyle::DayFirst => DATE_DAY_FIRST.captures(text)?,
            DateStyle::Loose => DATE_LOOSE.captures(text)?,
        };
        let full = caps.get(0)?;

        let date = match self.style {
            DateStyle::DayFirst => day_first_date(&caps[1], &caps[2], &caps[3]),
            DateStyle::Loose => loose_date(&caps[1], &caps[2], &caps[3]),
        };

        Some(DateHit {
            date,
            position: (full.start(), full.end()),
            source: full.as_str().to_string(),
        })
    }
}

/// Normalize any supported date string to `YYYY-MM-DD`.
pub fn normalize_date(s: &str) -> Option<String> {
    let hit = DateExtractor::loose().first(s.trim())?;
    if hit.source.len() != s.trim().len() {
        return None;
    }
    hit.date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn day_first_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let year = parse_year(year)?;
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn loose_date(first: &str, middle: &str, last: &str) -> Option<NaiveDate> {
    if first.len() == 4 {
        let year: i32 = first.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, middle.parse().ok()?, last.parse().ok()?);
    }
    if first.len() > 2 {
        return None;
    }
    day_first_date(first, middle, last)
}

/// Four digits as-is; one or two digits are years in 2000-2099.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        4 => Some(year),
        1 | 2 => Some(2000 + year),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn date(extractor: &DateExtractor, text: &str) -> Option<NaiveDate> {
        extractor.first(text)?.date
    }

    #[test]
    fn test_day_first_formats() {
        let extractor = DateExtractor::day_first();
        assert_eq!(date(&extractor, "12-03-2024").unwrap(), ymd(2024, 3, 12));
        assert_eq!(date(&extractor, "01/04/2024").unwrap(), ymd(2024, 4, 1));
        assert_eq!(date(&extractor, "1/4/24").unwrap(), ymd(2024, 4, 1));
    }

    #[test]
    fn test_loose_year_position() {
        let extractor = DateExtractor::loose();
        assert_eq!(date(&extractor, "2024/03/12").unwrap(), ymd(2024, 3, 12));
        assert_eq!(date(&extractor, "12/03/2024").unwrap(), ymd(2024, 3, 12));
        assert_eq!(date(&extractor, "12-03-24").unwrap(), ymd(2024, 3, 12));
    }

    #[test]
    fn test_first_reports_invalid_calendar_date() {
        let hit = DateExtractor::day_first().first("31-02-2024 Rent 100.00").unwrap();
        assert_eq!(hit.date, None);
        assert_eq!(hit.position, (0, 10));
        assert!(date(&DateExtractor::day_first(), "31-02-2024").is_none());
    }

    #[test]
    fn test_three_digit_year_rejected() {
        assert!(DateExtractor::day_first().first("12-03-202").unwrap().date.is_none());
    }

    #[test]
    fn test_normalize_round_trip() {
        for (input, expected) in [
            ("12-03-2024", "2024-03-12"),
            ("12/03/2024", "2024-03-12"),
            ("2024-03-12", "2024-03-12"),
            ("2024/3/5", "2024-03-05"),
            ("5-3-24", "2024-03-05"),
        ] {
            let normalized = normalize_date(input).unwrap();
            assert_eq!(normalized, expected);
            // Re-parsing the canonical form lands on the same day.
            assert_eq!(normalize_date(&normalized).unwrap(), normalized);
        }
        assert_eq!(normalize_date("not a date"), None);
        assert_eq!(normalize_date("12-03-2024 extra"), None);
    }
}
