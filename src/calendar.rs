//! # Month Calendar
//!
//! Maps month numbers to their printed name, day count and the range of feed
//! rows they occupy. A trimmed feed holds one row per day of the year, so
//! month boundaries are fixed row offsets:
//!
//! | Month | Days | First row |
//! |-------|------|-----------|
//! | ENERO | 31 | 0 |
//! | FEBRERO | 28 | 31 |
//! | MARZO | 31 | 59 |
//! | ... | ... | ... |
//! | DICIEMBRE | 31 | 334 |
//! | (end of year) | | 365 |
//!
//! In a leap year February gains its 29th day and every month after it starts
//! one row later, including the end-of-year boundary.
//!
//! Times and heights are read from separate row origins. In a leap year the
//! hour origin moves one row for every month but February, the height origin
//! only for months after February, so January's hours start at row 1 while
//! its heights start at row 0. Both are bounded by the month's row range.

use crate::TableError;
use chrono::NaiveDate;
use serde::Serialize;

/// Name, day count and first feed row of each month, plus the end-of-year
/// boundary that closes December.
const MONTH_TABLE: [(&str, u32, usize); 13] = [
    ("ENERO", 31, 0),
    ("FEBRERO", 28, 31),
    ("MARZO", 31, 59),
    ("ABRIL", 30, 90),
    ("MAYO", 31, 120),
    ("JUNIO", 30, 151),
    ("JULIO", 31, 181),
    ("AGOSTO", 31, 212),
    ("SEPTIEMBRE", 30, 243),
    ("OCTUBRE", 31, 273),
    ("NOVIEMBRE", 30, 304),
    ("DICIEMBRE", 31, 334),
    ("ENERO", 31, 365),
];

/// Layout parameters of one month for a given year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonthSpec {
    /// 1 = January ... 12 = December
    pub number: u32,
    /// Upper-case Spanish month name printed in the header
    pub name: &'static str,
    /// Days in the month, leap-year adjusted
    pub days: u32,
    /// First feed row of the month; heights are read from here
    pub start_row: usize,
    /// First feed row the hour pass reads
    pub hour_start_row: usize,
    /// First feed row of the following month (exclusive bound)
    pub end_row: usize,
}

impl MonthSpec {
    /// Feed row holding the heights of `day` (1-based), if it falls inside
    /// this month.
    pub fn row_for_day(&self, day: u32) -> Option<usize> {
        self.bounded_row(self.start_row, day)
    }

    /// Feed row holding the times of `day`, if it falls inside this month.
    pub fn hour_row_for_day(&self, day: u32) -> Option<usize> {
        self.bounded_row(self.hour_start_row, day)
    }

    fn bounded_row(&self, origin: usize, day: u32) -> Option<usize> {
        if day == 0 {
            return None;
        }
        let row = origin + (day - 1) as usize;
        (row < self.end_row).then_some(row)
    }
}

/// Gregorian leap-year test.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Layout parameters for `month` (1..=12) of `year`.
pub fn month_spec(month: u32, year: i32) -> Result<MonthSpec, TableError> {
    if !(1..=12).contains(&month) {
        return Err(TableError::InvalidMonth(month));
    }
    let leap = is_leap_year(year);
    let index = (month - 1) as usize;
    let (name, days, _) = MONTH_TABLE[index];

    Ok(MonthSpec {
        number: month,
        name,
        days: if month == 2 && leap { days + 1 } else { days },
        start_row: start_row(index, leap),
        hour_start_row: hour_start_row(index, leap),
        end_row: start_row(index + 1, leap),
    })
}

/// All twelve months of `year`, in calendar order.
pub fn year_months(year: i32) -> impl Iterator<Item = MonthSpec> {
    (1..=12).filter_map(move |month| month_spec(month, year).ok())
}

// Months after February start one row later once the leap day is in the feed.
fn start_row(index: usize, leap: bool) -> usize {
    let base = MONTH_TABLE[index].2;
    if leap && index >= 2 {
        base + 1
    } else {
        base
    }
}

fn hour_start_row(index: usize, leap: bool) -> usize {
    let base = MONTH_TABLE[index].2;
    if leap && index != 1 {
        base + 1
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_common_year_boundaries() {
        let feb = month_spec(2, 2023).unwrap();
        assert_eq!(feb.name, "FEBRERO");
        assert_eq!(feb.days, 28);
        assert_eq!((feb.start_row, feb.end_row), (31, 59));

        let dec = month_spec(12, 2023).unwrap();
        assert_eq!((dec.start_row, dec.end_row), (334, 365));
    }

    #[test]
    fn test_leap_year_shifts_after_february() {
        let jan = month_spec(1, 2024).unwrap();
        assert_eq!((jan.start_row, jan.end_row), (0, 31));

        let feb = month_spec(2, 2024).unwrap();
        assert_eq!(feb.days, 29);
        assert_eq!((feb.start_row, feb.end_row), (31, 60));

        let mar = month_spec(3, 2024).unwrap();
        assert_eq!((mar.start_row, mar.end_row), (60, 91));

        let dec = month_spec(12, 2024).unwrap();
        assert_eq!((dec.start_row, dec.end_row), (335, 366));
    }

    #[test]
    fn test_row_ranges_match_day_counts() {
        for year in [2023, 2024] {
            let months: Vec<_> = year_months(year).collect();
            assert_eq!(months.len(), 12);
            for spec in &months {
                assert_eq!((spec.end_row - spec.start_row) as u32, spec.days);
            }
            for pair in months.windows(2) {
                assert_eq!(pair[0].end_row, pair[1].start_row);
            }
        }
    }

    #[test]
    fn test_row_for_day_stops_at_month_end() {
        let feb = month_spec(2, 2023).unwrap();
        assert_eq!(feb.row_for_day(1), Some(31));
        assert_eq!(feb.row_for_day(28), Some(58));
        assert_eq!(feb.row_for_day(29), None);
        assert_eq!(feb.row_for_day(0), None);
    }

    #[test]
    fn test_hour_origin_moves_for_leap_january() {
        let jan = month_spec(1, 2024).unwrap();
        assert_eq!(jan.hour_start_row, 1);
        assert_eq!(jan.row_for_day(1), Some(0));
        assert_eq!(jan.hour_row_for_day(1), Some(1));
        assert_eq!(jan.hour_row_for_day(30), Some(30));
        assert_eq!(jan.hour_row_for_day(31), None);
        assert_eq!(jan.row_for_day(31), Some(30));

        let feb = month_spec(2, 2024).unwrap();
        assert_eq!(feb.hour_start_row, feb.start_row);

        for month in 3..=12 {
            let spec = month_spec(month, 2024).unwrap();
            assert_eq!(spec.hour_start_row, spec.start_row, "{}", spec.name);
        }
        for spec in year_months(2023) {
            assert_eq!(spec.hour_start_row, spec.start_row, "{}", spec.name);
        }
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(month_spec(0, 2023), Err(TableError::InvalidMonth(0))));
        assert!(matches!(month_spec(13, 2023), Err(TableError::InvalidMonth(13))));
    }
}
