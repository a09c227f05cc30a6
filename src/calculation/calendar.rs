//! Calendar arithmetic and month segmentation.
//!
//! This module provides the date helpers shared by accrual, consumption and
//! ledger calculations, and splits date ranges at month boundaries so leave
//! days can be attributed to the payroll month they fall in.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{DateRange, YearMonth};

/// Returns the first day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns the last day of the month containing `date`.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::month_end;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2028, 2, 10).unwrap();
/// assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// ```
pub fn month_end(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Returns January 1st of the year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

/// Returns December 31st of the year containing `date`.
pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(NaiveDate::MAX)
}

/// The whole calendar year containing `date`.
pub fn calendar_year(date: NaiveDate) -> DateRange {
    DateRange {
        start: year_start(date),
        end: year_end(date),
    }
}

/// Counts calendar months from `start` to `end`, both inclusive.
///
/// Returns 0 when `start`'s month is after `end`'s month.
pub fn months_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (i64::from(end.year()) - i64::from(start.year())) * 12
        + (i64::from(end.month()) - i64::from(start.month()))
        + 1;
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

/// Lists every month from the month of `from` through the month of `to`.
///
/// Returns an empty list when `from` is after `to`.
pub fn month_keys(from: NaiveDate, to: NaiveDate) -> Vec<YearMonth> {
    let mut keys = Vec::new();
    let mut cursor = first_of_month(from);
    while cursor <= to {
        keys.push(YearMonth::from(cursor));
        let Some(next) = cursor.checked_add_months(Months::new(1)) else {
            break;
        };
        cursor = next;
    }
    keys
}

/// The part of a date range that falls in a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSegment {
    /// The month this segment belongs to.
    pub year_month: YearMonth,
    /// The days of the range within the month.
    pub range: DateRange,
}

impl MonthSegment {
    /// Number of days in this segment.
    pub fn days(&self) -> i64 {
        self.range.days()
    }
}

/// Splits a range at month boundaries.
///
/// Segments are ordered chronologically and their day counts sum to the
/// range's day count.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::segment_by_month;
/// use leave_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2026, 1, 28).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 7).unwrap(),
/// )
/// .unwrap();
///
/// let segments = segment_by_month(&range);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].days(), 4);
/// assert_eq!(segments[1].days(), 7);
/// ```
pub fn segment_by_month(range: &DateRange) -> Vec<MonthSegment> {
    let mut segments = Vec::new();
    let mut cursor = range.start;

    while cursor <= range.end {
        let segment_end = month_end(cursor).min(range.end);
        segments.push(MonthSegment {
            year_month: YearMonth::from(cursor),
            range: DateRange {
                start: cursor,
                end: segment_end,
            },
        });
        let Some(next) = segment_end.succ_opt() else {
            break;
        };
        cursor = next;
    }

    segments
}
