//! Date window generation
//!
//! The requested date range is split into consecutive, non-overlapping
//! windows of a fixed number of days. Each window is paged through the
//! search API independently, which is what lets the worker pool overlap
//! network I/O across the whole range.

use chrono::{Days, NaiveDate, NaiveTime};
use thiserror::Error;

/// Date-window specific errors
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Window size must be at least one day")]
    ZeroChunk,
}

/// A half-open interval `[start, end)` of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Epoch seconds of UTC midnight at the start of the window
    pub fn start_timestamp(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// Epoch seconds of UTC midnight at the (exclusive) end of the window
    pub fn end_timestamp(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Iterator over the windows covering a date range
///
/// Restartable: the iterator is `Clone`, and cloning before consumption
/// yields the same sequence again.
#[derive(Debug, Clone)]
pub struct DateWindows {
    cursor: NaiveDate,
    end: NaiveDate,
    chunk_days: u64,
}

impl Iterator for DateWindows {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        if self.cursor >= self.end {
            return None;
        }
        let next = self
            .cursor
            .checked_add_days(Days::new(self.chunk_days))
            .map(|d| d.min(self.end))
            .unwrap_or(self.end);
        let window = DateWindow {
            start: self.cursor,
            end: next,
        };
        self.cursor = next;
        Some(window)
    }
}

/// Splits the half-open range `[start, end)` into windows of `chunk_days` days
///
/// The windows are consecutive and non-overlapping, and their union is exactly
/// the requested range; the final window is truncated at `end`.
///
/// # Errors
///
/// * `WindowError::InvalidRange` if `start > end`
/// * `WindowError::ZeroChunk` if `chunk_days == 0`
pub fn windows(start: NaiveDate, end: NaiveDate, chunk_days: u64) -> Result<DateWindows, WindowError> {
    if start > end {
        return Err(WindowError::InvalidRange { start, end });
    }
    if chunk_days == 0 {
        return Err(WindowError::ZeroChunk);
    }
    Ok(DateWindows {
        cursor: start,
        end,
        chunk_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_windows_cover_range_exactly() {
        let all: Vec<_> = windows(date("2018-01-01"), date("2018-01-06"), 1)
            .unwrap()
            .collect();

        assert_eq!(all.len(), 5);
        assert_eq!(all[0].start, date("2018-01-01"));
        assert_eq!(all.last().unwrap().end, date("2018-01-06"));

        // Contiguous and non-overlapping
        for pair in all.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_final_window_truncated() {
        let all: Vec<_> = windows(date("2018-01-01"), date("2018-01-10"), 7)
            .unwrap()
            .collect();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].end, date("2018-01-08"));
        assert_eq!(all[1].start, date("2018-01-08"));
        assert_eq!(all[1].end, date("2018-01-10"));
    }

    #[test]
    fn test_empty_range_yields_no_windows() {
        let all: Vec<_> = windows(date("2018-01-01"), date("2018-01-01"), 1)
            .unwrap()
            .collect();
        assert!(all.is_empty());
    }

    #[test]
    fn test_invalid_range() {
        let result = windows(date("2018-01-02"), date("2018-01-01"), 1);
        assert!(matches!(result, Err(WindowError::InvalidRange { .. })));
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let result = windows(date("2018-01-01"), date("2018-01-02"), 0);
        assert!(matches!(result, Err(WindowError::ZeroChunk)));
    }

    #[test]
    fn test_restartable() {
        let iter = windows(date("2018-01-01"), date("2018-01-04"), 1).unwrap();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamps_align_with_bounds() {
        let w = DateWindow {
            start: date("2018-01-01"),
            end: date("2018-01-02"),
        };
        assert_eq!(w.start_timestamp(), 1514764800);
        assert_eq!(w.end_timestamp(), 1514851200);
    }
}
