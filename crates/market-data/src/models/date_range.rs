use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::errors::MarketDataError;

/// Inclusive window of calendar days.
///
/// The window covers `start 00:00:00` through `end 23:59:59` in whatever
/// timezone the caller converts it with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MarketDataError> {
        if start > end {
            return Err(MarketDataError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the window.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last second of the window.
    pub fn end_of_day(&self) -> NaiveDateTime {
        // 23:59:59 is always a valid wall-clock time
        self.end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN))
    }

    /// Epoch seconds of `(start_of_day, end_of_day)` interpreted in `tz`.
    pub fn epoch_bounds(&self, tz: Tz) -> (i64, i64) {
        (
            local_to_epoch(tz, self.start_of_day()),
            local_to_epoch(tz, self.end_of_day()),
        )
    }

    /// Whether a wall-clock timestamp falls inside the window (both ends inclusive).
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.start_of_day() <= *timestamp && *timestamp <= self.end_of_day()
    }
}

/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// non-existent ones (DST spring-forward) are read as UTC.
fn local_to_epoch(tz: Tz, local: NaiveDateTime) -> i64 {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| Utc.from_utc_datetime(&local).timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalizes_to_day_bounds() {
        let range = DateRange::new(day(2023, 1, 2), day(2023, 1, 5)).unwrap();
        assert_eq!(range.start_of_day().to_string(), "2023-01-02 00:00:00");
        assert_eq!(range.end_of_day().to_string(), "2023-01-05 23:59:59");
    }

    #[test]
    fn test_epoch_bounds_utc() {
        let range = DateRange::new(day(2023, 1, 2), day(2023, 1, 5)).unwrap();
        assert_eq!(range.epoch_bounds(Tz::UTC), (1672617600, 1672963199));
    }

    #[test]
    fn test_epoch_bounds_follow_timezone() {
        let range = DateRange::new(day(2023, 1, 2), day(2023, 1, 5)).unwrap();
        // New York is UTC-5 in January
        let (start, end) = range.epoch_bounds(chrono_tz::America::New_York);
        assert_eq!(start, 1672617600 + 5 * 3600);
        assert_eq!(end, 1672963199 + 5 * 3600);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(day(2023, 3, 1), day(2023, 3, 1)).unwrap();
        assert!(range.contains(&day(2023, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(range.contains(&day(2023, 3, 1).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!range.contains(&day(2023, 3, 2).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_rejects_reversed_range() {
        let err = DateRange::new(day(2023, 1, 5), day(2023, 1, 2)).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_serializes_as_plain_days() {
        let range = DateRange::new(day(2023, 1, 2), day(2023, 1, 5)).unwrap();
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json, serde_json::json!({"start": "2023-01-02", "end": "2023-01-05"}));
    }
}
