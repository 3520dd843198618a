//! Inclusive calendar-day date ranges parsed from request parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{EngineError, ResultEngine};

pub const MISSING_RANGE: &str = "startDate and endDate are required";
pub const INVALID_RANGE: &str = "startDate and endDate must be valid dates";

/// A window of instants covering whole calendar days (UTC).
///
/// `start` is midnight of the first day and `end` is 23:59:59.999 of the last
/// day, so both boundary days are fully included. A range whose start lies
/// after its end is valid and simply matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Parse the raw `startDate`/`endDate` pair.
    ///
    /// Absent or blank values fail with [`MISSING_RANGE`], unparseable ones
    /// with [`INVALID_RANGE`]. Accepted forms are `YYYY-MM-DD`, a naive
    /// `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339; only the calendar day is kept.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> ResultEngine<Self> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());
        let (Some(start), Some(end)) = (start, end) else {
            return Err(EngineError::Validation(MISSING_RANGE.to_string()));
        };

        let (Some(start_day), Some(end_day)) = (parse_day(start), parse_day(end)) else {
            return Err(EngineError::Validation(INVALID_RANGE.to_string()));
        };

        Ok(Self::from_days(start_day, end_day))
    }

    /// Range covering `start_day` through `end_day`, both inclusive.
    pub fn from_days(start_day: NaiveDate, end_day: NaiveDate) -> Self {
        Self {
            start: start_day.and_time(NaiveTime::MIN).and_utc(),
            end: end_day.and_time(last_millisecond()).and_utc(),
        }
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn last_millisecond() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|at| at.date())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Timelike};

    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn end_is_extended_to_last_millisecond() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(range.start, day("2024-01-01").and_time(NaiveTime::MIN).and_utc());
        assert_eq!(range.end.date_naive(), day("2024-01-31"));
        assert_eq!(
            (range.end.hour(), range.end.minute(), range.end.second()),
            (23, 59, 59)
        );
        assert_eq!(range.end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn whole_end_day_is_included() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let late = day("2024-01-31").and_hms_opt(23, 59, 59).unwrap().and_utc();
        assert!(range.contains(late));
        assert!(!range.contains(late + Duration::seconds(1)));
        assert!(range.contains(range.start));
        assert!(!range.contains(range.start - Duration::milliseconds(1)));
    }

    #[test]
    fn missing_or_blank_is_rejected() {
        let expected = EngineError::Validation(MISSING_RANGE.to_string());
        assert_eq!(DateRange::parse(None, Some("2024-01-01")).unwrap_err(), expected);
        assert_eq!(DateRange::parse(Some("2024-01-01"), None).unwrap_err(), expected);
        assert_eq!(DateRange::parse(Some(""), Some("2024-01-01")).unwrap_err(), expected);
        assert_eq!(DateRange::parse(Some("  "), Some("2024-01-01")).unwrap_err(), expected);
    }

    #[test]
    fn malformed_is_rejected() {
        let err = DateRange::parse(Some("yesterday"), Some("2024-01-01")).unwrap_err();
        assert_eq!(err, EngineError::Validation(INVALID_RANGE.to_string()));
        assert!(err.is_validation());
    }

    #[test]
    fn datetime_inputs_keep_only_the_day() {
        let range =
            DateRange::parse(Some("2024-03-02T15:30:00Z"), Some("2024-03-04T08:00:00")).unwrap();
        assert_eq!(range.start_day(), day("2024-03-02"));
        assert_eq!(range.start.hour(), 0);
        assert_eq!(range.end_day(), day("2024-03-04"));
    }

    #[test]
    fn reversed_range_is_accepted() {
        let range = DateRange::parse(Some("2024-02-01"), Some("2024-01-01")).unwrap();
        assert!(range.start > range.end);
        assert!(!range.contains(day("2024-01-15").and_time(NaiveTime::MIN).and_utc()));
    }
}
