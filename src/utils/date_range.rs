use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::error::{AppError, AppResult};

/// `-4713-11-24T00:00:00Z`, the earliest instant a Postgres `timestamptz` holds.
pub const MIN_STORABLE_MILLIS: i64 = -210_866_803_200_000;

fn instant_from_millis(millis: i64, param: &str) -> AppResult<DateTime<Utc>> {
    if millis < MIN_STORABLE_MILLIS {
        return Err(AppError::validation(param, "not valid milliseconds timestamp"));
    }
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::validation(param, "not valid milliseconds timestamp"))
}

/// A candidate booking interval. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Builds a range from epoch milliseconds, naming the offending field when a
    /// value cannot be stored.
    pub fn from_millis(
        start_millis: i64,
        end_millis: i64,
        start_param: &str,
        end_param: &str,
    ) -> AppResult<Self> {
        let start = instant_from_millis(start_millis, start_param)?;
        let end = instant_from_millis(end_millis, end_param)?;
        Ok(Self { start, end })
    }

    /// Sanity check applied before any booking write.
    ///
    /// A start in the past is accepted; only the end has to lie ahead of `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.start >= self.end {
            return Err(AppError::InvalidDateRange);
        }
        if self.end < now {
            return Err(AppError::ExpiredRange);
        }
        Ok(())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// True when either endpoint of `[start, end]` falls inside this range.
    ///
    /// This is not a full intersection test: an existing booking that strictly
    /// contains this range on both sides does not match.
    pub fn has_endpoint_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.contains(start) || self.contains(end)
    }

    pub fn start_fixed(&self) -> DateTime<FixedOffset> {
        self.start.into()
    }

    pub fn end_fixed(&self) -> DateTime<FixedOffset> {
        self.end.into()
    }
}

/// Renders a timestamp the way JavaScript's `toISOString` does, e.g.
/// `2024-07-11T09:30:00.000Z`.
pub fn to_iso_string(instant: DateTime<FixedOffset>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_validate_rejects_empty_and_inverted_ranges() {
        let now = at(0);
        assert!(matches!(
            DateRange::new(at(5), at(5)).validate(now),
            Err(AppError::InvalidDateRange)
        ));
        assert!(matches!(
            DateRange::new(at(6), at(5)).validate(now),
            Err(AppError::InvalidDateRange)
        ));
    }

    #[test]
    fn test_validate_rejects_past_end_regardless_of_start() {
        let now = at(12);
        assert!(matches!(
            DateRange::new(at(1), at(2)).validate(now),
            Err(AppError::ExpiredRange)
        ));
    }

    #[test]
    fn test_validate_allows_past_start() {
        let now = at(12);
        assert!(DateRange::new(at(1), at(13)).validate(now).is_ok());
        // An end exactly at `now` is not in the past.
        assert!(DateRange::new(at(1), at(12)).validate(now).is_ok());
    }

    #[test]
    fn test_inverted_check_wins_over_expiry() {
        let now = at(12);
        assert!(matches!(
            DateRange::new(at(3), at(2)).validate(now),
            Err(AppError::InvalidDateRange)
        ));
    }

    #[test]
    fn test_endpoint_overlap_is_inclusive() {
        let candidate = DateRange::new(at(10), at(12));
        assert!(candidate.has_endpoint_within(at(8), at(10)));
        assert!(candidate.has_endpoint_within(at(12), at(14)));
        assert!(candidate.has_endpoint_within(at(11), at(15)));
        assert!(!candidate.has_endpoint_within(at(13), at(14)));
        assert!(!candidate.has_endpoint_within(at(7), at(9)));
    }

    #[test]
    fn test_endpoint_overlap_misses_enclosing_booking() {
        let candidate = DateRange::new(at(10), at(12));
        assert!(!candidate.has_endpoint_within(at(9), at(13)));
    }

    #[test]
    fn test_from_millis() {
        let start = at(10);
        let end = start + Duration::hours(1);
        let range = DateRange::from_millis(
            start.timestamp_millis(),
            end.timestamp_millis(),
            "startDateInTimestampMillis",
            "endDateInTimestampMillis",
        )
        .unwrap();
        assert_eq!(range, DateRange::new(start, end));

        let err = DateRange::from_millis(
            0,
            i64::MAX,
            "startDateInTimestampMillis",
            "endDateInTimestampMillis",
        )
        .unwrap_err();
        assert!(
            matches!(err, AppError::Validation { param, .. } if param == "endDateInTimestampMillis")
        );
    }

    #[test]
    fn test_from_millis_rejects_dates_before_storable_range() {
        let future = at(10).timestamp_millis();

        let err = DateRange::from_millis(
            MIN_STORABLE_MILLIS - 1,
            future,
            "startDateInTimestampMillis",
            "endDateInTimestampMillis",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation { param, .. } if param == "startDateInTimestampMillis"
        ));

        let earliest = DateRange::from_millis(
            MIN_STORABLE_MILLIS,
            future,
            "startDateInTimestampMillis",
            "endDateInTimestampMillis",
        )
        .unwrap();
        assert_eq!(
            earliest.start,
            Utc.with_ymd_and_hms(-4713, 11, 24, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_iso_string_matches_javascript() {
        let instant: DateTime<FixedOffset> = Utc
            .with_ymd_and_hms(2024, 7, 11, 9, 30, 0)
            .unwrap()
            .into();
        assert_eq!(to_iso_string(instant), "2024-07-11T09:30:00.000Z");
    }
}
