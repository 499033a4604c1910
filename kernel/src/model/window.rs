use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use shared::error::{AppError, AppResult};

/// A half-open interval `[start, end)` on the UTC timeline.
///
/// Construction enforces `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::UnprocessableEntity(format!(
                "start time {start} must be earlier than end time {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole UTC calendar day `[00:00, 00:00 next day)`.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }

    /// The span covering both calendar dates inclusively.
    pub fn date_range(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<Self> {
        if start_date > end_date {
            return Err(AppError::UnprocessableEntity(format!(
                "start date {start_date} must not be after end date {end_date}"
            )));
        }
        let start = start_date.and_time(NaiveTime::MIN).and_utc();
        let end = end_date.and_time(NaiveTime::MIN).and_utc() + TimeDelta::days(1);
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open intervals overlap iff each one starts before the other ends.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn window(start: &str, end: &str) -> BookingWindow {
        BookingWindow::new(ts(start), ts(end)).unwrap()
    }

    fn ts(value: &str) -> DateTime<Utc> {
        value.parse().unwrap()
    }

    #[test]
    fn inverted_and_empty_intervals_are_rejected() {
        let start = ts("2024-01-10T09:00:00Z");
        assert!(BookingWindow::new(start, start).is_err());
        assert!(BookingWindow::new(start, start - TimeDelta::minutes(1)).is_err());
    }

    #[rstest]
    // Identical and partially shifted intervals collide.
    #[case("2024-01-10T09:00:00Z", "2024-01-10T09:30:00Z", true)]
    #[case("2024-01-10T09:15:00Z", "2024-01-10T09:45:00Z", true)]
    // One interval fully inside the other.
    #[case("2024-01-10T09:10:00Z", "2024-01-10T09:20:00Z", true)]
    #[case("2024-01-10T08:00:00Z", "2024-01-10T11:00:00Z", true)]
    // Abutting intervals share only the boundary instant, which the
    // half-open convention excludes.
    #[case("2024-01-10T09:30:00Z", "2024-01-10T10:00:00Z", false)]
    #[case("2024-01-10T08:30:00Z", "2024-01-10T09:00:00Z", false)]
    // Fully disjoint.
    #[case("2024-01-10T11:00:00Z", "2024-01-10T12:00:00Z", false)]
    fn overlap_follows_half_open_convention(
        #[case] start: &str,
        #[case] end: &str,
        #[case] expected: bool,
    ) {
        let standup = window("2024-01-10T09:00:00Z", "2024-01-10T09:30:00Z");
        let other = window(start, end);
        assert_eq!(standup.overlaps(&other), expected);
        assert_eq!(other.overlaps(&standup), expected);
    }

    #[test]
    fn day_window_spans_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let day = BookingWindow::day(date);
        assert_eq!(day.start(), ts("2024-01-10T00:00:00Z"));
        assert_eq!(day.end(), ts("2024-01-11T00:00:00Z"));
    }

    #[test]
    fn date_range_is_inclusive_of_both_endpoints() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let range = BookingWindow::date_range(start, end).unwrap();
        assert_eq!(range.start(), ts("2024-01-10T00:00:00Z"));
        assert_eq!(range.end(), ts("2024-01-13T00:00:00Z"));

        // A single-day range equals the day window.
        let single = BookingWindow::date_range(start, start).unwrap();
        assert_eq!(single, BookingWindow::day(start));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(BookingWindow::date_range(start, end).is_err());
    }
}
