use chrono::{DateTime, Months, TimeDelta, TimeZone};

/// Average month length in days.
pub const DAYS_PER_MONTH: f64 = 30.4;

/// Time-width grouping of chart points.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Bucket {
    Week,
    Month,
}

impl Bucket {
    /// Scale the monthly estimate to the bucket width.
    ///
    /// Week estimates are whole units.
    #[must_use]
    pub fn scale(self, monthly: f64) -> f64 {
        match self {
            Self::Week => (monthly / DAYS_PER_MONTH * 7.0).round(),
            Self::Month => monthly,
        }
    }

    /// Advance the time by one bucket, [`None`] on overflow.
    #[must_use]
    pub fn advance<Tz: TimeZone>(self, time: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self {
            Self::Week => time.clone().checked_add_signed(TimeDelta::weeks(1)),
            Self::Month => time.clone().checked_add_months(Months::new(1)),
        }
    }
}

/// Midnight of January 1st of the year, [`None`] when it does not exist in the time zone.
#[must_use]
pub fn start_of_year<Tz: TimeZone>(time_zone: &Tz, year: i32) -> Option<DateTime<Tz>> {
    time_zone.with_ymd_and_hms(year, 1, 1, 0, 0, 0).earliest()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, Utc};

    use super::*;

    #[test]
    fn test_scale() {
        assert_abs_diff_eq!(Bucket::Week.scale(304.0), 70.0);
        assert_abs_diff_eq!(Bucket::Week.scale(31.0), 7.0);
        assert_abs_diff_eq!(Bucket::Month.scale(123.4), 123.4);
    }

    #[test]
    fn test_advance_month_clamps_day() {
        let time = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        let next = Bucket::Month.advance(&time).unwrap();
        assert_eq!((next.month(), next.day()), (2, 29));
    }

    #[test]
    fn test_advance_week() {
        let time = Utc.with_ymd_and_hms(2024, 12, 28, 0, 0, 0).unwrap();
        assert_eq!(Bucket::Week.advance(&time), Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).single());
    }

    #[test]
    fn test_start_of_year() {
        assert_eq!(start_of_year(&Utc, 2025), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single());
    }
}
