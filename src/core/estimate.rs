use std::ops::Index;

use bon::Builder;
use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::core::{bucket::Bucket, point::ChartPoint, series::Series};

pub const N_MONTHS: usize = 12;

/// Expected total per calendar month, January first.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize, derive_more::From)]
#[serde(transparent)]
pub struct EstimateTable(pub [f64; N_MONTHS]);

impl Index<u32> for EstimateTable {
    type Output = f64;

    /// Index by the zero-based month, as in [`Datelike::month0`].
    fn index(&self, month0: u32) -> &Self::Output {
        &self.0[month0 as usize % N_MONTHS]
    }
}

impl EstimateTable {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Estimates are configured when they do not sum up to zero.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.total() != 0.0
    }

    /// Estimates aligned by month index: the i-th actual point gets the i-th estimate.
    ///
    /// Never wraps around: the projection stops at December.
    #[must_use]
    pub fn by_month_index(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    /// Upper bound of the daily estimate band for the day.
    ///
    /// Averages the current month with the next one in the second half of the month,
    /// and with the previous one in the first half.
    #[must_use]
    pub fn daily_band<Tz: TimeZone>(&self, today: &DateTime<Tz>) -> f64 {
        let current = today.month0();
        let neighbour = if today.day() > 15 { (current + 1) % 12 } else { (current + 11) % 12 };
        (self[current] + self[neighbour]) / 2.0 / 30.0
    }
}

/// Projects the monthly estimates onto the time buckets of the actual series.
#[must_use]
#[derive(Builder)]
pub struct EstimateProjector<'a, Tz: TimeZone> {
    table: &'a EstimateTable,
    bucket: Bucket,
    time_zone: Tz,

    /// Exclusive boundary of the projection, normally the start of the next year.
    until: DateTime<Tz>,
}

impl<Tz: TimeZone> EstimateProjector<'_, Tz> {
    /// Emit one estimate per month transition of the actual series and at its last point,
    /// then continue bucket by bucket until the boundary.
    ///
    /// `from` is where the forward projection starts when there is no actual data.
    pub fn project(&self, actual: &[ChartPoint], from: DateTime<Tz>) -> Series {
        let mut projection = Vec::new();
        let mut last_month = None;
        let mut cursor = from;

        for (index, point) in actual.iter().enumerate() {
            let Some(time) = point.time(&self.time_zone) else {
                continue;
            };
            let month = time.month0();
            if last_month != Some(month) || index + 1 == actual.len() {
                projection.push(ChartPoint::at(&time, self.bucket.scale(self.table[month])));
                last_month = Some(month);
            }
            cursor = time;
        }

        while cursor < self.until {
            let Some(next) = self.bucket.advance(&cursor) else {
                break;
            };
            cursor = next;
            let month = cursor.month0();
            if last_month != Some(month) {
                projection.push(ChartPoint::at(&cursor, self.bucket.scale(self.table[month])));
                last_month = Some(month);
            }
        }

        // The last transition is past the boundary by construction:
        let until = self.until.timestamp_millis();
        projection.retain(|point| point.millis() < until);
        projection
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, Utc};
    use itertools::Itertools;

    use super::*;

    const DAILY: EstimateTable =
        EstimateTable([31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0]);

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn projector(table: &EstimateTable, bucket: Bucket) -> EstimateProjector<'_, Utc> {
        EstimateProjector::builder()
            .table(table)
            .bucket(bucket)
            .time_zone(Utc)
            .until(at(2025, 1, 1))
            .build()
    }

    /// Weekly actual points starting at the Monday, until the day.
    fn weekly_until(last: DateTime<Utc>) -> Vec<ChartPoint> {
        let mut time = at(2024, 1, 1);
        let mut points = Vec::new();
        while time <= last {
            points.push(ChartPoint::at(&time, 1.0));
            time += TimeDelta::weeks(1);
        }
        points
    }

    #[test]
    fn test_weekly_march_estimate() {
        let actual = weekly_until(at(2024, 3, 20));
        let projection = projector(&DAILY, Bucket::Week).project(&actual, at(2024, 3, 20));
        let march = projection
            .iter()
            .find(|point| point.time(&Utc).unwrap().month() == 3)
            .unwrap();
        assert_abs_diff_eq!(march.value(), (31.0_f64 / 30.4 * 7.0).round());
    }

    #[test]
    fn test_never_reaches_boundary() {
        let until = at(2025, 1, 1).timestamp_millis();
        for last in [at(2024, 1, 1), at(2024, 6, 15), at(2024, 12, 30)] {
            let actual = weekly_until(last);
            for bucket in [Bucket::Week, Bucket::Month] {
                let projection = projector(&DAILY, bucket).project(&actual, last);
                assert!(!projection.is_empty());
                assert!(projection.iter().all(|point| point.millis() < until));
            }
        }
    }

    #[test]
    fn test_one_point_per_month_transition() {
        let actual = weekly_until(at(2024, 5, 20));
        let projection = projector(&DAILY, Bucket::Week).project(&actual, at(2024, 5, 20));
        let months = projection.iter().map(|point| point.time(&Utc).unwrap().month()).collect_vec();
        // Every month January through December, May once more at the last actual point:
        assert_eq!(months, [1, 2, 3, 4, 5, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(projection[5].millis(), actual.last().unwrap().millis());
    }

    #[test]
    fn test_forward_projection_starts_after_actual_data() {
        let actual = weekly_until(at(2024, 11, 1));
        let last = actual.last().unwrap().millis();
        let projection = projector(&DAILY, Bucket::Week).project(&actual, at(2024, 11, 1));
        let forward = projection
            .iter()
            .filter(|point| point.millis() > last)
            .map(|point| point.time(&Utc).unwrap().month())
            .collect_vec();
        assert_eq!(forward, [11, 12]);
    }

    #[test]
    fn test_no_actual_data_projects_from_now() {
        let projection = projector(&DAILY, Bucket::Month).project(&[], at(2024, 9, 10));
        let months = projection.iter().map(|point| point.time(&Utc).unwrap().month()).collect_vec();
        assert_eq!(months, [10, 11, 12]);
        assert_abs_diff_eq!(projection[0].value(), 31.0);
    }

    #[test]
    fn test_monthly_bucket_uses_estimate_directly() {
        let actual = [ChartPoint::at(&at(2024, 1, 1), 10.0), ChartPoint::at(&at(2024, 2, 1), 20.0)];
        let projection = projector(&DAILY, Bucket::Month).project(&actual, at(2024, 2, 1));
        assert_eq!(projection.len(), 12);
        assert_abs_diff_eq!(projection[1].value(), 28.0);
        assert_abs_diff_eq!(projection[11].value(), 31.0);
    }

    #[test]
    fn test_configured() {
        assert!(!EstimateTable::default().is_configured());
        assert!(DAILY.is_configured());
    }

    #[test]
    fn test_by_month_index_stops_at_december() {
        let estimates = DAILY.by_month_index();
        assert_eq!(estimates.len(), N_MONTHS);
        assert_abs_diff_eq!(estimates[1], 28.0);
    }

    #[test]
    fn test_daily_band_wraps() {
        let mut table = EstimateTable::default();
        table.0[0] = 600.0;
        table.0[11] = 300.0;
        assert_abs_diff_eq!(table.daily_band(&at(2024, 1, 10)), 15.0);
        assert_abs_diff_eq!(table.daily_band(&at(2024, 12, 20)), 15.0);
        assert_abs_diff_eq!(table.daily_band(&at(2024, 12, 10)), 5.0);
    }
}
