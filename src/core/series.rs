use crate::core::{
    attribute::Attribute,
    point::{ChartPoint, FullRow, RawPoint},
};

pub type Series = Vec<ChartPoint>;

/// Converts raw API samples into chart points.
///
/// The API aggregates by the requested period already, so no bucket merging happens here.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub enum SeriesBuilder {
    /// Cumulative counter: every point becomes the offset from the previous one.
    Offset { decimals: usize },

    /// Instantaneous reading: values pass through unrounded.
    Instant,
}

impl SeriesBuilder {
    pub const fn from_attribute(attribute: &Attribute) -> Self {
        if attribute.meter { Self::Offset { decimals: attribute.decimals } } else { Self::Instant }
    }

    pub fn build(self, points: impl IntoIterator<Item = RawPoint>) -> Series {
        match self {
            Self::Offset { decimals } => points
                .into_iter()
                .scan(0.0, |offset, point| {
                    let delta = point.value - *offset;
                    *offset = point.value;
                    Some(ChartPoint(point.timestamp_millis(), round_to(delta, decimals)))
                })
                .collect(),
            Self::Instant => points
                .into_iter()
                .map(|point| ChartPoint(point.timestamp_millis(), point.value))
                .collect(),
        }
    }
}

/// Build the series from the API-computed consumption, rounded to whole units.
pub fn build_consumption(rows: impl IntoIterator<Item = FullRow>) -> Series {
    rows.into_iter().map(|row| ChartPoint(row.timestamp * 1000, row.consumption.round())).collect()
}

/// Round half away from zero to the decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let decimals = i32::try_from(decimals).unwrap_or(i32::MAX).min(15);
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn meter(decimals: usize) -> Attribute {
        Attribute::builder().name("Energy").unit("Wh").decimals(decimals).meter(true).build()
    }

    #[test]
    fn test_offset_differencing() {
        let points = [RawPoint::new(10, 100.0), RawPoint::new(20, 150.0), RawPoint::new(30, 150.0)];
        let series = SeriesBuilder::from_attribute(&meter(0)).build(points);
        assert_eq!(series, [ChartPoint(10_000, 100.0), ChartPoint(20_000, 50.0), ChartPoint(30_000, 0.0)]);
    }

    #[test]
    fn test_offset_rounds_to_decimals() {
        let points = [RawPoint::new(1, 1.004), RawPoint::new(2, 2.337)];
        let series = SeriesBuilder::from_attribute(&meter(2)).build(points);
        assert_abs_diff_eq!(series[0].value(), 1.0);
        assert_abs_diff_eq!(series[1].value(), 1.33);
    }

    #[test]
    fn test_offset_prefix_sums_telescope() {
        let values = [12.5, 13.0, 17.25, 17.25, 30.0, 42.75];
        let points: Vec<_> =
            values.iter().zip(0..).map(|(value, index)| RawPoint::new(index * 60, *value)).collect();
        let series = SeriesBuilder::from_attribute(&meter(2)).build(points);
        for prefix in 1..=values.len() {
            let sum: f64 = series[..prefix].iter().map(|point| point.value()).sum();
            assert_abs_diff_eq!(sum, values[prefix - 1], epsilon = 1e-9);
        }
        for (start, end) in [(1, 3), (2, 6), (4, 5)] {
            let sum: f64 = series[start..end].iter().map(|point| point.value()).sum();
            assert_abs_diff_eq!(sum, values[end - 1] - values[start - 1], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_instant_passes_through() {
        let attribute = Attribute::builder().name("Power").unit("W").decimals(0).build();
        let series = SeriesBuilder::from_attribute(&attribute).build([RawPoint::new(300, 1234.56)]);
        assert_eq!(series, [ChartPoint(300_000, 1234.56)]);
    }

    #[test]
    fn test_empty() {
        assert!(SeriesBuilder::from_attribute(&meter(0)).build([]).is_empty());
        assert!(SeriesBuilder::Instant.build([]).is_empty());
    }

    #[test]
    fn test_build_consumption() {
        let rows = [FullRow { timestamp: 7, consumption: 10.5 }, FullRow { timestamp: 8, consumption: 3.4 }];
        assert_eq!(build_consumption(rows), [ChartPoint(7_000, 11.0), ChartPoint(8_000, 3.0)]);
    }

    #[test]
    fn test_round_to_negative() {
        assert_abs_diff_eq!(round_to(-0.25, 1), -0.3);
        assert_abs_diff_eq!(round_to(-0.004, 2), 0.0);
    }
}
