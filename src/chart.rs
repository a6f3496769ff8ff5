mod options;

use chrono::{DateTime, Datelike, TimeZone};
use itertools::Itertools;
use serde::Deserialize;

pub use self::options::{
    AxisKind,
    ChartOptions,
    PlotBand,
    Series,
    SeriesData,
    SeriesKind,
    Toggle,
    Tooltip,
    XAxis,
    YAxis,
};
use crate::{
    api::pvlng::{Period, Response},
    core::{
        bucket::{Bucket, start_of_year},
        estimate::{EstimateProjector, EstimateTable},
        point::{FullRow, RawPoint},
        series::{SeriesBuilder, build_consumption},
    },
    i18n::Translator,
    prelude::*,
};

pub const ACTUAL_COLOR: &str = "#7cb5ec";
pub const ESTIMATE_COLOR: &str = "#90ed7d";

const MONTH_NAMES: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Number of the most recent daily points on the week chart.
const N_WEEK_DAYS: usize = 7;

/// Container the chart is drawn into.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum ChartId {
    #[display("day-chart")]
    Day,

    #[display("week-chart")]
    Week,

    #[display("month-chart")]
    Month,

    #[display("year-chart")]
    Year,
}

/// How the year chart buckets the data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearView {
    /// Weekly columns on a date axis.
    #[default]
    Weeks,

    /// Monthly columns on a date axis.
    Months,

    /// Monthly columns on a month name axis, estimates aligned by index.
    MonthIndex,
}

impl YearView {
    pub const fn period(self) -> Period {
        match self {
            Self::Weeks => Period::Week,
            Self::Months | Self::MonthIndex => Period::Month,
        }
    }

    const fn bucket(self) -> Option<Bucket> {
        match self {
            Self::Weeks => Some(Bucket::Week),
            Self::Months => Some(Bucket::Month),
            Self::MonthIndex => None,
        }
    }
}

/// Today's power curve.
pub fn build_day_chart(response: Response<RawPoint>) -> ChartOptions {
    let name = response.attribute.plain_name();
    let data = SeriesBuilder::from_attribute(&response.attribute).build(response.rows);
    ChartOptions::new(
        XAxis::DATETIME,
        Tooltip::builder()
            .shared(true)
            .value_suffix(format!(" {}", response.attribute.unit))
            .x_date_format("%H:%M")
            .build(),
        YAxis::titled(response.attribute.unit),
    )
    .with_title(name.clone())
    .with_series(
        Series::builder()
            .color(ACTUAL_COLOR)
            .name(name)
            .kind(SeriesKind::Areaspline)
            .marker(Toggle::DISABLED)
            .data(data)
            .build(),
    )
}

/// Daily yield of the last week and the last month, against the daily estimate band.
pub fn build_recent_charts<Tz: TimeZone>(
    response: Response<RawPoint>,
    estimate: &EstimateTable,
    today: &DateTime<Tz>,
) -> [(ChartId, ChartOptions); 2] {
    let name = response.attribute.plain_name();
    let month = SeriesBuilder::from_attribute(&response.attribute).build(response.rows);
    let week = month[month.len().saturating_sub(N_WEEK_DAYS)..].to_vec();

    let mut y_axis = YAxis::titled(response.attribute.unit.clone());
    if estimate.is_configured() {
        y_axis = y_axis.with_plot_band(PlotBand {
            color: ESTIMATE_COLOR,
            from: 0.0,
            to: estimate.daily_band(today),
        });
    }
    let options = ChartOptions::new(
        XAxis::DATETIME,
        Tooltip::builder()
            .value_suffix(format!(" {}", response.attribute.unit))
            .x_date_format("%Y-%m-%d")
            .build(),
        y_axis,
    );
    let series = |data: SeriesData| {
        Series::builder().color(ACTUAL_COLOR).name(name.clone()).kind(SeriesKind::Column).data(data)
    };

    [
        (ChartId::Week, options.clone().with_series(series(week.into()).build())),
        (ChartId::Month, options.with_series(series(month.into()).build())),
    ]
}

/// Consumption of the current year with the estimates projected until its end.
///
/// The estimate series is omitted when no estimates are configured.
pub fn build_year_chart<Tz: TimeZone>(
    response: Response<FullRow>,
    view: YearView,
    estimate: &EstimateTable,
    translator: &Translator,
    now: &DateTime<Tz>,
) -> Result<ChartOptions> {
    let name = response.attribute.plain_name();
    let tooltip = Tooltip::builder()
        .shared(true)
        .value_suffix(format!(" {}", response.attribute.unit));
    let y_axis = YAxis::titled(response.attribute.unit.clone());

    let (options, actual, estimated): (_, SeriesData, SeriesData) = match view.bucket() {
        Some(bucket) => {
            let actual = build_consumption(response.rows);
            let until = start_of_year(&now.timezone(), now.year() + 1)
                .context("the next year does not start in the time zone")?;
            let estimated = EstimateProjector::builder()
                .table(estimate)
                .bucket(bucket)
                .time_zone(now.timezone())
                .until(until)
                .build()
                .project(&actual, now.clone());
            let tooltip = tooltip.x_date_format("%Y-%m-%d").build();
            (ChartOptions::new(XAxis::DATETIME, tooltip, y_axis), actual.into(), estimated.into())
        }
        None => {
            let actual = response.rows.iter().map(|row| row.consumption.round()).collect_vec();
            let categories = MONTH_NAMES.iter().map(|month| translator.lazy(month)).collect();
            let options = ChartOptions::new(XAxis::categories(categories), tooltip.build(), y_axis);
            (options, actual.into(), estimate.by_month_index().into())
        }
    };

    let mut options = options.with_series(
        Series::builder().color(ACTUAL_COLOR).name(name).kind(SeriesKind::Column).data(actual).build(),
    );
    if estimate.is_configured() {
        options = options.with_series(
            Series::builder()
                .color(ESTIMATE_COLOR)
                .name(translator.strict("estimate"))
                .kind(SeriesKind::Spline)
                .marker(Toggle::DISABLED)
                .data(estimated)
                .build(),
        );
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    use super::*;
    use crate::core::{attribute::Attribute, point::ChartPoint};

    const ESTIMATE: EstimateTable =
        EstimateTable([30.0, 60.0, 90.0, 120.0, 150.0, 150.0, 150.0, 120.0, 90.0, 60.0, 30.0, 30.0]);

    fn energy() -> Attribute {
        Attribute::builder().name("Yield &amp; Co").unit("kWh").decimals(1).meter(true).build()
    }

    fn translator() -> Translator {
        Translator::from(HashMap::from([("estimate".to_owned(), "Estimate".to_owned())]))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_day_chart() {
        let attribute = Attribute::builder().name("Inverter").unit("W").build();
        let rows = vec![RawPoint::new(100, 10.0), RawPoint::new(400, 25.5)];
        let options = build_day_chart(Response { attribute, rows });
        assert_eq!(options.title.map(|title| title.text).as_deref(), Some("Inverter"));
        assert_eq!(options.tooltip.value_suffix, " W");
        assert_eq!(options.series.len(), 1);
        assert_eq!(options.series[0].kind, SeriesKind::Areaspline);
        assert_eq!(options.series[0].data, SeriesData::Points(vec![ChartPoint(100_000, 10.0), ChartPoint(400_000, 25.5)]));
    }

    #[test]
    fn test_recent_charts() {
        let rows =
            (0..30_i32).map(|day| RawPoint::new(i64::from(day) * 86_400, f64::from(day) * 10.0)).collect();
        let [(week_id, week), (month_id, month)] =
            build_recent_charts(Response { attribute: energy(), rows }, &ESTIMATE, &now());
        assert_eq!((week_id, month_id), (ChartId::Week, ChartId::Month));
        assert_eq!(week.series[0].data.len(), 7);
        assert_eq!(month.series[0].data.len(), 30);
        assert_eq!(week.series[0].name, "Yield & Co");
        assert_abs_diff_eq!(week.series[0].data.last_value().unwrap(), 10.0);
        // March 20th: average of March and April, per day:
        assert_abs_diff_eq!(week.y_axis.plot_bands[0].to, (90.0 + 120.0) / 2.0 / 30.0);
    }

    #[test]
    fn test_recent_charts_without_estimate() {
        let [(_, week), _] = build_recent_charts(
            Response { attribute: energy(), rows: Vec::new() },
            &EstimateTable::default(),
            &now(),
        );
        assert!(week.series[0].data.is_empty());
        assert!(week.y_axis.plot_bands.is_empty());
    }

    #[test]
    fn test_year_chart_weeks() -> Result {
        let rows = (0..11)
            .map(|week| FullRow { timestamp: 1_704_067_200 + week * 7 * 86_400, consumption: 12.4 })
            .collect();
        let options = build_year_chart(
            Response { attribute: energy(), rows },
            YearView::Weeks,
            &ESTIMATE,
            &translator(),
            &now(),
        )?;
        assert_eq!(options.x_axis.kind, AxisKind::Datetime);
        assert_eq!(options.series.len(), 2);
        assert_eq!(options.series[0].data.len(), 11);
        assert_abs_diff_eq!(options.series[0].data.last_value().unwrap(), 12.0);
        assert_eq!(options.series[1].name, "Estimate");
        assert_eq!(options.series[1].kind, SeriesKind::Spline);
        // January through March, once more at the last actual point, then April through December:
        assert_eq!(options.series[1].data.len(), 13);
        Ok(())
    }

    #[test]
    fn test_year_chart_omits_unconfigured_estimate() -> Result {
        let options = build_year_chart(
            Response { attribute: energy(), rows: Vec::new() },
            YearView::Months,
            &EstimateTable::default(),
            &translator(),
            &now(),
        )?;
        assert_eq!(options.series.len(), 1);
        Ok(())
    }

    #[test]
    fn test_year_chart_month_index() -> Result {
        let rows = vec![FullRow { timestamp: 1_704_067_200, consumption: 29.6 }];
        let options = build_year_chart(
            Response { attribute: energy(), rows },
            YearView::MonthIndex,
            &ESTIMATE,
            &translator(),
            &now(),
        )?;
        assert_eq!(options.x_axis.kind, AxisKind::Category);
        assert_eq!(options.x_axis.categories.len(), 12);
        assert_eq!(options.series[0].data, SeriesData::Values(vec![30.0]));
        assert_eq!(options.series[1].data, SeriesData::Values(ESTIMATE.0.to_vec()));
        Ok(())
    }
}
