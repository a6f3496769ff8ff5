use bon::Builder;
use serde::Serialize;

use crate::core::point::ChartPoint;

/// Chart options document, as consumed by the charting front-end.
#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub chart: Chart,
    pub credits: Toggle,
    pub legend: Toggle,
    pub x_axis: XAxis,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,

    pub tooltip: Tooltip,
    pub y_axis: YAxis,
    pub series: Vec<Series>,
}

impl ChartOptions {
    pub fn new(x_axis: XAxis, tooltip: Tooltip, y_axis: YAxis) -> Self {
        Self {
            chart: Chart::default(),
            credits: Toggle::DISABLED,
            legend: Toggle::DISABLED,
            x_axis,
            title: None,
            tooltip,
            y_axis,
            series: Vec::new(),
        }
    }

    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(Title::new(text));
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Fix the height to the 16:9 aspect ratio of the container width.
    pub fn with_width(mut self, width: u32) -> Self {
        let height = u64::from(width) * 9 / 16;
        self.chart.height = Some(u32::try_from(height).unwrap_or(u32::MAX));
        self
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub spacing_left: u32,
    pub spacing_top: u32,
    pub spacing_right: u32,
    pub spacing_bottom: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Default for Chart {
    fn default() -> Self {
        Self { spacing_left: 0, spacing_top: 5, spacing_right: 0, spacing_bottom: 0, height: None }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    pub const DISABLED: Self = Self { enabled: false };
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct XAxis {
    #[serde(rename = "type")]
    pub kind: AxisKind,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl XAxis {
    pub const DATETIME: Self = Self { kind: AxisKind::Datetime, categories: Vec::new() };

    pub const fn categories(categories: Vec<String>) -> Self {
        Self { kind: AxisKind::Category, categories }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Datetime,
    Category,
}

#[must_use]
#[derive(Clone, Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[builder(default)]
    pub shared: bool,

    #[builder(into)]
    pub value_suffix: String,

    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_date_format: Option<String>,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    pub title: Title,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plot_bands: Vec<PlotBand>,
}

impl YAxis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self { title: Title::new(text), plot_bands: Vec::new() }
    }

    pub fn with_plot_band(mut self, plot_band: PlotBand) -> Self {
        self.plot_bands.push(plot_band);
        self
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct PlotBand {
    pub color: &'static str,
    pub from: f64,
    pub to: f64,
}

#[must_use]
#[derive(Clone, Debug, Serialize, Builder)]
pub struct Series {
    pub color: &'static str,

    #[builder(into)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: SeriesKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Toggle>,

    #[builder(into)]
    pub data: SeriesData,
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Areaspline,
    Column,
    Spline,
}

/// Timestamped points for date axes, bare values for category axes.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum SeriesData {
    Points(Vec<ChartPoint>),
    Values(Vec<f64>),
}

impl SeriesData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Values(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the last point.
    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        match self {
            Self::Points(points) => points.last().map(|point| point.value()),
            Self::Values(values) => values.last().copied(),
        }
    }
}
