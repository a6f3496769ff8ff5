use std::fmt::Formatter;

use chrono::{DateTime, TimeZone};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    de::{Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor},
};

/// Time series sample as returned by the API.
///
/// Accepts both the short row `[timestamp, data, …]` and the full row object
/// `{"timestamp": …, "data": …, …}`, extra columns are ignored.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Constructor)]
pub struct RawPoint {
    /// Unix timestamp in seconds.
    pub timestamp: i64,

    pub value: f64,
}

impl RawPoint {
    #[must_use]
    pub const fn timestamp_millis(self) -> i64 {
        self.timestamp * 1000
    }
}

impl<'de> Deserialize<'de> for RawPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawPointVisitor)
    }
}

struct RawPointVisitor;

impl<'de> Visitor<'de> for RawPointVisitor {
    type Value = RawPoint;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("`[timestamp, data]` or `{\"timestamp\", \"data\"}`")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let timestamp = seq.next_element()?.ok_or_else(|| A::Error::invalid_length(0, &self))?;
        let value = seq.next_element()?.ok_or_else(|| A::Error::invalid_length(1, &self))?;
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawPoint { timestamp, value })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut timestamp = None;
        let mut value = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "timestamp" => timestamp = Some(map.next_value()?),
                "data" => value = Some(map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(RawPoint {
            timestamp: timestamp.ok_or_else(|| A::Error::missing_field("timestamp"))?,
            value: value.ok_or_else(|| A::Error::missing_field("data"))?,
        })
    }
}

/// Full-format row, the API computes the per-bucket consumption for meter channels.
#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct FullRow {
    pub timestamp: i64,

    #[serde(default)]
    pub consumption: f64,
}

/// Chart-ready point: Unix timestamp in milliseconds and the value.
///
/// Serialized as a two-element array, which is what the chart renderer expects.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint(pub i64, pub f64);

impl ChartPoint {
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.1
    }

    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>, value: f64) -> Self {
        Self(time.timestamp_millis(), value)
    }

    /// Convert the timestamp into the time zone, [`None`] when it is out of range.
    #[must_use]
    pub fn time<Tz: TimeZone>(self, time_zone: &Tz) -> Option<DateTime<Tz>> {
        time_zone.timestamp_millis_opt(self.0).single()
    }
}
