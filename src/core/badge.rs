use std::fmt::Display;

use bon::Builder;
use chrono::{DateTime, TimeDelta, TimeZone};
use html_escape::decode_html_entities;
use serde::Deserialize;

use crate::{
    core::attribute::Attribute,
    i18n::Translator,
};

/// Instantaneous readings older than this are not shown.
pub const MAX_AGE: TimeDelta = TimeDelta::minutes(10);

pub const MISSING: &str = "?";
pub const STALE: &str = "-";

/// Channels served by their own endpoint, already formatted as time of day.
const SUN_EVENTS: [&str; 2] = ["sunrise", "sunset"];

/// Configured badge: one channel to show the latest reading of.
#[must_use]
#[derive(Clone, Debug, Deserialize, Builder)]
pub struct Badge {
    #[builder(into)]
    pub guid: String,

    #[builder(into, default)]
    #[serde(default)]
    pub icon: String,

    /// Overrides the attribute's default precision.
    pub decimals: Option<usize>,
}

impl Badge {
    #[must_use]
    pub fn is_sun_event(&self) -> bool {
        SUN_EVENTS.contains(&self.guid.as_str())
    }
}

/// Latest sample of a badge channel.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Reading {
    pub timestamp: i64,

    #[serde(rename = "data")]
    pub value: ReadingValue,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

/// Texts of a rendered badge.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadgeView {
    pub icon: String,
    pub name: String,
    pub unit: String,
    pub value: String,
    pub date: String,
    pub time: String,
}

impl BadgeView {
    /// Freshly created badge, before any data arrives.
    pub fn empty(badge: &Badge) -> Self {
        Self {
            icon: badge.icon.clone(),
            name: String::new(),
            unit: String::new(),
            value: String::new(),
            date: String::new(),
            time: String::new(),
        }
    }
}

/// Fills a badge from the channel attribute and its latest reading.
#[must_use]
#[derive(Builder)]
pub struct BadgeUpdater<'a, Tz: TimeZone> {
    translator: &'a Translator,
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> BadgeUpdater<'_, Tz>
where
    Tz::Offset: Display,
{
    pub fn update(
        &self,
        view: &mut BadgeView,
        badge: &Badge,
        attribute: &Attribute,
        reading: Option<&Reading>,
    ) {
        view.name = self.name(attribute);
        view.unit.clone_from(&attribute.unit);

        let time = reading.and_then(|reading| {
            DateTime::from_timestamp(reading.timestamp, 0)
                .map(|time| (reading, time.with_timezone(&self.now.timezone())))
        });
        let Some((reading, time)) = time else {
            MISSING.clone_into(&mut view.value);
            MISSING.clone_into(&mut view.date);
            MISSING.clone_into(&mut view.time);
            return;
        };

        view.value = if !attribute.meter && time.clone() + MAX_AGE < self.now {
            STALE.to_owned()
        } else {
            let decimals = badge.decimals.unwrap_or(attribute.decimals);
            normalize_negative_zero(format_value(&reading.value, attribute.numeric, decimals))
        };
        view.date = time.format("%Y-%m-%d").to_string();
        view.time = time.format("%H:%M:%S").to_string();
    }

    fn name(&self, attribute: &Attribute) -> String {
        let name = self.translator.lazy(&attribute.name);
        let name = decode_html_entities(&name).into_owned();
        match attribute.description() {
            Some(description) => format!("{name} ({})", decode_html_entities(description)),
            None => name,
        }
    }
}

fn format_value(value: &ReadingValue, is_numeric: bool, decimals: usize) -> String {
    match value {
        ReadingValue::Number(number) if is_numeric => format!("{number:.decimals$}"),
        ReadingValue::Number(number) => number.to_string(),
        ReadingValue::Text(text) => text.clone(),
    }
}

/// Rounding a small negative value yields `-0`, which is just `0`.
fn normalize_negative_zero(value: String) -> String {
    match value.strip_prefix('-') {
        Some(unsigned) if unsigned.parse::<f64>().is_ok_and(|number| number == 0.0) => {
            unsigned.to_owned()
        }
        _ => value,
    }
}
