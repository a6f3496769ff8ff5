use bon::Builder;
use html_escape::decode_html_entities;
use serde::Deserialize;
use serde_with::{BoolFromInt, DisplayFromStr, PickFirst, formats::Flexible, serde_as};

/// Channel metadata: the leading row of every data response.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize, Builder)]
pub struct Attribute {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub description: Option<String>,

    #[builder(into, default)]
    #[serde(default)]
    pub unit: String,

    /// Default rounding precision.
    #[builder(default)]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub decimals: usize,

    #[builder(default = true)]
    #[serde_as(as = "PickFirst<(_, BoolFromInt<Flexible>)>")]
    #[serde(default = "default_numeric")]
    pub numeric: bool,

    /// Cumulative counter, as opposed to an instantaneous reading.
    #[builder(default)]
    #[serde_as(as = "PickFirst<(_, BoolFromInt<Flexible>)>")]
    #[serde(default)]
    pub meter: bool,
}

const fn default_numeric() -> bool {
    true
}

impl Attribute {
    /// Name with HTML entities decoded, the API returns it ready for HTML.
    #[must_use]
    pub fn plain_name(&self) -> String {
        decode_html_entities(&self.name).into_owned()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|description| !description.is_empty())
    }
}
