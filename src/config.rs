use std::{fmt::Debug, fs, path::Path};

use reqwest::Url;
use serde::Deserialize;

use crate::{
    chart::YearView,
    core::{badge::Badge, estimate::EstimateTable},
    prelude::*,
};

/// Dashboard layout and the PVLng installation to show.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// PVLng host, optionally with a port.
    pub host: String,

    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default)]
    pub badges: Vec<Badge>,

    /// GUID of the power channel for the day chart.
    pub power: Option<String>,

    /// GUID of the energy meter channel for the week, month, and year charts.
    pub energy: Option<String>,

    #[serde(default)]
    pub estimate: EstimateTable,

    #[serde(default)]
    pub year_view: YearView,
}

fn default_scheme() -> String {
    "https".to_owned()
}

impl Config {
    #[instrument(name = "reading the configuration…")]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        ensure!(!config.host.is_empty(), "the host must not be empty");
        Ok(config)
    }

    /// Base URL of the API, ending with a slash so that endpoints can be joined.
    pub fn api_url(&self) -> Result<Url> {
        let url = format!("{}://{}/api/latest/", self.scheme, self.host);
        Url::parse(&url).with_context(|| format!("invalid API URL `{url}`"))
    }
}
