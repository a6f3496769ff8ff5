mod error;
mod response;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};

pub use self::{error::FetchError, response::Response};
use crate::{
    core::{
        badge::{Badge, Reading},
        point::{FullRow, RawPoint},
    },
    i18n::Translator,
    prelude::*,
};

const NO_QUERY: &[(&str, &str)] = &[];

/// Aggregation period of the data endpoint.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Period {
    #[serde(rename = "5i")]
    FiveMinutes,

    #[serde(rename = "1d")]
    Day,

    #[serde(rename = "7d")]
    Week,

    #[serde(rename = "1m")]
    Month,
}

/// PVLng JSON API client.
pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent("pvlng-dashboard")
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    #[instrument(skip_all)]
    pub async fn get_title(&self) -> Result<String, FetchError> {
        let title: String = self.get(&["settings", "title"], NO_QUERY).await?;
        info!(title = %title, "fetched the title");
        Ok(title)
    }

    #[instrument(skip_all, fields(language = language))]
    pub async fn get_translations(&self, language: &str) -> Result<Translator, FetchError> {
        let translator: Translator =
            self.get(&["translate", language, "dashboard"], NO_QUERY).await?;
        info!(n_texts = translator.n_texts(), "fetched the translations");
        Ok(translator)
    }

    /// Fetch the attribute and the latest reading of the badge channel.
    #[instrument(skip_all, fields(guid = %badge.guid))]
    pub async fn get_last_reading(&self, badge: &Badge) -> Result<Response<Reading>, FetchError> {
        let (path, query) = last_reading_request(badge);
        self.get(&path, &query).await
    }

    /// Fetch the short-format series: `[timestamp, data]` rows.
    #[instrument(skip_all, fields(guid = guid, period = ?period, start = ?start))]
    pub async fn get_series(
        &self,
        guid: &str,
        period: Period,
        start: Option<i64>,
    ) -> Result<Response<RawPoint>, FetchError> {
        let response: Response<RawPoint> =
            self.get(&["data", guid], &DataQuery::short(period, start)).await?;
        debug!(n_rows = response.rows.len(), "fetched");
        Ok(response)
    }

    /// Fetch the full-format series, which includes the per-bucket consumption.
    #[instrument(skip_all, fields(guid = guid, period = ?period, start = ?start))]
    pub async fn get_full_series(
        &self,
        guid: &str,
        period: Period,
        start: Option<i64>,
    ) -> Result<Response<FullRow>, FetchError> {
        let response: Response<FullRow> =
            self.get(&["data", guid], &DataQuery::full(period, start)).await?;
        debug!(n_rows = response.rows.len(), "fetched");
        Ok(response)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = ?path))]
    async fn get<R: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &(impl Serialize + ?Sized),
    ) -> Result<R, FetchError> {
        let path = path.join("/");
        let url = self.url(&path)?;
        let transport = |source| FetchError::Transport { path: path.clone(), source };
        let body = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .bytes()
            .await
            .map_err(transport)?;
        debug!(n_bytes = body.len(), "received");
        serde_json::from_slice(&body).map_err(|source| FetchError::Malformed { path, source })
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Url(path.to_owned()))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }
}

/// Sunrise and sunset have their own endpoints, which format the time on the server.
fn last_reading_request(badge: &Badge) -> (Vec<&str>, LastReadingQuery) {
    if badge.is_sun_event() {
        (vec![badge.guid.as_str()], LastReadingQuery { attributes: true, format: Some("H:i") })
    } else {
        (vec!["data", "last", badge.guid.as_str()], LastReadingQuery { attributes: true, format: None })
    }
}

#[derive(Serialize)]
struct LastReadingQuery {
    attributes: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Serialize)]
struct DataQuery {
    attributes: bool,
    period: Period,

    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<i64>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    short: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    full: bool,
}

impl DataQuery {
    const fn short(period: Period, start: Option<i64>) -> Self {
        Self { attributes: true, period, start, short: true, full: false }
    }

    const fn full(period: Period, start: Option<i64>) -> Self {
        Self { attributes: true, period, start, short: false, full: true }
    }
}
