use std::fmt::Display;

use chrono::{DateTime, Datelike, Local};
use futures::future::join_all;
use anyhow::Context as _;

use crate::{
    api::pvlng::{Api, FetchError, Period, Response},
    chart::{ChartId, ChartOptions, build_day_chart, build_recent_charts, build_year_chart},
    config::Config,
    core::{
        badge::{Badge, BadgeUpdater, BadgeView, Reading},
        bucket::start_of_year,
    },
    i18n::{LANGUAGES, Translator, select_language},
    prelude::*,
};

/// Per-session state shared by all the sections.
#[must_use]
pub struct Context {
    pub config: Config,
    pub translator: Translator,
    pub title: String,

    /// Time of the current refresh.
    pub now: DateTime<Local>,
}

/// Independently fetched part of the dashboard.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section<T> {
    Ready(T),

    /// The fetch or the build failed, the reason is shown instead.
    Unavailable(String),
}

impl<T> Section<T> {
    pub fn new(name: impl Display, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => {
                let kind = failure_kind(&error);
                warn!(section = %name, kind, "section is unavailable: {error:#}");
                Self::Unavailable(format!("{error:#}"))
            }
        }
    }

    pub const fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}

/// Fetch failures are classified by the client, anything else failed while building the section.
fn failure_kind(error: &Error) -> &'static str {
    error.downcast_ref::<FetchError>().map_or("build", FetchError::kind)
}

#[must_use]
#[derive(Debug)]
pub struct BadgeSlot {
    pub badge: Badge,
    pub section: Section<BadgeView>,
}

pub struct Dashboard {
    api: Api,
    context: Context,
    badges: Vec<BadgeSlot>,
    charts: Vec<(ChartId, Section<ChartOptions>)>,
}

impl Dashboard {
    /// Start the session: the title and the translations must arrive before any refresh.
    #[instrument(skip_all, fields(host = %config.host))]
    pub async fn start(config: Config, languages: &[impl AsRef<str>]) -> Result<Self> {
        let api = Api::new(config.api_url()?)?;
        let language = select_language(languages, &LANGUAGES).unwrap_or(LANGUAGES[0]);
        info!(language, "starting the session…");
        let (title, translator) =
            tokio::try_join!(api.get_title(), api.get_translations(language))
                .context("failed to start the dashboard session")?;
        let context = Context { config, translator, title, now: Local::now() };
        Ok(Self { api, context, badges: Vec::new(), charts: Vec::new() })
    }

    pub const fn context(&self) -> &Context {
        &self.context
    }

    pub fn badges(&self) -> &[BadgeSlot] {
        &self.badges
    }

    pub fn charts(&self) -> &[(ChartId, Section<ChartOptions>)] {
        &self.charts
    }

    /// Fetch all the badges and charts concurrently and rebuild them.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn refresh(&mut self, now: DateTime<Local>) {
        self.context.now = now;
        self.create_badges();
        let (readings, charts) = tokio::join!(self.fetch_badges(), self.fetch_charts());

        let updater =
            BadgeUpdater::builder().translator(&self.context.translator).now(now).build();
        for (slot, result) in self.badges.iter_mut().zip(readings) {
            slot.section = Section::new(
                &slot.badge.guid,
                result.map_err(Error::from).map(|response| {
                    let (attribute, reading) = response.into_last();
                    let mut view = BadgeView::empty(&slot.badge);
                    updater.update(&mut view, &slot.badge, &attribute, reading.as_ref());
                    view
                }),
            );
        }
        self.charts = charts;
        info!(n_badges = self.badges.len(), n_charts = self.charts.len(), "refreshed");
    }

    /// Badges are created on the first refresh only.
    fn create_badges(&mut self) {
        if self.badges.is_empty() {
            self.badges = self
                .context
                .config
                .badges
                .iter()
                .map(|badge| BadgeSlot {
                    badge: badge.clone(),
                    section: Section::Ready(BadgeView::empty(badge)),
                })
                .collect();
        }
    }

    async fn fetch_badges(&self) -> Vec<Result<Response<Reading>, FetchError>> {
        join_all(self.badges.iter().map(|slot| self.api.get_last_reading(&slot.badge))).await
    }

    async fn fetch_charts(&self) -> Vec<(ChartId, Section<ChartOptions>)> {
        let (day, recent, year) = tokio::join!(
            self.fetch_day_chart(),
            self.fetch_recent_charts(),
            self.fetch_year_chart(),
        );
        day.into_iter().chain(recent.into_iter().flatten()).chain(year).collect()
    }

    async fn fetch_day_chart(&self) -> Option<(ChartId, Section<ChartOptions>)> {
        let guid = self.context.config.power.as_deref()?;
        let result = self.api.get_series(guid, Period::FiveMinutes, None).await;
        let section = Section::new(ChartId::Day, result.map(build_day_chart).map_err(Error::from));
        Some((ChartId::Day, section))
    }

    async fn fetch_recent_charts(&self) -> Option<[(ChartId, Section<ChartOptions>); 2]> {
        let guid = self.context.config.energy.as_deref()?;
        // The API takes a negative start as the number of days back:
        let result = self.api.get_series(guid, Period::Day, Some(-30)).await;
        Some(match result {
            Ok(response) => {
                build_recent_charts(response, &self.context.config.estimate, &self.context.now)
                    .map(|(id, options)| (id, Section::Ready(options)))
            }
            Err(error) => {
                let section = Section::new("recent charts", Err(error.into()));
                [(ChartId::Week, section.clone()), (ChartId::Month, section)]
            }
        })
    }

    async fn fetch_year_chart(&self) -> Option<(ChartId, Section<ChartOptions>)> {
        let guid = self.context.config.energy.as_deref()?;
        let view = self.context.config.year_view;
        let now = &self.context.now;
        let result = async {
            let start = start_of_year(&Local, now.year())
                .context("the year does not start in the local time zone")?;
            let response =
                self.api.get_full_series(guid, view.period(), Some(start.timestamp())).await?;
            build_year_chart(
                response,
                view,
                &self.context.config.estimate,
                &self.context.translator,
                now,
            )
        };
        Some((ChartId::Year, Section::new(ChartId::Year, result.await)))
    }
}
