use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Dashboard layout: the PVLng host, badges, charted channels, and the estimates.
    #[clap(long, env = "DASHBOARD_CONFIG", default_value = "dashboard.toml")]
    pub config: PathBuf,

    /// Preferred languages, the most preferred first.
    #[clap(long, env = "LANGUAGE", value_delimiter = ':', default_value = "en")]
    pub languages: Vec<String>,

    /// Width of the chart containers in pixels, the height follows at 16:9.
    #[clap(long, env = "CHART_WIDTH", default_value = "800")]
    pub chart_width: u32,

    /// Write the chart documents into this directory.
    #[clap(long, env = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refresh the dashboard once and print it.
    #[clap(name = "show")]
    Show,

    /// Keep refreshing the dashboard until interrupted.
    #[clap(name = "watch")]
    Watch(WatchArgs),
}

#[derive(Copy, Clone, Parser)]
pub struct WatchArgs {
    #[clap(long, env = "REFRESH_INTERVAL", default_value = "5min")]
    pub interval: humantime::Duration,
}
