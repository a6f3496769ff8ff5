mod api;
mod chart;
mod cli;
mod config;
mod core;
mod dashboard;
mod i18n;
mod prelude;
mod render;
mod tables;

use std::time::Duration;

use chrono::Local;
use clap::{Parser, crate_version};
use tokio::{
    signal::ctrl_c,
    time::{MissedTickBehavior, interval},
};

use crate::{
    cli::{Args, Command},
    config::Config,
    dashboard::Dashboard,
    prelude::*,
    render::write_charts,
    tables::{build_badges_table, build_charts_table},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let config = Config::read_from(&args.config)?;
    let mut dashboard = Dashboard::start(config, args.languages.as_slice()).await?;

    match args.command {
        Command::Show => {
            refresh(&mut dashboard, &args).await?;
        }
        Command::Watch(watch) => {
            let period: Duration = watch.interval.into();
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => refresh(&mut dashboard, &args).await?,
                    result = ctrl_c() => {
                        result.context("failed to listen for the interrupt")?;
                        break;
                    }
                }
            }
        }
    }

    info!("done!");
    Ok(())
}

async fn refresh(dashboard: &mut Dashboard, args: &Args) -> Result {
    dashboard.refresh(Local::now()).await;

    let context = dashboard.context();
    println!("{}", context.title);
    println!("{}", build_badges_table(dashboard.badges(), &context.translator));
    println!("{}", build_charts_table(dashboard.charts(), &context.translator));

    if let Some(output_dir) = &args.output_dir {
        write_charts(output_dir, dashboard.charts(), args.chart_width)?;
    }
    Ok(())
}
