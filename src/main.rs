use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use tripcast::config::LoggingConfig;
use tripcast::presenter::ConsolePresenter;
use tripcast::{
    PlaceQuery, PresenterQueue, RouteWeatherOrchestrator, TripCastConfig, TripCastError, TripPlan,
};

/// Driving route planner with current weather at both ends
#[derive(Debug, Parser)]
#[command(name = "tripcast", version)]
struct Cli {
    /// Start place name
    #[arg(long)]
    from: Option<String>,
    /// Destination place name
    #[arg(long)]
    to: Option<String>,
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripcast={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_plan(plan: &TripPlan) {
    println!("✅ {} → {}", plan.start, plan.end);
    if let Some(e) = &plan.route_error {
        println!("   route: {e}");
    }
    if let Some(e) = &plan.weather_error {
        println!("   weather: {e}");
    }
}

fn report(outcome: tripcast::Result<TripPlan>) -> bool {
    match outcome {
        Ok(plan) => {
            print_plan(&plan);
            true
        }
        Err(TripCastError::Superseded { generation }) => {
            tracing::debug!("Search {} superseded", generation);
            true
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            false
        }
    }
}

/// Each `start ; end` line on stdin starts a new search, replacing the last
async fn interactive(orchestrator: Arc<RouteWeatherOrchestrator>) -> Result<bool> {
    println!("Enter searches as: <start> ; <destination>");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last: Option<JoinHandle<bool>> = None;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (start, end) = line.split_once(';').unwrap_or((line.as_str(), ""));
        let (start, end) = (PlaceQuery::from(start.trim()), PlaceQuery::from(end.trim()));

        let orchestrator = orchestrator.clone();
        last = Some(tokio::spawn(async move {
            report(orchestrator.plan(start, end).await)
        }));
    }

    match last {
        Some(task) => task.await.context("Search task failed"),
        None => Ok(true),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = TripCastConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose);

    let presenter = PresenterQueue::spawn(ConsolePresenter);
    let orchestrator = Arc::new(RouteWeatherOrchestrator::from_config(
        &config,
        presenter.clone(),
    )?);

    let success = match (cli.from, cli.to) {
        (Some(from), Some(to)) => report(orchestrator.plan(from.into(), to.into()).await),
        _ => interactive(orchestrator).await?,
    };

    presenter.flush().await;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
