use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use telemetry_gen::db::{self, PostgresSink, PostgresSource};
use telemetry_gen::flush::JsonlSink;
use telemetry_gen::{
    Error, GeneratorConfig, Result, ReturningUser, RunOutcome, run_backfill, run_daily,
};

/// Synthetic gameplay telemetry generator.
#[derive(Parser)]
#[command(name = "telemetry-gen", version, about)]
struct Cli {
    /// JSON file with generator parameters; unset keys use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured RNG seed.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write partitions as JSONL files into this directory.
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Write partitions to Postgres. Ignored when --out-dir is given.
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a fixed population over the configured horizon.
    Backfill {
        /// First simulated day (default: today minus days_back).
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// Simulate one day of returning players plus new installs.
    Daily {
        /// Day to simulate (default: yesterday).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "telemetry_gen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(RunOutcome::Written { partitions, events }) => {
            info!(partitions, events, "done");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::NoEvents) => {
            info!("no events generated");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate()?;

    let today = Local::now().date_naive();

    if let Some(dir) = &cli.out_dir {
        let mut sink = JsonlSink::new(dir);
        return match cli.command {
            Command::Backfill { start_date } => {
                let start = start_date.unwrap_or(backfill_start(today, &config));
                run_backfill(&config, start, &mut sink).await
            }
            // Without a warehouse there is no one to bring back.
            Command::Daily { date } => {
                let date = date.unwrap_or(today - Duration::days(1));
                run_daily(&config, date, &Vec::<ReturningUser>::new(), &mut sink).await
            }
        };
    }

    let Some(url) = &cli.database_url else {
        return Err(Error::Config(
            "no output target: pass --out-dir or --database-url".to_string(),
        ));
    };
    let pool = db::connect(url).await?;
    db::migrate(&pool).await?;
    let mut sink = PostgresSink::new(pool.clone());

    match cli.command {
        Command::Backfill { start_date } => {
            let start = start_date.unwrap_or(backfill_start(today, &config));
            run_backfill(&config, start, &mut sink).await
        }
        Command::Daily { date } => {
            let date = date.unwrap_or(today - Duration::days(1));
            run_daily(&config, date, &PostgresSource::new(pool), &mut sink).await
        }
    }
}

fn backfill_start(today: NaiveDate, config: &GeneratorConfig) -> NaiveDate {
    today - Duration::days(i64::from(config.days_back))
}
