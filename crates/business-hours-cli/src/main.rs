use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use business_hours_core::Timespan;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "business-hours",
    about = "List the dates in a range and the business hours of each date"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every date in the range, one per line
    Dates {
        #[command(flatten)]
        timespan: TimespanArgs,
    },

    /// Print the business hours of each date as epoch seconds
    Hours {
        #[command(flatten)]
        timespan: TimespanArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct TimespanArgs {
    /// JSON file holding a timespan; overrides the other flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// First date of the range (YYYY-MM-DD)
    #[arg(long, default_value = "2020-07-10")]
    start: String,

    /// Last date of the range (YYYY-MM-DD)
    #[arg(long, default_value = "2020-07-14")]
    end: String,

    /// Daily opening time (HH:MM:SS)
    #[arg(long, default_value = "08:00:00")]
    day_start: String,

    /// Daily closing time (HH:MM:SS)
    #[arg(long, default_value = "22:00:00")]
    day_end: String,

    /// IANA timezone identifier
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Debug,
    Json,
}

impl TimespanArgs {
    fn resolve(&self) -> Result<Timespan> {
        match &self.config {
            Some(path) => load_timespan(path),
            None => Ok(Timespan {
                start_date: self.start.clone(),
                end_date: self.end.clone(),
                day_start_hour: self.day_start.clone(),
                day_end_hour: self.day_end.clone(),
                timezone: self.timezone.clone(),
            }),
        }
    }
}

fn load_timespan(path: &Path) -> Result<Timespan> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse timespan from {}", path.display()))
}

fn cmd_dates(timespan: &Timespan) -> Result<()> {
    let dates = timespan
        .dates_in_between()
        .context("failed to enumerate dates")?;
    info!("{} date(s) in range", dates.len());
    for date in &dates {
        println!("{date}");
    }
    Ok(())
}

fn cmd_hours(timespan: &Timespan, format: OutputFormat) -> Result<()> {
    let hours = timespan
        .business_hours_of_each_date()
        .context("failed to compute business hours")?;
    info!("{} business-hours window(s)", hours.len());
    match format {
        OutputFormat::Debug => println!("{hours:?}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hours)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Dates { timespan } => {
            let timespan = timespan.resolve()?;
            info!(
                "{} to {} in {}",
                timespan.start_date, timespan.end_date, timespan.timezone
            );
            cmd_dates(&timespan)?;
        }
        Commands::Hours { timespan, format } => {
            let timespan = timespan.resolve()?;
            info!(
                "{} to {}, {}-{} in {}",
                timespan.start_date,
                timespan.end_date,
                timespan.day_start_hour,
                timespan.day_end_hour,
                timespan.timezone
            );
            cmd_hours(&timespan, *format)?;
        }
    }

    Ok(())
}
