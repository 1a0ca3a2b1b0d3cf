use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use health_core::entry::DATE_FORMAT;
use health_core::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Weight readings used by the demo, oldest first, ending today
const DEMO_WEIGHTS: [f64; 7] = [70.0, 71.0, 70.5, 69.0, 68.5, 69.2, 70.0];

#[derive(Parser)]
#[command(name = "health-tracker")]
#[command(about = "Record daily health metrics and summarize them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a week of sample weights, print statistics and export them (default)
    Demo {
        /// Export destination (defaults to the configured path)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Moving average of a metric from an exported CSV file
    Average {
        /// CSV file written by a previous export
        #[arg(long)]
        input: PathBuf,

        /// Metric to average (defaults to the configured metric)
        #[arg(long)]
        metric: Option<String>,

        /// Number of readings per average (defaults to the configured window)
        #[arg(long)]
        window: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Seven-day summary of a metric from an exported CSV file
    Summary {
        /// CSV file written by a previous export
        #[arg(long)]
        input: PathBuf,

        /// Metric to summarize (defaults to the configured metric)
        #[arg(long)]
        metric: Option<String>,

        /// Last day of the window, YYYY-MM-DD (defaults to the latest recorded date)
        #[arg(long)]
        end_date: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    health_core::logging::init();

    let cli = Cli::parse();

    // A bare run only honors an explicitly passed config file
    let config = match (&cli.command, &cli.config) {
        (_, Some(path)) => Config::load_from(path)?,
        (None, None) => Config::default(),
        (Some(_), None) => Config::load()?,
    };
    tracing::debug!(
        "Using export path {:?}, metric {:?}, window {}",
        config.export.path,
        config.analysis.metric,
        config.analysis.window
    );

    match cli.command {
        Some(Commands::Demo { output }) => {
            cmd_demo(&output.unwrap_or_else(|| config.export.path.clone()))
        }
        Some(Commands::Average {
            input,
            metric,
            window,
            json,
        }) => cmd_average(
            &input,
            metric.as_deref().unwrap_or(&config.analysis.metric),
            window.unwrap_or(config.analysis.window),
            json,
        ),
        Some(Commands::Summary {
            input,
            metric,
            end_date,
            json,
        }) => cmd_summary(
            &input,
            metric.as_deref().unwrap_or(&config.analysis.metric),
            end_date.as_deref(),
            json,
        ),
        None => {
            // Default to "demo" command
            cmd_demo(&config.export.path)
        }
    }
}

fn cmd_demo(output: &Path) -> Result<()> {
    let mut sample = Vec::new();
    println!("Health Tracker — demo");

    let today = Local::now().date_naive();
    for (weight, date) in demo_entries(today) {
        add_entry(&mut sample, &date, "weight", weight)?;
    }
    println!("Created {} sample entries (weight).", sample.len());

    let window = DEFAULT_WINDOW;
    let averages = moving_average(&sample, "weight", window)?;
    print_averages(&averages, window);

    let summary = summarize_week(&sample, "weight", None)?;
    println!("7-day summary:");
    print_summary(&summary);

    export_csv(&sample, output)?;
    println!("Exported entries to {}", output.display());

    Ok(())
}

fn cmd_average(input: &Path, metric: &str, window: usize, json: bool) -> Result<()> {
    let entries = load_csv(input)?;
    let averages = moving_average(&entries, metric, window)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&averages)?);
    } else {
        print_averages(&averages, window);
    }
    Ok(())
}

fn cmd_summary(input: &Path, metric: &str, end_date: Option<&str>, json: bool) -> Result<()> {
    let entries = load_csv(input)?;
    let summary = summarize_week(&entries, metric, end_date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("7-day summary:");
        print_summary(&summary);
    }
    Ok(())
}

/// Seven consecutive (value, date) pairs ending on `today`
fn demo_entries(today: NaiveDate) -> Vec<(f64, String)> {
    let last = DEMO_WEIGHTS.len() as i64 - 1;
    DEMO_WEIGHTS
        .iter()
        .enumerate()
        .map(|(i, weight)| {
            let date = today - Duration::days(last - i as i64);
            (*weight, date.format(DATE_FORMAT).to_string())
        })
        .collect()
}

fn print_averages(averages: &BTreeMap<NaiveDate, f64>, window: usize) {
    println!("Moving averages (window={}):", window);
    for (date, avg) in averages {
        println!("  {}: {:.2}", date, avg);
    }
}

fn print_summary(summary: &WeekSummary) {
    println!("  count: {}", summary.count);
    if let (Some(min), Some(max), Some(mean)) = (summary.min, summary.max, summary.mean) {
        println!("  min: {:?}", min);
        println!("  max: {:?}", max);
        println!("  mean: {:?}", mean);
    }

    println!("  values: {:?}", summary.values);
}
