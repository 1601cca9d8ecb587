use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analytics::{AggregateResult, GroupAggregator, RankedRecord, WindowRanker};
use anyhow::Context;
use api_client::{WeatherApi, WeatherClient};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::{Column, Record};
use generator::Generator;
use indicatif::{ProgressBar, ProgressStyle};
use pivot::{PivotBuilder, PivotTable};
use record_store::{RawRecord, RecordStore};
use tracing_subscriber::EnvFilter;

const CSV_HEADER: [&str; 6] = ["Sensor_ID", "Date", "Location", "Parameter", "Value", "Status"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const PREVIEW_ROWS: usize = 5;

/// The main entry point for the strata data pipeline.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (the weather API key) from .env, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Generate(args) => handle_generate(args, config),
        Commands::Fetch(args) => handle_fetch(args, config).await,
        Commands::Report(args) => handle_report(args, config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sensor/weather data pipeline: generate or fetch raw readings, then
/// derive grouped statistics, per-sensor ranks and a pivoted daily view.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (parameter domain, generator, weather).
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic sensor-readings CSV.
    Generate(GenerateArgs),
    /// Poll the weather API and write the flattened readings to CSV.
    Fetch(FetchArgs),
    /// Ingest a readings CSV and produce aggregate, rank and pivot views.
    Report(ReportArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Number of rows to generate (defaults to the configured count).
    #[arg(long)]
    rows: Option<usize>,

    /// Output CSV path (defaults to <raw_dir>/sensor_data.csv).
    #[arg(long)]
    out: Option<PathBuf>,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct FetchArgs {
    /// Number of polling rounds (defaults to the configured count).
    #[arg(long)]
    rounds: Option<u32>,

    /// Output CSV path (defaults to <raw_dir>/weather_data.csv).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
struct ReportArgs {
    /// The readings CSV to ingest.
    #[arg(long)]
    input: PathBuf,

    /// Directory for the Parquet outputs (defaults to the configured
    /// processed_dir).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

// ==============================================================================
// Generate Command Logic
// ==============================================================================

fn handle_generate(args: GenerateArgs, config: Config) -> anyhow::Result<()> {
    let rows = args.rows.unwrap_or(config.generator.rows);
    let out = args
        .out
        .unwrap_or_else(|| config.output.raw_dir.join("sensor_data.csv"));

    let parameters: Vec<_> = config
        .domain
        .parameters
        .iter()
        .map(|(name, range)| (name.clone(), *range))
        .collect();

    let mut generator = match args.seed {
        Some(seed) => Generator::with_seed(seed, config.generator, parameters),
        None => Generator::new(config.generator, parameters),
    };

    tracing::info!(rows, out = %out.display(), "generating synthetic sensor data");
    let records = generator.generate(rows);
    write_records_csv(&out, &records)?;
    println!("{} rows generated -> {}", records.len(), out.display());
    Ok(())
}

// ==============================================================================
// Fetch Command Logic
// ==============================================================================

async fn handle_fetch(args: FetchArgs, config: Config) -> anyhow::Result<()> {
    let rounds = args.rounds.unwrap_or(config.weather.poll_rounds);
    let out = args
        .out
        .unwrap_or_else(|| config.output.raw_dir.join("weather_data.csv"));

    let api_key = std::env::var("OWM_API_KEY")
        .context("OWM_API_KEY must be set (e.g. in .env) to poll the weather API")?;
    let client = WeatherClient::new(&config.weather, api_key);

    let progress = ProgressBar::new(rounds as u64 * config.weather.cities.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let mut records = Vec::new();
    for round in 0..rounds {
        for city in &config.weather.cities {
            progress.set_message(format!("Fetching {city}..."));
            match client.fetch_current(city).await {
                Ok(mut flattened) => records.append(&mut flattened),
                // One bad city must not abort the run; note it and move on.
                Err(e) => tracing::warn!(city = %city, error = %e, "skipping failed fetch"),
            }
            progress.inc(1);
        }
        if round + 1 < rounds {
            tokio::time::sleep(Duration::from_secs(config.weather.poll_interval_secs)).await;
        }
    }
    progress.finish_with_message("Done");

    write_records_csv(&out, &records)?;
    println!("{} readings fetched -> {}", records.len(), out.display());
    Ok(())
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, config: Config) -> anyhow::Result<()> {
    let out_dir = args.out_dir.unwrap_or(config.output.processed_dir);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let domain = config.domain.to_domain();
    let raw_rows = read_raw_records(&args.input)?;
    let store = RecordStore::load(raw_rows, &domain, config.domain.policy)?;

    // Per-(parameter, status) summary statistics.
    let group_by = [Column::Parameter, Column::Status];
    let aggregates = GroupAggregator::new().aggregate(&store, &group_by, Column::Value)?;
    println!("Aggregate statistics:");
    println!("{}", render_aggregates(&group_by, &aggregates));
    let aggregates_path = out_dir.join("sensor_aggregates.parquet");
    table_writer::write_aggregates(&aggregates_path, &group_by, &aggregates)?;
    tracing::info!(path = %aggregates_path.display(), groups = aggregates.len(), "aggregates written");

    // Sample position of each reading within its sensor's timeline.
    let ranked = WindowRanker::new().rank(&store, Column::Id, Column::Date);
    println!("Ranked sample (first {PREVIEW_ROWS} rows):");
    println!("{}", render_ranked(&ranked));

    // Daily per-location means, one column per parameter.
    let table = PivotBuilder::new().pivot(
        &store,
        &[Column::Date, Column::Location],
        Column::Parameter,
        Column::Value,
    )?;
    println!("Pivoted daily means (first {PREVIEW_ROWS} rows):");
    println!("{}", render_pivot(&table));
    let pivot_path = out_dir.join("sensor_processed.parquet");
    table_writer::write_pivot(&pivot_path, &table)?;
    tracing::info!(path = %pivot_path.display(), rows = table.num_rows(), "pivot table written");

    Ok(())
}

// ==============================================================================
// CSV Glue
// ==============================================================================

fn write_records_csv(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.id.as_str(),
            &record.date.format(DATE_FORMAT).to_string(),
            record.location.as_str(),
            record.parameter.as_str(),
            &format!("{:.2}", record.value),
            record.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a CSV into raw rows by header name; columns missing from the
/// header surface as `None` fields, which the store rejects with a
/// precise schema error instead of this glue guessing.
fn read_raw_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);
    let columns = [
        position(CSV_HEADER[0]),
        position(CSV_HEADER[1]),
        position(CSV_HEADER[2]),
        position(CSV_HEADER[3]),
        position(CSV_HEADER[4]),
        position(CSV_HEADER[5]),
    ];

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let get = |col: Option<usize>| col.and_then(|i| row.get(i)).map(str::to_string);
        rows.push(RawRecord {
            id: get(columns[0]),
            date: get(columns[1]),
            location: get(columns[2]),
            parameter: get(columns[3]),
            value: get(columns[4]),
            status: get(columns[5]),
        });
    }
    Ok(rows)
}

// ==============================================================================
// Terminal Rendering
// ==============================================================================

fn render_aggregates(group_by: &[Column], results: &[AggregateResult]) -> Table {
    let mut table = Table::new();
    let mut header: Vec<String> = group_by.iter().map(|c| c.name().to_string()).collect();
    header.extend(["count_rows".into(), "avg_value".into(), "stddev_value".into()]);
    table.set_header(header);

    for result in results {
        let mut row: Vec<String> = result.key.values().iter().map(|v| v.to_string()).collect();
        row.push(result.count.to_string());
        row.push(format!("{:.4}", result.mean));
        row.push(match result.stddev {
            Some(s) => format!("{s:.4}"),
            None => "null".to_string(),
        });
        table.add_row(row);
    }
    table
}

fn render_ranked(ranked: &[RankedRecord<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(["Sensor_ID", "Date", "Parameter", "Value", "row_num"]);
    for ranked_record in ranked.iter().take(PREVIEW_ROWS) {
        let record = ranked_record.record;
        table.add_row([
            record.id.clone(),
            record.date.format(DATE_FORMAT).to_string(),
            record.parameter.clone(),
            format!("{:.2}", record.value),
            ranked_record.rank.to_string(),
        ]);
    }
    table
}

fn render_pivot(pivot_table: &PivotTable) -> Table {
    let mut table = Table::new();
    table.set_header(pivot_table.column_names());
    for row in pivot_table.rows.iter().take(PREVIEW_ROWS) {
        let mut cells: Vec<String> = row.key.values().iter().map(|v| v.to_string()).collect();
        cells.extend(row.cells.iter().map(|cell| match cell {
            Some(v) => format!("{v:.2}"),
            None => "null".to_string(),
        }));
        table.add_row(cells);
    }
    table
}
