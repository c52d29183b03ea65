//! CLI entry point for the COVID-NET mapper tool.
//!
//! Provides subcommands for building the jurisdiction heat-map view,
//! monthly trend series, per-state summaries, filtered record listings,
//! and filter options, from a local `rows.json` file or an HTTP source.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covidnet_mapper::engine::heatmap::build_jurisdiction_view;
use covidnet_mapper::engine::trends::{recent_window, to_series, trends_over_time};
use covidnet_mapper::fetch::{AppToken, BasicClient, fetch_bytes};
use covidnet_mapper::model::HospRecord;
use covidnet_mapper::output::{append_records, print_json};
use covidnet_mapper::parser::parse_records;
use covidnet_mapper::query::{
    RecordFilter, SortBy, SortOrder, filter_options, paginate, sort_records, state_summary,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covidnet_mapper")]
#[command(about = "Aggregate and classify COVID-NET hospitalization data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the classified per-jurisdiction heat map view
    Heatmap {
        /// Path to a rows.json file or URL to fetch (falls back to COVID_DATA_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Monthly trend buckets and chart-ready series
    Trends {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Only include records for this state
        #[arg(long)]
        state: Option<String>,

        /// Only include records for this age category
        #[arg(long)]
        age_category: Option<String>,

        /// Only include records for this sex
        #[arg(long)]
        sex: Option<String>,

        /// Only include records for this race/ethnicity
        #[arg(long)]
        race: Option<String>,

        /// Keep only the most recent N months
        #[arg(short = 'w', long)]
        window: Option<usize>,
    },
    /// Summary statistics for a single state
    Summary {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// State to summarize (case-insensitive)
        #[arg(short, long)]
        state: String,
    },
    /// Filtered, sorted, paginated record listing
    Records {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        age_category: Option<String>,
        #[arg(long)]
        sex: Option<String>,
        #[arg(long)]
        race: Option<String>,
        #[arg(long)]
        min_rate: Option<f64>,
        #[arg(long)]
        max_rate: Option<f64>,
        /// Inclusive start of the date range (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<chrono::NaiveDate>,
        /// Inclusive end of the date range (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<chrono::NaiveDate>,

        #[arg(long, value_enum, default_value_t = SortBy::Date)]
        sort_by: SortBy,
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        sort_order: SortOrder,

        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 50)]
        per_page: usize,

        /// CSV file to append the page's records to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Distinct values available for each filter
    FilterOptions {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
}

/// Trend output: the bucketed points plus their chart series.
#[derive(Serialize)]
struct TrendReport {
    trends: Vec<covidnet_mapper::engine::trends::TrendPoint>,
    series: Vec<covidnet_mapper::engine::trends::SeriesPoint>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covidnet_mapper.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covidnet_mapper.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Heatmap { source } => {
            let records = load_records(&resolve_source(source)?).await?;
            let view = build_jurisdiction_view(&records);

            let covered = view.iter().filter(|e| e.has_data).count();
            info!(
                entries = view.len(),
                covered, "Jurisdiction view built"
            );
            print_json(&view)?;
        }
        Commands::Trends {
            source,
            state,
            age_category,
            sex,
            race,
            window,
        } => {
            let records = load_records(&resolve_source(source)?).await?;
            let filter = RecordFilter {
                state,
                age_category,
                sex,
                race,
                ..RecordFilter::default()
            };
            let matched = filter.apply(&records);
            let mut trends = trends_over_time(&matched);
            if let Some(n) = window {
                trends = recent_window(&trends, n).to_vec();
            }
            let series = to_series(&trends);

            info!(buckets = trends.len(), "Trends computed");
            print_json(&TrendReport { trends, series })?;
        }
        Commands::Summary { source, state } => {
            let records = load_records(&resolve_source(source)?).await?;
            let summary = state_summary(&records, &state)
                .with_context(|| format!("no records found for state {state:?}"))?;

            print_json(&summary)?;
        }
        Commands::Records {
            source,
            state,
            season,
            age_category,
            sex,
            race,
            min_rate,
            max_rate,
            start_date,
            end_date,
            sort_by,
            sort_order,
            page,
            per_page,
            output,
        } => {
            let records = load_records(&resolve_source(source)?).await?;
            let filter = RecordFilter {
                state,
                season,
                age_category,
                sex,
                race,
                min_rate,
                max_rate,
                start_date,
                end_date,
            };

            let mut matched = filter.apply(&records);
            sort_records(&mut matched, sort_by, sort_order);
            let page = paginate(matched, page, per_page);

            if let Some(path) = output {
                append_records(&path, &page.data)?;
                info!(path, rows = page.data.len(), "Page appended to CSV");
            }
            print_json(&page)?;
        }
        Commands::FilterOptions { source } => {
            let records = load_records(&resolve_source(source)?).await?;
            print_json(&filter_options(&records))?;
        }
    }

    Ok(())
}

/// Resolves the dataset source from the CLI argument or `COVID_DATA_SOURCE`.
fn resolve_source(arg: Option<String>) -> Result<String> {
    arg.or_else(|| std::env::var("COVID_DATA_SOURCE").ok())
        .context("no source given and COVID_DATA_SOURCE is not set")
}

/// Loads dataset records from a local file path or fetches them over HTTP.
/// HTTP fetches attach the Socrata app token when `SOCRATA_APP_TOKEN` is set.
#[tracing::instrument(fields(source = %source))]
async fn load_records(source: &str) -> Result<Vec<HospRecord>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        match std::env::var("SOCRATA_APP_TOKEN") {
            Ok(token) => fetch_bytes(&AppToken::new(client, token), source).await?,
            Err(_) => fetch_bytes(&client, source).await?,
        }
    } else {
        std::fs::read(source)?
    };

    let records = parse_records(&bytes)?;
    info!(record_count = records.len(), "Dataset loaded");
    Ok(records)
}
