//! CLI argument definitions for stockpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stocks` | List stocks offered by the price feed |
//! | `price` | Price summary and chart series for one ticker |
//! | `heatmap` | Correlation matrix for a basket of tickers |
//! | `analyze` | Offline statistics over saved price payloads |
//! | `register` | Register with the price feed for client credentials |
//! | `auth` | Exchange client credentials for an access token |
//! | `watch` | Poll tickers and print statistics every period |
//!
//! # Global Options
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--base-url` | `STOCKPULSE_BASE_URL` | feed evaluation service |
//! | `--token` | `STOCKPULSE_TOKEN` | none |
//! | `--timeout-ms` | | `30000` |
//! | `--retries` | | `2` |
//! | `--format` | | `json` |
//! | `--pretty` | | `false` |
//!
//! # Examples
//!
//! ```bash
//! stockpulse price NVDA --minutes 30 --pretty
//! stockpulse heatmap AAPL MSFT GOOGL AMZN --format table
//! stockpulse analyze saved/nvda.json --compare saved/amd.json
//! stockpulse watch AAPL MSFT --interval-secs 60
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockpulse_core::{Ticker, TimeFrame, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

/// Stock price statistics and correlation heatmaps from the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stockpulse",
    author,
    version,
    about = "Stock price statistics and correlation heatmaps"
)]
pub struct Cli {
    /// Base URL of the price feed API.
    #[arg(long, global = true, env = "STOCKPULSE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Bearer token sent with every request.
    #[arg(long, global = true, env = "STOCKPULSE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Retries for transient failures (5xx, 429, timeouts).
    #[arg(long, global = true, default_value_t = 2)]
    pub retries: u32,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Table,
    /// Single JSON envelope.
    Json,
}

/// How two price series are paired before correlating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Alignment {
    /// Pair by position, truncating to the shorter series.
    Index,
    /// Pair samples observed at the same instant.
    Timestamp,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stocks offered by the price feed.
    Stocks,

    /// Price summary and chart series for one ticker.
    ///
    ///   stockpulse price NVDA
    ///   stockpulse price AAPL --minutes 15
    Price(PriceArgs),

    /// Correlation matrix across a basket of tickers.
    ///
    ///   stockpulse heatmap AAPL MSFT GOOGL AMZN
    Heatmap(HeatmapArgs),

    /// Statistics over price payloads saved as JSON files.
    ///
    ///   stockpulse analyze nvda.json
    ///   stockpulse analyze nvda.json --compare amd.json --align timestamp
    Analyze(AnalyzeArgs),

    /// Register with the price feed to obtain client credentials.
    Register(RegisterArgs),

    /// Exchange client credentials for an access token.
    Auth(AuthArgs),

    /// Poll tickers on a fixed period and print one JSON line per refresh.
    ///
    ///   stockpulse watch NVDA
    ///   stockpulse watch AAPL MSFT --interval-secs 60 --ticks 10
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    pub ticker: Ticker,

    /// History window in minutes (5-60).
    #[arg(long, default_value_t = TimeFrame::default())]
    pub minutes: TimeFrame,
}

#[derive(Debug, Args)]
pub struct HeatmapArgs {
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<Ticker>,

    /// History window in minutes (5-60).
    #[arg(long, default_value_t = TimeFrame::default())]
    pub minutes: TimeFrame,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JSON file holding a price payload (series or `{"stock": ...}`).
    pub file: PathBuf,

    /// Second payload to correlate against.
    #[arg(long)]
    pub compare: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Alignment::Index)]
    pub align: Alignment,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub company_name: String,
    #[arg(long)]
    pub owner_name: String,
    #[arg(long)]
    pub roll_no: String,
    #[arg(long)]
    pub owner_email: String,
    #[arg(long, env = "STOCKPULSE_ACCESS_CODE", hide_env_values = true)]
    pub access_code: String,
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[arg(long, env = "STOCKPULSE_CLIENT_ID")]
    pub client_id: String,
    #[arg(long, env = "STOCKPULSE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
    #[arg(long, default_value = "")]
    pub company_name: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<Ticker>,

    /// History window in minutes (5-60).
    #[arg(long, default_value_t = TimeFrame::default())]
    pub minutes: TimeFrame,

    /// Refresh period in seconds (at least 1); defaults to 30s for one
    /// ticker and 60s for a basket.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: Option<u64>,

    /// Stop after this many refreshes instead of waiting for Ctrl-C.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ticks: Option<u64>,
}
