mod analyze;
mod auth;
mod heatmap;
mod price;
mod stocks;
pub mod watch;

use std::time::Instant;

use serde_json::Value;
use stockpulse_core::{
    Envelope, EnvelopeError, EnvelopeMeta, RetryConfig, StockApiClient, StockApiConfig,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub fn api_client(cli: &Cli) -> StockApiClient {
    let mut config = StockApiConfig::default()
        .with_base_url(cli.base_url.clone())
        .with_timeout_ms(cli.timeout_ms)
        .with_retry(RetryConfig {
            max_retries: cli.retries,
            ..RetryConfig::default()
        });
    if let Some(token) = &cli.token {
        config = config.with_access_token(token.clone());
    }
    StockApiClient::new(config)
}

/// Run a one-shot command and wrap its result in an envelope.
///
/// `watch` streams its own envelopes and is dispatched by `main`.
pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let client = api_client(cli);

    let result = match &cli.command {
        Command::Stocks => stocks::run(&client).await?,
        Command::Price(args) => price::run(args, &client).await?,
        Command::Heatmap(args) => heatmap::run(args, &client).await?,
        Command::Analyze(args) => analyze::run(args)?,
        Command::Register(args) => auth::register(args, &client).await?,
        Command::Auth(args) => auth::authenticate(args, &client).await?,
        Command::Watch(_) => {
            return Err(CliError::Command(String::from(
                "watch streams its own output and cannot be enveloped",
            )))
        }
    };

    envelope(result, elapsed_ms(started))
}

pub fn envelope(result: CommandResult, latency_ms: u64) -> Result<Envelope<Value>, CliError> {
    let CommandResult {
        data,
        warnings,
        errors,
    } = result;

    let mut meta = EnvelopeMeta::generate(latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

pub fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
