use serde::Serialize;
use stockpulse_core::{PriceChart, PricePayload, PriceSummary, StockApiClient, Ticker};

use crate::cli::PriceArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct PriceResponseData {
    ticker: Ticker,
    minutes: u32,
    shape: &'static str,
    summary: Option<PriceSummary>,
    chart: PriceChart,
}

pub async fn run(args: &PriceArgs, client: &StockApiClient) -> Result<CommandResult, CliError> {
    let payload = client
        .stock_prices(&args.ticker, Some(args.minutes))
        .await?;
    let shape = payload_shape(&payload);
    let samples = payload.into_samples();

    let summary = PriceSummary::from_samples(&samples);
    let chart = PriceChart::from_samples(&samples);
    let data = serde_json::to_value(PriceResponseData {
        ticker: args.ticker.clone(),
        minutes: args.minutes.as_minutes(),
        shape,
        summary,
        chart,
    })?;

    let mut result = CommandResult::ok(data);
    if samples.is_empty() {
        result = result.with_warning(format!(
            "no price data for {} in the last {}",
            args.ticker, args.minutes
        ));
    }
    Ok(result)
}

pub fn payload_shape(payload: &PricePayload) -> &'static str {
    match payload {
        PricePayload::Series(_) => "series",
        PricePayload::Single(_) => "single",
        PricePayload::Empty => "empty",
    }
}
