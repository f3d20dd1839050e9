use serde::Serialize;
use stockpulse_core::{CorrelationMatrix, EnvelopeError, StockApiClient};

use crate::cli::HeatmapArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct HeatmapResponseData {
    minutes: u32,
    #[serde(flatten)]
    matrix: CorrelationMatrix,
}

pub async fn run(args: &HeatmapArgs, client: &StockApiClient) -> Result<CommandResult, CliError> {
    let basket = client
        .fetch_basket(&args.tickers, Some(args.minutes))
        .await;

    if basket.series.is_empty() && !basket.failures.is_empty() {
        return Err(CliError::Command(format!(
            "could not load data for any of {} requested tickers",
            basket.failures.len()
        )));
    }

    let errors = basket
        .failures
        .iter()
        .map(|(ticker, error)| EnvelopeError::from_api(Some(ticker.clone()), error))
        .collect::<Vec<_>>();

    let thin = basket
        .series
        .iter()
        .filter(|(_, samples)| samples.len() < 2)
        .map(|(ticker, _)| ticker.to_string())
        .collect::<Vec<_>>();

    let matrix = CorrelationMatrix::build(&basket.series);
    let data = serde_json::to_value(HeatmapResponseData {
        minutes: args.minutes.as_minutes(),
        matrix,
    })?;

    let mut result = CommandResult::ok(data).with_errors(errors);
    if !thin.is_empty() {
        result = result.with_warning(format!(
            "fewer than two samples for {}; their correlations are reported as 0",
            thin.join(", ")
        ));
    }
    Ok(result)
}
