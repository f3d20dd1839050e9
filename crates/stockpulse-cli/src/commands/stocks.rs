use std::collections::BTreeMap;

use serde::Serialize;
use stockpulse_core::{StockApiClient, Ticker};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StocksResponseData {
    count: usize,
    stocks: BTreeMap<String, Ticker>,
}

pub async fn run(client: &StockApiClient) -> Result<CommandResult, CliError> {
    let stocks = client.list_stocks().await?;
    let data = serde_json::to_value(StocksResponseData {
        count: stocks.len(),
        stocks,
    })?;
    Ok(CommandResult::ok(data))
}
