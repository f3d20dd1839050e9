use std::time::{Duration, Instant};

use serde_json::Value;
use stockpulse_core::{
    Envelope, Poller, StockApiClient, Ticker, TimeFrame, BASKET_REFRESH, PRICE_REFRESH,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{Cli, HeatmapArgs, PriceArgs, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{api_client, elapsed_ms, envelope, heatmap, price, CommandResult};

/// Poll until interrupted or until `--ticks` refreshes have been printed.
pub async fn run(cli: &Cli, args: &WatchArgs) -> Result<(), CliError> {
    let client = api_client(cli);
    let period = refresh_period(args);
    let limit = args.ticks;

    let (tx, mut rx) = mpsc::channel::<Result<Envelope<Value>, CliError>>(4);
    let tickers = args.tickers.clone();
    let time_frame = args.minutes;

    let handle = Poller::every(period).spawn(move |tick| {
        let client = client.clone();
        let tickers = tickers.clone();
        let tx = tx.clone();
        async move {
            let started = Instant::now();
            let outcome = refresh(&client, &tickers, time_frame)
                .await
                .and_then(|result| envelope(result, elapsed_ms(started)));
            debug!(tick, ok = outcome.is_ok(), "refresh complete");
            let _ = tx.send(outcome).await;
        }
    });
    info!(?period, tickers = args.tickers.len(), "watching prices");

    let mut delivered = 0_u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            received = rx.recv() => {
                let Some(outcome) = received else {
                    break;
                };
                match outcome {
                    Ok(envelope) => output::render(&envelope, cli.format, cli.pretty)?,
                    Err(error) => warn!(%error, "refresh failed"),
                }
                delivered += 1;
                if limit.is_some_and(|limit| delivered >= limit) {
                    break;
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn refresh_period(args: &WatchArgs) -> Duration {
    match args.interval_secs {
        Some(secs) => Duration::from_secs(secs),
        None if args.tickers.len() == 1 => PRICE_REFRESH,
        None => BASKET_REFRESH,
    }
}

async fn refresh(
    client: &StockApiClient,
    tickers: &[Ticker],
    minutes: TimeFrame,
) -> Result<CommandResult, CliError> {
    match tickers {
        [ticker] => {
            let args = PriceArgs {
                ticker: ticker.clone(),
                minutes,
            };
            price::run(&args, client).await
        }
        _ => {
            let args = HeatmapArgs {
                tickers: tickers.to_vec(),
                minutes,
            };
            heatmap::run(&args, client).await
        }
    }
}
