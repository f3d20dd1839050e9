use serde_json::Value;
use stockpulse_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("schema      : {}", envelope.meta.schema_version);
    println!("generated_at: {}", envelope.meta.generated_at);
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    match correlation_grid(&envelope.data) {
        Some(grid) => {
            println!("correlation:");
            for line in grid.lines() {
                println!("  {line}");
            }
        }
        None => {
            println!("data:");
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                println!("  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            match &error.ticker {
                Some(ticker) => println!("  - {} [{ticker}]: {}", error.code, error.message),
                None => println!("  - {}: {}", error.code, error.message),
            }
        }
    }

    Ok(())
}

/// Lay out heatmap data as a labelled grid, followed by per-ticker stats.
/// Returns `None` when `data` is not a correlation matrix.
fn correlation_grid(data: &Value) -> Option<String> {
    let tickers = data
        .get("tickers")?
        .as_array()?
        .iter()
        .map(|ticker| ticker.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()?;
    let rows = data.get("values")?.as_array()?;
    if rows.len() != tickers.len() {
        return None;
    }

    let width = tickers
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("{:width$}", "");
    for ticker in &tickers {
        out.push_str(&format!(" {ticker:>width$}"));
    }
    out.push('\n');

    for (ticker, row) in tickers.iter().zip(rows) {
        out.push_str(&format!("{ticker:width$}"));
        for cell in row.as_array()? {
            out.push_str(&format!(" {:>width$.2}", cell.as_f64()?));
        }
        out.push('\n');
    }

    if let Some(stats) = data.get("stats").and_then(Value::as_object) {
        out.push('\n');
        for ticker in &tickers {
            let Some(entry) = stats.get(ticker) else {
                continue;
            };
            let average = entry.get("average").and_then(Value::as_f64).unwrap_or(0.0);
            let std_dev = entry.get("std_dev").and_then(Value::as_f64).unwrap_or(0.0);
            let samples = entry.get("samples").and_then(Value::as_u64).unwrap_or(0);
            out.push_str(&format!(
                "{ticker:width$} avg {average:.2}  std_dev {std_dev:.2}  samples {samples}\n"
            ));
        }
    }

    Some(out)
}
