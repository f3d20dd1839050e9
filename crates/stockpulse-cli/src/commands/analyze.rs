use std::path::Path;

use serde::Serialize;
use stockpulse_core::{
    correlation, correlation_by_timestamp, PriceChart, PricePayload, PriceSummary, Sample,
};
use tracing::debug;

use crate::cli::{Alignment, AnalyzeArgs};
use crate::error::CliError;

use super::price::payload_shape;
use super::CommandResult;

#[derive(Debug, Serialize)]
struct AnalyzeResponseData {
    file: String,
    shape: &'static str,
    summary: Option<PriceSummary>,
    chart: PriceChart,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Comparison>,
}

#[derive(Debug, Serialize)]
struct Comparison {
    file: String,
    alignment: &'static str,
    correlation: f64,
    summary: Option<PriceSummary>,
}

pub fn run(args: &AnalyzeArgs) -> Result<CommandResult, CliError> {
    let (shape, samples) = load_payload(&args.file)?;
    let mut warnings = Vec::new();
    if samples.is_empty() {
        warnings.push(format!("{} holds no price samples", args.file.display()));
    }

    let comparison = match &args.compare {
        Some(path) => {
            let (_, other) = load_payload(path)?;
            if other.is_empty() {
                warnings.push(format!("{} holds no price samples", path.display()));
            }
            let (alignment, value) = match args.align {
                Alignment::Index => ("index", correlation(&samples, &other)),
                Alignment::Timestamp => ("timestamp", correlation_by_timestamp(&samples, &other)),
            };
            Some(Comparison {
                file: path.display().to_string(),
                alignment,
                correlation: value,
                summary: PriceSummary::from_samples(&other),
            })
        }
        None => None,
    };

    let data = serde_json::to_value(AnalyzeResponseData {
        file: args.file.display().to_string(),
        shape,
        summary: PriceSummary::from_samples(&samples),
        chart: PriceChart::from_samples(&samples),
        comparison,
    })?;

    let mut result = CommandResult::ok(data);
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}

fn load_payload(path: &Path) -> Result<(&'static str, Vec<Sample>), CliError> {
    let body = std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })?;
    let payload = PricePayload::try_from_json(&body)?;
    let shape = payload_shape(&payload);
    debug!(path = %path.display(), shape, "loaded saved payload");
    Ok((shape, payload.into_samples()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    fn payload_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(body.as_bytes()).expect("write payload");
        file
    }

    fn args(file: PathBuf, compare: Option<PathBuf>, align: Alignment) -> AnalyzeArgs {
        AnalyzeArgs {
            file,
            compare,
            align,
        }
    }

    #[test]
    fn summarizes_saved_series() {
        let file = payload_file(r#"[{"price": 10.0}, {"price": 12.0}, {"price": 11.0}]"#);

        let result = run(&args(file.path().to_path_buf(), None, Alignment::Index))
            .expect("analyze succeeds");

        assert_eq!(result.data["shape"], "series");
        assert_eq!(result.data["summary"]["average"], 11.0);
        assert_eq!(result.data["summary"]["std_dev"], 1.0);
        assert!(result.data.get("comparison").is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn compares_against_second_payload() {
        let first = payload_file(r#"[{"price": 1.0}, {"price": 2.0}, {"price": 3.0}]"#);
        let second = payload_file(r#"[{"price": 3.0}, {"price": 2.0}, {"price": 1.0}]"#);

        let result = run(&args(
            first.path().to_path_buf(),
            Some(second.path().to_path_buf()),
            Alignment::Index,
        ))
        .expect("analyze succeeds");

        let value = result.data["comparison"]["correlation"]
            .as_f64()
            .expect("numeric correlation");
        assert!((value + 1.0).abs() < 1e-9);
        assert_eq!(result.data["comparison"]["alignment"], "index");
    }

    #[test]
    fn single_envelope_yields_one_sample() {
        let file = payload_file(r#"{"stock": {"price": 42.5}}"#);

        let result = run(&args(file.path().to_path_buf(), None, Alignment::Index))
            .expect("analyze succeeds");

        assert_eq!(result.data["shape"], "single");
        assert_eq!(result.data["summary"]["count"], 1);
        assert_eq!(result.data["summary"]["std_dev"], 0.0);
    }

    #[test]
    fn unrecognized_payload_warns() {
        let file = payload_file(r#"{"status": "ok"}"#);

        let result = run(&args(file.path().to_path_buf(), None, Alignment::Index))
            .expect("analyze succeeds");

        assert_eq!(result.data["shape"], "empty");
        assert!(result.data["summary"].is_null());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn missing_file_maps_to_file_error() {
        let error = run(&args(
            PathBuf::from("/nonexistent/stockpulse/payload.json"),
            None,
            Alignment::Index,
        ))
        .err()
        .expect("missing file fails");

        assert!(matches!(error, CliError::File { .. }));
        assert_eq!(error.exit_code(), 10);
    }

    #[test]
    fn malformed_json_is_a_core_error() {
        let file = payload_file("{not json");

        let error = run(&args(file.path().to_path_buf(), None, Alignment::Index))
            .err()
            .expect("malformed payload fails");

        assert!(matches!(error, CliError::Core(_)));
    }
}
