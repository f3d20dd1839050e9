//! Price payload normalization.
//!
//! The price feed answers `GET /stocks/{ticker}` with one of two shapes:
//!
//! ```text
//! [{"price": 231.9, "lastUpdatedAt": "..."}, ...]      time-series
//! {"stock": {"price": 231.9, "lastUpdatedAt": "..."}}  single point
//! ```
//!
//! [`PricePayload::classify`] inspects the JSON once and yields a closed set
//! of variants; everything downstream works on the canonical `Vec<Sample>`.
//! Classification never fails: unknown shapes degrade to [`PricePayload::Empty`].

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{CoreError, Sample};

const ENVELOPE_FIELD: &str = "stock";

/// Recognized price payload shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PricePayload {
    /// Ordered list of samples.
    Series(Vec<Sample>),
    /// Envelope wrapping a single sample under `stock`.
    Single(Sample),
    /// `null`, absent, or unrecognized input.
    Empty,
}

impl PricePayload {
    /// Classify an already-parsed JSON value.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Series(series_from_items(items)),
            Value::Object(fields) => fields
                .get(ENVELOPE_FIELD)
                .and_then(|inner| Sample::deserialize(inner).ok())
                .map_or(Self::Empty, Self::Single),
            _ => Self::Empty,
        }
    }

    /// Classify a raw response body. Bodies that are not JSON are `Empty`.
    pub fn from_json(body: &str) -> Self {
        Self::try_from_json(body).unwrap_or_else(|error| {
            warn!(%error, "price payload is not valid JSON");
            Self::Empty
        })
    }

    /// Like [`Self::from_json`] but reports bodies that are not JSON at all.
    /// Valid JSON of an unknown shape is still `Empty`.
    pub fn try_from_json(body: &str) -> Result<Self, CoreError> {
        let value = serde_json::from_str::<Value>(body)?;
        Ok(Self::classify(&value))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Series(samples) => samples.is_empty(),
            Self::Single(_) => false,
            Self::Empty => true,
        }
    }

    pub fn into_samples(self) -> Vec<Sample> {
        match self {
            Self::Series(samples) => samples,
            Self::Single(sample) => vec![sample],
            Self::Empty => Vec::new(),
        }
    }
}

impl From<Option<Value>> for PricePayload {
    fn from(value: Option<Value>) -> Self {
        value.as_ref().map_or(Self::Empty, Self::classify)
    }
}

/// Convert any recognized payload into a canonical sample sequence.
pub fn normalize(value: &Value) -> Vec<Sample> {
    PricePayload::classify(value).into_samples()
}

fn series_from_items(items: &[Value]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(items.len());
    let mut skipped = 0_usize;

    for item in items {
        match Sample::deserialize(item) {
            Ok(sample) => samples.push(sample),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = samples.len(), "dropped series items without a numeric price");
    }

    samples
}
