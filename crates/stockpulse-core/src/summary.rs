//! Per-ticker views built on top of [`crate::stats`]: the statistics panel
//! summary and the price chart with its average overlay.

use serde::Serialize;

use crate::stats::{average, std_dev};
use crate::{sort_chronologically, Sample};

/// Extreme price together with when it was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
}

impl From<&Sample> for PricePoint {
    fn from(sample: &Sample) -> Self {
        Self {
            price: sample.price,
            last_updated_at: sample.last_updated_at.clone(),
        }
    }
}

/// Statistics panel for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub average: f64,
    pub std_dev: f64,
    pub min: PricePoint,
    pub max: PricePoint,
    pub first_price: f64,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl PriceSummary {
    /// Summarize a sample sequence; `None` when there is nothing to show.
    ///
    /// `min`/`max` report the first sample attaining the extreme in input
    /// order. `first_price`/`last_price` come from the chronologically sorted
    /// sequence.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let (first_sample, rest) = samples.split_first()?;

        let mut min = first_sample;
        let mut max = first_sample;
        for sample in rest {
            if sample.price < min.price {
                min = sample;
            }
            if sample.price > max.price {
                max = sample;
            }
        }

        let sorted = sort_chronologically(samples);
        let first_price = sorted.first().map_or(0.0, |sample| sample.price);
        let last_price = sorted.last().map_or(0.0, |sample| sample.price);
        let change = last_price - first_price;
        let percent_change = if first_price == 0.0 {
            0.0
        } else {
            change / first_price * 100.0
        };

        Some(Self {
            count: samples.len(),
            average: average(samples),
            std_dev: std_dev(samples),
            min: PricePoint::from(min),
            max: PricePoint::from(max),
            first_price,
            last_price,
            change,
            percent_change,
        })
    }
}

/// Chart-ready series: chronologically ordered prices plus a flat line at
/// the average price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub labels: Vec<Option<String>>,
    pub prices: Vec<f64>,
    pub average_line: Vec<f64>,
    pub average: f64,
}

impl PriceChart {
    pub fn from_samples(samples: &[Sample]) -> Self {
        let average = average(samples);
        let sorted = sort_chronologically(samples);

        let labels = sorted
            .iter()
            .map(|sample| {
                sample
                    .timestamp()
                    .map(|ts| ts.format_rfc3339())
                    .or_else(|| sample.last_updated_at.clone())
            })
            .collect::<Vec<_>>();
        let prices = sorted.iter().map(|sample| sample.price).collect::<Vec<_>>();
        let average_line = vec![average; prices.len()];

        Self {
            labels,
            prices,
            average_line,
            average,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
