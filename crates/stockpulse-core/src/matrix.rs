//! Pairwise correlation matrix for a basket of tickers.
//!
//! The matrix is a disposable snapshot: callers rebuild it whenever the
//! basket or time frame changes. The diagonal is `1.0` by definition and is
//! never computed.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stats::{average, correlation_clamped, std_dev};
use crate::{Sample, Ticker};

/// Per-ticker figures shown alongside a heatmap row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickerStats {
    pub average: f64,
    pub std_dev: f64,
    pub samples: usize,
}

/// Square correlation matrix indexed by ticker position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub tickers: Vec<Ticker>,
    pub values: Vec<Vec<f64>>,
    pub stats: BTreeMap<Ticker, TickerStats>,
}

impl CorrelationMatrix {
    /// Build the matrix for `series`, keeping the input order of tickers.
    ///
    /// Off-diagonal cells use index-aligned, clamped Pearson correlation.
    pub fn build(series: &[(Ticker, Vec<Sample>)]) -> Self {
        let tickers = series
            .iter()
            .map(|(ticker, _)| ticker.clone())
            .collect::<Vec<_>>();

        let size = series.len();
        let mut values = vec![vec![0.0; size]; size];
        for (row, (_, left)) in series.iter().enumerate() {
            values[row][row] = 1.0;
            for (col, (_, right)) in series.iter().enumerate().skip(row + 1) {
                let value = correlation_clamped(left, right);
                values[row][col] = value;
                values[col][row] = value;
            }
        }

        let stats = series
            .iter()
            .map(|(ticker, samples)| {
                (
                    ticker.clone(),
                    TickerStats {
                        average: average(samples),
                        std_dev: std_dev(samples),
                        samples: samples.len(),
                    },
                )
            })
            .collect();

        Self {
            tickers,
            values,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Correlation between two tickers of the basket.
    pub fn get(&self, a: &Ticker, b: &Ticker) -> Option<f64> {
        let row = self.position(a)?;
        let col = self.position(b)?;
        Some(self.values[row][col])
    }

    pub fn stats_for(&self, ticker: &Ticker) -> Option<&TickerStats> {
        self.stats.get(ticker)
    }

    fn position(&self, ticker: &Ticker) -> Option<usize> {
        self.tickers.iter().position(|candidate| candidate == ticker)
    }
}
