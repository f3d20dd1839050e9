use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// One observed price point for a ticker.
///
/// `price` carries no domain constraint: zero and negative values pass
/// through untouched. The timestamp is kept exactly as the feed sent it and
/// only parsed when samples need ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub price: f64,
    #[serde(
        rename = "lastUpdatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated_at: Option<String>,
}

impl Sample {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            last_updated_at: None,
        }
    }

    pub fn at(price: f64, last_updated_at: impl Into<String>) -> Self {
        Self {
            price,
            last_updated_at: Some(last_updated_at.into()),
        }
    }

    /// Parsed observation instant, if the raw timestamp is valid RFC3339.
    pub fn timestamp(&self) -> Option<UtcDateTime> {
        self.last_updated_at
            .as_deref()
            .and_then(|raw| UtcDateTime::parse(raw).ok())
    }
}

/// Stable chronological sort.
///
/// Samples whose timestamp is missing or unparseable keep their relative
/// order and are placed after all timestamped samples.
pub fn sort_chronologically(samples: &[Sample]) -> Vec<Sample> {
    let mut keyed = samples
        .iter()
        .map(|sample| (sample.timestamp(), sample))
        .collect::<Vec<_>>();

    keyed.sort_by(|(left, _), (right, _)| match (left, right) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    keyed.into_iter().map(|(_, sample)| sample.clone()).collect()
}
