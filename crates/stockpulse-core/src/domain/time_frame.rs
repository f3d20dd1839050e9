use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trailing window, in minutes, of price history requested from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeFrame(u32);

impl TimeFrame {
    pub const MIN_MINUTES: u32 = 5;
    pub const MAX_MINUTES: u32 = 60;
    pub const DEFAULT_MINUTES: u32 = 30;

    pub fn minutes(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN_MINUTES..=Self::MAX_MINUTES).contains(&value) {
            return Err(ValidationError::TimeFrameOutOfRange {
                value,
                min: Self::MIN_MINUTES,
                max: Self::MAX_MINUTES,
            });
        }
        Ok(Self(value))
    }

    pub const fn as_minutes(self) -> u32 {
        self.0
    }
}

impl Default for TimeFrame {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}

impl Display for TimeFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl FromStr for TimeFrame {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed.strip_suffix('m').unwrap_or(trimmed);
        let minutes = digits
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidTimeFrame {
                value: value.to_owned(),
            })?;
        Self::minutes(minutes)
    }
}

impl TryFrom<u32> for TimeFrame {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::minutes(value)
    }
}

impl From<TimeFrame> for u32 {
    fn from(value: TimeFrame) -> Self {
        value.0
    }
}
