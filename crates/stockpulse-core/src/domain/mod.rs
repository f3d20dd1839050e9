//! # Domain Models
//!
//! Canonical domain types for stockpulse price data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Sample`] | One `(price, lastUpdatedAt)` observation |
//! | [`Ticker`] | Validated exchange ticker |
//! | [`TimeFrame`] | Trailing history window in minutes |
//! | [`UtcDateTime`] | RFC3339 timestamp normalized to UTC |
//!
//! A *sample sequence* is a plain `Vec<Sample>`; statistics accept `&[Sample]`.

mod sample;
mod ticker;
mod time_frame;
mod timestamp;

pub use sample::{sort_chronologically, Sample};
pub use ticker::Ticker;
pub use time_frame::TimeFrame;
pub use timestamp::UtcDateTime;
