//! # Stockpulse Core
//!
//! Price-series statistics for the stockpulse dashboard.
//!
//! ## Overview
//!
//! - **Normalizer** turning the feed's heterogeneous price payloads into one
//!   canonical `Vec<Sample>`
//! - **Statistics**: average, sample standard deviation, Pearson correlation
//! - **Correlation matrix** for a basket of tickers, with per-ticker stats
//! - **Price summary and chart series** for a single ticker
//! - **API client** for the price feed, with explicit configuration
//! - **Poller** for fixed-period refresh
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Price feed client (listing, prices, registration, auth) |
//! | [`domain`] | Domain models (Sample, Ticker, TimeFrame, UtcDateTime) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`matrix`] | Pairwise correlation matrix |
//! | [`normalize`] | Payload classification and normalization |
//! | [`poller`] | Recurring refresh with cancellation |
//! | [`retry`] | Retry and backoff policy |
//! | [`stats`] | Average, standard deviation, correlation |
//! | [`summary`] | Statistics panel and chart series |
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use stockpulse_core::{average, correlation, normalize, std_dev};
//!
//! let aapl = normalize(&json!([{"price": 10.0}, {"price": 12.0}, {"price": 11.0}]));
//! let msft = normalize(&json!([{"price": 20.0}, {"price": 24.0}, {"price": 22.0}]));
//!
//! assert_eq!(average(&aapl), 11.0);
//! assert_eq!(std_dev(&aapl), 1.0);
//! assert!((correlation(&aapl, &msft) - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Error Handling
//!
//! The statistics core never fails: empty or degenerate input yields `0.0`
//! and unrecognized payloads normalize to an empty sequence. Network
//! operations return [`ApiError`], classified by [`ApiErrorKind`].

pub mod api;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod matrix;
pub mod normalize;
pub mod poller;
pub mod retry;
pub mod stats;
pub mod summary;

pub use api::{
    AccessToken, ApiError, ApiErrorKind, AuthRequest, BasketFetch, ClientCredentials,
    Registration, StockApiClient, StockApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};

pub use domain::{sort_chronologically, Sample, Ticker, TimeFrame, UtcDateTime};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    FixtureHttpClient, HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

pub use matrix::{CorrelationMatrix, TickerStats};

pub use normalize::{normalize, PricePayload};

pub use poller::{Poller, PollerHandle, BASKET_REFRESH, PRICE_REFRESH};

pub use retry::{Backoff, RetryConfig};

pub use stats::{average, correlation, correlation_by_timestamp, correlation_clamped, std_dev};

pub use summary::{PriceChart, PricePoint, PriceSummary};
