//! Client for the stock price feed HTTP API.
//!
//! # Endpoints
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | [`StockApiClient::list_stocks`] | `GET /stocks` | `{"stocks": {"Apple Inc.": "AAPL", ...}}` |
//! | [`StockApiClient::stock_prices`] | `GET /stocks/{ticker}?minutes=m` | series or `{"stock": {...}}` |
//! | [`StockApiClient::register`] | `POST /register` | `{"clientID": ..., "clientSecret": ...}` |
//! | [`StockApiClient::authenticate`] | `POST /auth` | `{"access_token": ...}` |
//!
//! Configuration, including the bearer token, is owned by each client
//! instance; there is no process-wide token.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::normalize::PricePayload;
use crate::retry::RetryConfig;
use crate::{Sample, Ticker, TimeFrame};

pub const DEFAULT_BASE_URL: &str = "http://20.244.56.144/evaluation-service";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for [`StockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct StockApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for StockApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            access_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
        }
    }
}

impl StockApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = (!token.trim().is_empty()).then(|| token.trim().to_owned());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn auth(&self) -> HttpAuth {
        self.access_token
            .as_ref()
            .map_or(HttpAuth::None, |token| HttpAuth::BearerToken(token.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// API error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    NotFound,
    RateLimited,
    Unavailable,
    InvalidRequest,
    InvalidResponse,
}

/// Structured API error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    retryable: bool,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, message, false)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::RateLimited, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unavailable, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidRequest, message, false)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidResponse, message, false)
    }

    fn new(kind: ApiErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    fn from_status(status: u16, url: &str) -> Self {
        let message = format!("{url} returned status {status}");
        match status {
            401 | 403 => Self::unauthorized(message),
            404 => Self::not_found(message),
            429 => Self::rate_limited(message),
            500..=599 => Self::unavailable(message),
            _ => Self::invalid_request(message),
        }
    }

    fn from_transport(error: &HttpError) -> Self {
        let message = format!("transport error: {}", error.message());
        if error.retryable() {
            Self::unavailable(message)
        } else {
            Self::invalid_request(message)
        }
    }

    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::Unauthorized => "api.unauthorized",
            ApiErrorKind::NotFound => "api.not_found",
            ApiErrorKind::RateLimited => "api.rate_limited",
            ApiErrorKind::Unavailable => "api.unavailable",
            ApiErrorKind::InvalidRequest => "api.invalid_request",
            ApiErrorKind::InvalidResponse => "api.invalid_response",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ApiError {}

/// Registration form submitted to `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub company_name: String,
    pub owner_name: String,
    pub roll_no: String,
    pub owner_email: String,
    pub access_code: String,
}

/// Client credentials issued on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Body of `POST /auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(rename = "companyName", default, skip_serializing_if = "String::is_empty")]
    pub company_name: String,
}

/// Bearer token returned by `POST /auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

/// Result of fetching several tickers at once. Individual failures do not
/// abort the rest of the basket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketFetch {
    /// Successful series, in the order the tickers were requested.
    pub series: Vec<(Ticker, Vec<Sample>)>,
    pub failures: Vec<(Ticker, ApiError)>,
}

#[derive(Debug, Deserialize)]
struct StocksResponse {
    stocks: BTreeMap<String, String>,
}

/// Price feed client.
#[derive(Clone)]
pub struct StockApiClient {
    config: StockApiConfig,
    http_client: Arc<dyn HttpClient>,
}

impl StockApiClient {
    pub fn new(config: StockApiConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: StockApiConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &StockApiConfig {
        &self.config
    }

    /// Replace the bearer token used by this client.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.config = self.config.clone().with_access_token(token);
    }

    /// Available stocks keyed by company name.
    pub async fn list_stocks(&self) -> Result<BTreeMap<String, Ticker>, ApiError> {
        let url = self.config.url("/stocks");
        let body = self.send(HttpRequest::get(&url)).await?;
        let response: StocksResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::invalid_response(format!("failed to parse stock listing: {e}"))
        })?;

        let stocks = response
            .stocks
            .into_iter()
            .filter_map(|(name, raw)| match Ticker::parse(&raw) {
                Ok(ticker) => Some((name, ticker)),
                Err(error) => {
                    warn!(%name, %raw, %error, "skipping stock with invalid ticker");
                    None
                }
            })
            .collect::<BTreeMap<_, _>>();

        debug!(count = stocks.len(), "loaded stock listing");
        Ok(stocks)
    }

    /// Raw price payload for `ticker`, classified but not flattened.
    pub async fn stock_prices(
        &self,
        ticker: &Ticker,
        time_frame: Option<TimeFrame>,
    ) -> Result<PricePayload, ApiError> {
        let mut url = self.config.url(&format!(
            "/stocks/{}",
            urlencoding::encode(ticker.as_str())
        ));
        if let Some(time_frame) = time_frame {
            url.push_str(&format!("?minutes={}", time_frame.as_minutes()));
        }

        let body = self.send(HttpRequest::get(&url)).await?;
        let payload = PricePayload::from_json(&body);
        debug!(%ticker, empty = payload.is_empty(), "fetched price payload");
        Ok(payload)
    }

    /// Normalized price history for `ticker`.
    pub async fn fetch_samples(
        &self,
        ticker: &Ticker,
        time_frame: Option<TimeFrame>,
    ) -> Result<Vec<Sample>, ApiError> {
        Ok(self.stock_prices(ticker, time_frame).await?.into_samples())
    }

    /// Fetch every ticker concurrently.
    pub async fn fetch_basket(&self, tickers: &[Ticker], time_frame: Option<TimeFrame>) -> BasketFetch {
        let mut tasks = JoinSet::new();
        for (index, ticker) in tickers.iter().cloned().enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let outcome = client.fetch_samples(&ticker, time_frame).await;
                (index, ticker, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(tickers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => warn!(%error, "basket fetch task did not complete"),
            }
        }
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut basket = BasketFetch::default();
        for (_, ticker, outcome) in outcomes {
            match outcome {
                Ok(samples) => basket.series.push((ticker, samples)),
                Err(error) => {
                    warn!(%ticker, %error, "price fetch failed");
                    basket.failures.push((ticker, error));
                }
            }
        }
        basket
    }

    pub async fn register(&self, registration: &Registration) -> Result<ClientCredentials, ApiError> {
        let body = serde_json::to_string(registration)
            .map_err(|e| ApiError::invalid_request(format!("failed to encode registration: {e}")))?;
        let response = self
            .send(HttpRequest::post_json(self.config.url("/register"), body))
            .await?;
        serde_json::from_str(&response)
            .map_err(|e| ApiError::invalid_response(format!("failed to parse credentials: {e}")))
    }

    /// Exchange client credentials for a bearer token. The token is
    /// returned, not stored; see [`Self::set_access_token`].
    pub async fn authenticate(&self, request: &AuthRequest) -> Result<AccessToken, ApiError> {
        let body = serde_json::to_string(request)
            .map_err(|e| ApiError::invalid_request(format!("failed to encode auth request: {e}")))?;
        let response = self
            .send(HttpRequest::post_json(self.config.url("/auth"), body))
            .await?;
        let token: AccessToken = serde_json::from_str(&response)
            .map_err(|e| ApiError::invalid_response(format!("failed to parse access token: {e}")))?;

        if token.access_token.trim().is_empty() {
            return Err(ApiError::invalid_response("auth response carried an empty token"));
        }
        Ok(token)
    }

    async fn send(&self, request: HttpRequest) -> Result<String, ApiError> {
        let request = request
            .with_header("accept", "application/json")
            .with_auth(&self.config.auth())
            .with_timeout_ms(self.config.timeout_ms);
        let retry = &self.config.retry;

        let mut attempt = 0;
        loop {
            debug!(method = request.method.as_str(), url = %request.url, attempt, "sending request");

            let error = match self.http_client.execute(request.clone()).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => {
                    let error = ApiError::from_status(response.status, &request.url);
                    if !retry.should_retry_status(response.status) {
                        return Err(error);
                    }
                    error
                }
                Err(transport) => {
                    let error = ApiError::from_transport(&transport);
                    if !transport.retryable() {
                        return Err(error);
                    }
                    error
                }
            };

            if attempt >= retry.max_retries {
                return Err(error);
            }

            let delay = retry.delay_for_attempt(attempt);
            warn!(url = %request.url, %error, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
