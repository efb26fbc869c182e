//! Typed client for the universe backend.
//!
//! # Endpoints
//!
//! | Method | Path | Call |
//! |--------|------|------|
//! | GET | `/tickers` | [`UniverseApi::tickers`] |
//! | GET | `/measurement_periods` | [`UniverseApi::measurement_periods`] |
//! | GET | `/get_universes` | [`UniverseApi::universes`] |
//! | POST | `/create_universe` | [`UniverseApi::create_universe`] |
//! | PUT | `/edit_universe/{id}` | [`UniverseApi::edit_universe`] |
//! | DELETE | `/delete_universes` | [`UniverseApi::delete_universes`] |
//! | GET | `/get_short_interest` | [`UniverseApi::short_interest`] |
//! | GET | `/stock_volatility` | [`UniverseApi::volatility`] |
//! | GET | `/stock_correlation` | [`UniverseApi::correlation`] |
//! | POST | `/update_stock_data` | [`UniverseApi::update_stock_data`] |
//! | GET | `/holdings/{ticker}` | [`UniverseApi::holdings`] |
//! | GET | `/update_13F_data` | [`UniverseApi::update_13f_data`] |
//!
//! Every call is a single request. Nothing is retried.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::{
    format_date, join_tickers, CorrelationReport, DateRange, Holding13F, MeasurementPeriod,
    ShortInterestSeries, Ticker, Universe, UniverseId, UniversePayload, VolatilityReport,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};

/// API error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced a response.
    Transport,
    /// The backend answered with a non-2xx status.
    Status,
    /// The response body did not match the expected shape.
    Decode,
    /// The request could not be built.
    InvalidRequest,
}

/// Structured API error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
    retryable: bool,
}

impl ApiError {
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Status,
            message: message.into(),
            status: Some(status),
            retryable: status == 408 || status == 429 || status >= 500,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: message.into(),
            status: None,
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::InvalidRequest,
            message: message.into(),
            status: None,
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status_code(&self) -> Option<u16> {
        self.status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self.status, Some(404))
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::Transport => "api.transport",
            ApiErrorKind::Status => "api.status",
            ApiErrorKind::Decode => "api.decode",
            ApiErrorKind::InvalidRequest => "api.invalid_request",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// Ticker option as listed by `/tickers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerListing {
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TickersResponse {
    #[serde(default)]
    tickers: Vec<TickerListing>,
}

#[derive(Debug, Deserialize)]
struct UniversesResponse {
    #[serde(default)]
    universes: Option<Vec<Universe>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UniverseResponse {
    Wrapped { universe: Universe },
    Bare(Universe),
}

impl UniverseResponse {
    fn into_universe(self) -> Universe {
        match self {
            Self::Wrapped { universe } | Self::Bare(universe) => universe,
        }
    }
}

#[derive(Debug, Serialize)]
struct DeleteUniversesBody<'a> {
    universe_ids: &'a [UniverseId],
}

#[derive(Debug, Serialize)]
struct UpdateStockDataBody {
    symbols: String,
    index: Option<String>,
    days: u32,
}

#[derive(Debug, Deserialize)]
struct UpdateStockDataResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    #[serde(default)]
    holdings: Vec<Holding13F>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: serde_json::Value,
}

/// Client for every backend endpoint the console consumes.
#[derive(Clone)]
pub struct UniverseApi {
    config: ApiConfig,
    http_client: Arc<dyn HttpClient>,
}

impl UniverseApi {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: ApiConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn tickers(&self) -> Result<Vec<TickerListing>, ApiError> {
        let response = self.send(HttpRequest::get(self.config.endpoint("/tickers"))).await?;
        let decoded: TickersResponse = decode(&response)?;
        Ok(decoded.tickers)
    }

    pub async fn measurement_periods(&self) -> Result<Vec<MeasurementPeriod>, ApiError> {
        let url = self.config.endpoint("/measurement_periods");
        let response = self.send(HttpRequest::get(url)).await?;
        decode(&response)
    }

    /// All saved universes. An absent `universes` key decodes as empty.
    pub async fn universes(&self) -> Result<Vec<Universe>, ApiError> {
        let url = self.config.endpoint("/get_universes");
        let response = self.send(HttpRequest::get(url)).await?;
        let decoded: UniversesResponse = decode(&response)?;
        Ok(decoded.universes.unwrap_or_default())
    }

    /// Create a universe. Returns the created record when the response carries one.
    pub async fn create_universe(
        &self,
        payload: &UniversePayload,
    ) -> Result<Option<Universe>, ApiError> {
        let request = HttpRequest::post(self.config.endpoint("/create_universe"))
            .with_json(payload)
            .map_err(|e| ApiError::invalid_request(format!("failed to encode universe: {e}")))?;
        let response = self.send(request).await?;
        Ok(decode_optional_universe(&response))
    }

    pub async fn edit_universe(
        &self,
        id: UniverseId,
        payload: &UniversePayload,
    ) -> Result<Option<Universe>, ApiError> {
        let request = HttpRequest::put(self.config.endpoint(&format!("/edit_universe/{id}")))
            .with_json(payload)
            .map_err(|e| ApiError::invalid_request(format!("failed to encode universe: {e}")))?;
        let response = self.send(request).await?;
        Ok(decode_optional_universe(&response))
    }

    /// Delete all `ids` in one request. The backend applies it all-or-nothing.
    pub async fn delete_universes(&self, ids: &[UniverseId]) -> Result<(), ApiError> {
        if ids.is_empty() {
            return Err(ApiError::invalid_request(
                "delete request must include at least one universe id",
            ));
        }

        let request = HttpRequest::delete(self.config.endpoint("/delete_universes"))
            .with_json(&DeleteUniversesBody { universe_ids: ids })
            .map_err(|e| ApiError::invalid_request(format!("failed to encode ids: {e}")))?;
        self.send(request).await?;
        Ok(())
    }

    pub async fn short_interest(
        &self,
        tickers: &[Ticker],
        range: DateRange,
    ) -> Result<ShortInterestSeries, ApiError> {
        let url = format!(
            "{}?tickers={}&start_date={}&end_date={}",
            self.config.endpoint("/get_short_interest"),
            urlencoding::encode(&join_tickers(tickers)),
            format_date(range.begin()),
            format_date(range.end()),
        );
        let response = self.send(HttpRequest::get(url)).await?;
        decode(&response)
    }

    pub async fn volatility(
        &self,
        symbol: &Ticker,
        start: Date,
        end: Date,
    ) -> Result<VolatilityReport, ApiError> {
        let url = format!(
            "{}?symbol={}&start_date={}&end_date={}",
            self.config.endpoint("/stock_volatility"),
            urlencoding::encode(symbol.as_str()),
            format_date(start),
            format_date(end),
        );
        let response = self.send(HttpRequest::get(url)).await?;
        decode(&response)
    }

    pub async fn correlation(
        &self,
        symbol: &Ticker,
        index: &Ticker,
        start: Date,
        end: Date,
    ) -> Result<CorrelationReport, ApiError> {
        let url = format!(
            "{}?symbol={}&index={}&start_date={}&end_date={}",
            self.config.endpoint("/stock_correlation"),
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(index.as_str()),
            format_date(start),
            format_date(end),
        );
        let response = self.send(HttpRequest::get(url)).await?;
        decode(&response)
    }

    /// Ask the backend to refresh price history. Returns its status message.
    pub async fn update_stock_data(
        &self,
        symbols: &[Ticker],
        index: Option<&Ticker>,
        days: u32,
    ) -> Result<String, ApiError> {
        let body = UpdateStockDataBody {
            symbols: join_tickers(symbols),
            index: index.map(|ticker| ticker.to_string()),
            days,
        };
        let request = HttpRequest::post(self.config.endpoint("/update_stock_data"))
            .with_json(&body)
            .map_err(|e| ApiError::invalid_request(format!("failed to encode update: {e}")))?;
        let response = self.send(request).await?;
        let decoded: UpdateStockDataResponse = decode(&response)?;
        Ok(decoded.message)
    }

    pub async fn holdings(
        &self,
        ticker: &Ticker,
        quarter: Option<&str>,
    ) -> Result<Vec<Holding13F>, ApiError> {
        let mut url = self.config.endpoint(&format!(
            "/holdings/{}",
            urlencoding::encode(ticker.as_str())
        ));
        if let Some(quarter) = quarter.filter(|q| !q.is_empty()) {
            url.push_str(&format!("?quarter={}", urlencoding::encode(quarter)));
        }
        let response = self.send(HttpRequest::get(url)).await?;
        let decoded: HoldingsResponse = decode(&response)?;
        Ok(decoded.holdings)
    }

    pub async fn update_13f_data(
        &self,
        quarter: Option<&str>,
        force_update: bool,
    ) -> Result<serde_json::Value, ApiError> {
        let mut url = format!(
            "{}?force_update={force_update}",
            self.config.endpoint("/update_13F_data")
        );
        if let Some(quarter) = quarter.filter(|q| !q.is_empty()) {
            url.push_str(&format!("&report_quarter={}", urlencoding::encode(quarter)));
        }
        let response = self.send(HttpRequest::get(url)).await?;
        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        decode(&response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = request.with_timeout_ms(self.config.timeout_ms);
        let method = request.method;
        let path = request.path().to_string();
        debug!(component = "api", event = "request.start", %method, path = %path);

        let response = self.http_client.execute(request).await.map_err(|error| {
            ApiError::transport(
                format!("{method} {path} failed: {error}"),
                error.retryable(),
            )
        })?;

        debug!(
            component = "api",
            event = "request.end",
            %method,
            path = %path,
            status = response.status
        );

        if !response.is_success() {
            let reason = error_detail(&response.body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", response.status));
            return Err(ApiError::status(response.status, reason));
        }

        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body)
        .map_err(|e| ApiError::decode(format!("failed to parse response: {e}")))
}

fn decode_optional_universe(response: &HttpResponse) -> Option<Universe> {
    match serde_json::from_str::<UniverseResponse>(&response.body) {
        Ok(decoded) => Some(decoded.into_universe()),
        Err(error) => {
            debug!(
                component = "api",
                event = "response.no_record",
                error = %error
            );
            None
        }
    }
}

fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorDetail = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(text) if !text.is_empty() => Some(text),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
