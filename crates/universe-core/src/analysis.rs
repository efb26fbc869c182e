//! Single-stock analytics page: volatility, correlation against an index,
//! and on-demand price history refresh.

use thiserror::Error;
use time::{Date, Duration};
use tracing::{error, info, warn};

use crate::api::{ApiError, UniverseApi};
use crate::domain::{CorrelationReport, DateRange, Ticker, VolatilityReport};
use crate::loader::{Completion, LoadSlot, Loadable, RequestToken};
use crate::selectors::TickerSelector;

pub const DEFAULT_INDEX: &str = "^IXIC";
pub const DEFAULT_UPDATE_DAYS: u32 = 60;

/// Failure of a page action, carrying the text shown to the operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Input was incomplete; nothing was sent.
    #[error("{0}")]
    Rejected(String),
    #[error("{message}")]
    Api { message: String, source: ApiError },
}

impl PageError {
    fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    fn api(prefix: &str, source: ApiError) -> Self {
        Self::Api {
            message: format!("{prefix}{source}"),
            source,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            Self::Rejected(_) => None,
        }
    }
}

/// Inputs captured when a volatility load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolatilityRequest {
    pub token: RequestToken,
    pub symbol: Ticker,
    pub range: DateRange,
}

/// Inputs captured when a correlation load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationRequest {
    pub token: RequestToken,
    pub symbol: Ticker,
    pub index: Ticker,
    pub range: DateRange,
}

/// One year back from `today`, clamped for Feb 29.
pub fn one_year_before(today: Date) -> Date {
    today
        .replace_year(today.year() - 1)
        .unwrap_or_else(|_| today - Duration::days(365))
}

#[derive(Debug)]
pub struct StockAnalysisView {
    tickers: TickerSelector,
    selected_stock: Option<Ticker>,
    index: Option<Ticker>,
    start_date: Date,
    end_date: Date,
    stock_input: String,
    update_days: u32,
    error: Option<String>,
    success: Option<String>,
    volatility: LoadSlot<VolatilityReport>,
    correlation: LoadSlot<CorrelationReport>,
}

impl StockAnalysisView {
    /// Page defaults: NASDAQ composite index, last year through `today`, 60 update days.
    pub fn new(today: Date) -> Self {
        Self {
            tickers: TickerSelector::new(),
            selected_stock: None,
            index: Ticker::parse(DEFAULT_INDEX).ok(),
            start_date: one_year_before(today),
            end_date: today,
            stock_input: String::new(),
            update_days: DEFAULT_UPDATE_DAYS,
            error: None,
            success: None,
            volatility: LoadSlot::new(),
            correlation: LoadSlot::new(),
        }
    }

    pub async fn load_tickers(&mut self, api: &UniverseApi) -> Completion {
        let completion = self.tickers.load(api).await;
        if let Some(message) = self.tickers.state().error() {
            self.error = Some(format!(
                "Failed to fetch tickers. Please try again later. ({message})"
            ));
        }
        completion
    }

    pub fn ticker_options(&self) -> &[Ticker] {
        self.tickers.options()
    }

    pub fn select_stock(&mut self, stock: Option<Ticker>) {
        self.selected_stock = stock;
    }

    pub fn selected_stock(&self) -> Option<&Ticker> {
        self.selected_stock.as_ref()
    }

    pub fn set_index(&mut self, index: Ticker) {
        self.index = Some(index);
    }

    pub fn index(&self) -> Option<&Ticker> {
        self.index.as_ref()
    }

    pub fn set_dates(&mut self, start_date: Date, end_date: Date) {
        self.start_date = start_date;
        self.end_date = end_date;
    }

    pub const fn dates(&self) -> (Date, Date) {
        (self.start_date, self.end_date)
    }

    pub fn set_stock_input(&mut self, input: impl Into<String>) {
        self.stock_input = input.into();
    }

    pub fn set_update_days(&mut self, days: u32) {
        self.update_days = days;
    }

    pub const fn update_days(&self) -> u32 {
        self.update_days
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn volatility(&self) -> &Loadable<VolatilityReport> {
        self.volatility.state()
    }

    pub fn correlation(&self) -> &Loadable<CorrelationReport> {
        self.correlation.state()
    }

    pub fn cancel(&mut self) {
        self.tickers.cancel();
        self.volatility.cancel();
        self.correlation.cancel();
    }

    pub async fn analyze_volatility(
        &mut self,
        api: &UniverseApi,
    ) -> Result<Completion, PageError> {
        let request = self.begin_volatility()?;
        let result = api
            .volatility(&request.symbol, request.range.begin(), request.range.end())
            .await;
        self.finish_volatility(&request, result)
    }

    /// Validate the page inputs and start a volatility load.
    pub fn begin_volatility(&mut self) -> Result<VolatilityRequest, PageError> {
        let symbol = self.require_stock()?;
        let range = self.require_range()?;
        self.error = None;
        Ok(VolatilityRequest {
            token: self.volatility.begin(),
            symbol,
            range,
        })
    }

    /// Apply a volatility result. A stale request leaves the page untouched.
    pub fn finish_volatility(
        &mut self,
        request: &VolatilityRequest,
        result: Result<VolatilityReport, ApiError>,
    ) -> Result<Completion, PageError> {
        if !self.volatility.is_current(request.token) {
            return Ok(Completion::Discarded);
        }

        match result {
            Ok(report) => {
                let completion = self.volatility.complete(request.token, Ok::<_, ApiError>(report));
                Ok(completion)
            }
            Err(failure) => {
                warn!(
                    component = "stock_analysis",
                    event = "volatility.failed",
                    symbol = %request.symbol,
                    error = %failure
                );
                let page = PageError::api("Failed to fetch volatility data: ", failure);
                self.volatility.complete(request.token, Err::<VolatilityReport, _>(&page));
                self.error = Some(page.to_string());
                Err(page)
            }
        }
    }

    pub async fn analyze_correlation(
        &mut self,
        api: &UniverseApi,
    ) -> Result<Completion, PageError> {
        let request = self.begin_correlation()?;
        let result = api
            .correlation(
                &request.symbol,
                &request.index,
                request.range.begin(),
                request.range.end(),
            )
            .await;
        self.finish_correlation(&request, result)
    }

    /// Validate the page inputs and start a correlation load.
    pub fn begin_correlation(&mut self) -> Result<CorrelationRequest, PageError> {
        let symbol = self.require_stock()?;
        let index = self.require_index()?;
        let range = self.require_range()?;
        self.error = None;
        Ok(CorrelationRequest {
            token: self.correlation.begin(),
            symbol,
            index,
            range,
        })
    }

    /// Apply a correlation result. A 404 becomes the update-first guidance.
    pub fn finish_correlation(
        &mut self,
        request: &CorrelationRequest,
        result: Result<CorrelationReport, ApiError>,
    ) -> Result<Completion, PageError> {
        if !self.correlation.is_current(request.token) {
            return Ok(Completion::Discarded);
        }

        let (stock, index) = (&request.symbol, &request.index);
        match result {
            Ok(report) => {
                let completion = self.correlation.complete(request.token, Ok::<_, ApiError>(report));
                Ok(completion)
            }
            Err(failure) => {
                warn!(
                    component = "stock_analysis",
                    event = "correlation.failed",
                    symbol = %stock,
                    index = %index,
                    error = %failure
                );
                let failure = if failure.is_not_found() {
                    ApiError::status(
                        404,
                        format!(
                            "No data found for {stock} or {index} in the selected date range. Please update stock data first."
                        ),
                    )
                } else {
                    failure
                };
                let page = PageError::api("Failed to fetch correlation data: ", failure);
                self.correlation.complete(request.token, Err::<CorrelationReport, _>(&page));
                self.error = Some(page.to_string());
                Err(page)
            }
        }
    }

    /// Refresh price history for the symbols typed into the update box.
    pub async fn update_stocks(&mut self, api: &UniverseApi) -> Result<String, PageError> {
        if self.stock_input.trim().is_empty() {
            return Err(self.reject("Please enter at least one stock symbol"));
        }
        let symbols = match Ticker::parse_list(&self.stock_input) {
            Ok(symbols) if !symbols.is_empty() => symbols,
            Ok(_) => return Err(self.reject("Please enter at least one stock symbol")),
            Err(invalid) => return Err(self.reject(invalid.to_string())),
        };
        self.clear_messages();

        match api
            .update_stock_data(&symbols, self.index.as_ref(), self.update_days)
            .await
        {
            Ok(message) => {
                info!(
                    component = "stock_analysis",
                    event = "stock_data.updated",
                    count = symbols.len(),
                    days = self.update_days
                );
                self.success = Some(format!("Successfully updated stock data: {message}"));
                self.tickers.load(api).await;
                Ok(message)
            }
            Err(failure) => Err(self.fail_write("Failed to update stock data: ", failure)),
        }
    }

    /// Refresh price history for the selected index alone.
    pub async fn update_index(&mut self, api: &UniverseApi) -> Result<String, PageError> {
        let index = self.require_index()?;
        self.clear_messages();

        match api
            .update_stock_data(std::slice::from_ref(&index), None, self.update_days)
            .await
        {
            Ok(message) => {
                info!(
                    component = "stock_analysis",
                    event = "index_data.updated",
                    index = %index
                );
                self.success = Some(format!("Successfully updated index data: {message}"));
                Ok(message)
            }
            Err(failure) => Err(self.fail_write("Failed to update index data: ", failure)),
        }
    }

    /// Probe whether the backend holds price history for the index.
    pub async fn check_index(&mut self, api: &UniverseApi) -> Result<u32, PageError> {
        let index = self.require_index()?;
        let range = self.require_range()?;
        self.clear_messages();

        match api
            .volatility(&index, range.begin(), range.end())
            .await
        {
            Ok(report) => {
                self.success = Some(format!(
                    "Index data exists for {index} with {} trading days.",
                    report.trading_days
                ));
                Ok(report.trading_days)
            }
            Err(failure) => {
                let message = if failure.is_not_found() {
                    format!("Index data for {index} not found in database. Try updating it again.")
                } else if failure.status_code().is_some() {
                    format!("Error checking index data: {failure}")
                } else {
                    format!("Failed to check index data: {failure}")
                };
                warn!(
                    component = "stock_analysis",
                    event = "index_check.failed",
                    index = %index,
                    error = %failure
                );
                self.error = Some(message.clone());
                Err(PageError::Api {
                    message,
                    source: failure,
                })
            }
        }
    }

    fn require_stock(&mut self) -> Result<Ticker, PageError> {
        match self.selected_stock.clone() {
            Some(stock) => Ok(stock),
            None => Err(self.reject("Please select a stock symbol")),
        }
    }

    fn require_index(&mut self) -> Result<Ticker, PageError> {
        match self.index.clone() {
            Some(index) => Ok(index),
            None => Err(self.reject("Please select an index")),
        }
    }

    fn require_range(&mut self) -> Result<DateRange, PageError> {
        match DateRange::new(self.start_date, self.end_date) {
            Ok(range) => Ok(range),
            Err(_) => Err(self.reject("Start date must be earlier than end date.")),
        }
    }

    fn reject(&mut self, message: impl Into<String>) -> PageError {
        let page = PageError::rejected(message);
        self.error = Some(page.to_string());
        page
    }

    fn fail_write(&mut self, prefix: &str, failure: ApiError) -> PageError {
        error!(
            component = "stock_analysis",
            event = "update.failed",
            code = failure.code(),
            error = %failure
        );
        let page = PageError::api(prefix, failure);
        self.error = Some(page.to_string());
        page
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn defaults_cover_last_year() {
        let view = StockAnalysisView::new(date!(2024 - 06 - 15));
        assert_eq!(
            view.dates(),
            (date!(2023 - 06 - 15), date!(2024 - 06 - 15))
        );
        assert_eq!(view.index().map(Ticker::as_str), Some("^IXIC"));
        assert_eq!(view.update_days(), 60);
    }

    #[test]
    fn leap_day_steps_back_365_days() {
        assert_eq!(one_year_before(date!(2024 - 02 - 29)), date!(2023 - 03 - 01));
    }

    fn page_with_stock() -> StockAnalysisView {
        let mut view = StockAnalysisView::new(date!(2024 - 06 - 15));
        view.select_stock(Ticker::parse("AAPL").ok());
        view
    }

    fn report(symbol: &str, trading_days: u32) -> VolatilityReport {
        serde_json::from_value(serde_json::json!({
            "stock_symbol": symbol,
            "start_date": "2024-01-01",
            "end_date": "2024-01-07",
            "daily_volatility": 0.01,
            "mean_daily_return": 0.0,
            "min_daily_return": -0.02,
            "max_daily_return": 0.02,
            "trading_days": trading_days
        }))
        .expect("report decodes")
    }

    #[test]
    fn superseded_volatility_result_is_dropped() {
        let mut view = page_with_stock();
        let slow = view.begin_volatility().expect("inputs complete");
        let fresh = view.begin_volatility().expect("inputs complete");

        assert_eq!(
            view.finish_volatility(&fresh, Ok(report("AAPL", 5))),
            Ok(Completion::Applied)
        );
        let late = view.finish_volatility(
            &slow,
            Err(ApiError::status(500, "HTTP error! status: 500")),
        );

        assert_eq!(late, Ok(Completion::Discarded));
        assert_eq!(view.volatility().value().map(|r| r.trading_days), Some(5));
        assert_eq!(view.error(), None);
    }

    #[test]
    fn cancelled_correlation_result_is_dropped() {
        let mut view = page_with_stock();
        let request = view.begin_correlation().expect("inputs complete");
        assert_eq!(request.index.as_str(), "^IXIC");
        view.cancel();

        let late = view.finish_correlation(&request, Err(ApiError::status(404, "missing")));

        assert_eq!(late, Ok(Completion::Discarded));
        assert_eq!(view.correlation(), &Loadable::Idle);
        assert_eq!(view.error(), None);
    }

    #[test]
    fn page_error_prefixes_api_reason() {
        let page = PageError::api(
            "Failed to fetch volatility data: ",
            ApiError::status(500, "HTTP error! status: 500"),
        );
        assert_eq!(
            page.to_string(),
            "Failed to fetch volatility data: HTTP error! status: 500"
        );
        assert_eq!(page.api_error().and_then(ApiError::status_code), Some(500));
    }
}
