//! 13F institutional holdings page.

use time::{Date, Month};
use tracing::{error, info, warn};

use crate::analysis::PageError;
use crate::api::{ApiError, UniverseApi};
use crate::domain::{Holding13F, Ticker};
use crate::loader::{Completion, LoadSlot, Loadable, RequestToken};
use crate::selectors::{SelectionError, TickerSelector};

/// Quarter-end dates for the current quarter and the three before it,
/// newest first, formatted `MM-DD-YYYY`.
pub fn quarter_options(today: Date) -> Vec<String> {
    let current = (u8::from(today.month()) as i32 - 1) / 3;
    (0..4)
        .map(|back| {
            let offset = current - back;
            let quarter = offset.rem_euclid(4);
            let year = today.year() + offset.div_euclid(4);
            let (month, day) = match quarter {
                0 => (Month::March, 31),
                1 => (Month::June, 30),
                2 => (Month::September, 30),
                _ => (Month::December, 31),
            };
            format!("{:02}-{day}-{year}", u8::from(month))
        })
        .collect()
}

/// Inputs captured when a holdings load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingsRequest {
    pub token: RequestToken,
    pub ticker: Ticker,
    pub quarter: Option<String>,
}

#[derive(Debug)]
pub struct Holdings13FView {
    tickers: TickerSelector,
    quarters: Vec<String>,
    selected_quarter: Option<String>,
    selected_ticker: Option<Ticker>,
    holdings: LoadSlot<Vec<Holding13F>>,
    error: Option<String>,
    success: Option<String>,
}

impl Holdings13FView {
    pub fn new(today: Date) -> Self {
        Self {
            tickers: TickerSelector::new(),
            quarters: quarter_options(today),
            selected_quarter: None,
            selected_ticker: None,
            holdings: LoadSlot::new(),
            error: None,
            success: None,
        }
    }

    pub async fn load_tickers(&mut self, api: &UniverseApi) -> Completion {
        let completion = self.tickers.load(api).await;
        if self.tickers.state().error().is_some() {
            self.error = Some(String::from("Failed to fetch tickers"));
        }
        completion
    }

    pub fn ticker_options(&self) -> &[Ticker] {
        self.tickers.options()
    }

    pub fn quarters(&self) -> &[String] {
        &self.quarters
    }

    /// Pick a quarter from [`Holdings13FView::quarters`]; `None` means any quarter.
    pub fn select_quarter(&mut self, quarter: Option<&str>) -> Result<(), SelectionError> {
        match quarter {
            None => self.selected_quarter = None,
            Some(value) if self.quarters.iter().any(|q| q == value) => {
                self.selected_quarter = Some(value.to_owned());
            }
            Some(value) => {
                return Err(SelectionError::UnknownOption {
                    value: value.to_owned(),
                })
            }
        }
        Ok(())
    }

    pub fn selected_quarter(&self) -> Option<&str> {
        self.selected_quarter.as_deref()
    }

    pub fn select_ticker(&mut self, ticker: Option<Ticker>) {
        self.selected_ticker = ticker;
    }

    pub fn holdings_state(&self) -> &Loadable<Vec<Holding13F>> {
        self.holdings.state()
    }

    pub fn holdings(&self) -> &[Holding13F] {
        self.holdings.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn cancel(&mut self) {
        self.tickers.cancel();
        self.holdings.cancel();
    }

    pub async fn view_holdings(&mut self, api: &UniverseApi) -> Result<Completion, PageError> {
        let request = self.begin_holdings()?;
        let result = api
            .holdings(&request.ticker, request.quarter.as_deref())
            .await;
        self.finish_holdings(&request, result)
    }

    /// Validate the selection and start a holdings load.
    pub fn begin_holdings(&mut self) -> Result<HoldingsRequest, PageError> {
        let Some(ticker) = self.selected_ticker.clone() else {
            let page = PageError::Rejected(String::from("Please select a ticker"));
            self.error = Some(page.to_string());
            return Err(page);
        };
        self.error = None;
        Ok(HoldingsRequest {
            token: self.holdings.begin(),
            ticker,
            quarter: self.selected_quarter.clone(),
        })
    }

    /// Apply a holdings result. A failure clears the table.
    pub fn finish_holdings(
        &mut self,
        request: &HoldingsRequest,
        result: Result<Vec<Holding13F>, ApiError>,
    ) -> Result<Completion, PageError> {
        if !self.holdings.is_current(request.token) {
            return Ok(Completion::Discarded);
        }

        match result {
            Ok(holdings) => {
                let completion = self.holdings.complete(request.token, Ok::<_, ApiError>(holdings));
                Ok(completion)
            }
            Err(failure) => {
                warn!(
                    component = "holdings_13f",
                    event = "holdings.load_failed",
                    ticker = %request.ticker,
                    error = %failure
                );
                let page = PageError::Api {
                    message: String::from("Failed to fetch holdings"),
                    source: failure,
                };
                self.holdings.complete(request.token, Err::<Vec<Holding13F>, _>(&page));
                self.error = Some(page.to_string());
                Err(page)
            }
        }
    }

    /// Ask the backend to re-ingest filings for the selected quarter.
    pub async fn update_data(&mut self, api: &UniverseApi) -> Result<serde_json::Value, PageError> {
        self.error = None;
        self.success = None;

        match api
            .update_13f_data(self.selected_quarter.as_deref(), true)
            .await
        {
            Ok(summary) => {
                info!(
                    component = "holdings_13f",
                    event = "filings.updated",
                    quarter = self.selected_quarter.as_deref().unwrap_or("latest")
                );
                self.success = Some(String::from("13F data updated successfully"));
                Ok(summary)
            }
            Err(failure) => {
                error!(
                    component = "holdings_13f",
                    event = "filings.update_failed",
                    code = failure.code(),
                    error = %failure
                );
                let page = PageError::Api {
                    message: String::from("Failed to update 13F data"),
                    source: failure,
                };
                self.error = Some(page.to_string());
                Err(page)
            }
        }
    }
}
