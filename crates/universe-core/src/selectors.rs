//! Option widgets feeding the universe form.
//!
//! Both selectors fetch their option list once and hold nothing else. The
//! selected value is owned by the parent form and written through a
//! caller-supplied setter.

use thiserror::Error;
use tracing::warn;

use crate::api::{ApiError, TickerListing, UniverseApi};
use crate::domain::{split_list, MeasurementPeriod, Ticker};
use crate::loader::{Completion, LoadSlot, Loadable, RequestToken};
use crate::ValidationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{value}' is not one of the available options")]
    UnknownOption { value: String },
}

/// Multi-select over the backend's ticker list, sorted lexicographically.
#[derive(Debug, Default)]
pub struct TickerSelector {
    options: LoadSlot<Vec<Ticker>>,
}

impl TickerSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &UniverseApi) -> Completion {
        let token = self.begin_load();
        let result = api.tickers().await.map(ticker_options);
        self.finish(token, result)
    }

    /// Apply a result for `token`. Results for stale tokens are dropped.
    pub fn finish<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Ticker>, E>,
    ) -> Completion {
        if let Err(error) = &result {
            warn!(
                component = "ticker_selector",
                event = "options.load_failed",
                token = %token,
                error = %error
            );
        }
        self.options.complete(token, result)
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.options.begin()
    }

    pub fn cancel(&mut self) {
        self.options.cancel();
    }

    pub fn state(&self) -> &Loadable<Vec<Ticker>> {
        self.options.state()
    }

    pub fn options(&self) -> &[Ticker] {
        self.options.value().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Turn typed text into tickers. Entries naming a loaded option resolve to
    /// it as listed; anything else must pass [`Ticker::parse`].
    pub fn resolve_list(&self, input: &str) -> Result<Vec<Ticker>, ValidationError> {
        split_list(input)
            .map(|entry| {
                let listed = Ticker::from_backend(entry)?;
                if self.options().contains(&listed) {
                    Ok(listed)
                } else {
                    Ticker::parse(entry)
                }
            })
            .collect()
    }

    /// Replace the selection and hand it to `set`.
    ///
    /// Once options are loaded, every selected ticker must be one of them.
    pub fn select(
        &self,
        selected: Vec<Ticker>,
        set: impl FnOnce(Vec<Ticker>),
    ) -> Result<(), SelectionError> {
        if let Some(options) = self.options.value() {
            if let Some(unknown) = selected.iter().find(|t| !options.contains(t)) {
                return Err(SelectionError::UnknownOption {
                    value: unknown.to_string(),
                });
            }
        }
        set(selected);
        Ok(())
    }

    /// Add or remove `ticker` from `current` and hand the result to `set`.
    pub fn toggle(
        &self,
        current: &[Ticker],
        ticker: Ticker,
        set: impl FnOnce(Vec<Ticker>),
    ) -> Result<(), SelectionError> {
        let mut next = current.to_vec();
        if let Some(position) = next.iter().position(|t| *t == ticker) {
            next.remove(position);
        } else {
            next.push(ticker);
        }
        self.select(next, set)
    }
}

/// Sorted, de-duplicated option list from the `/tickers` listing.
///
/// Stored symbols are kept even when they fall outside the operator input
/// grammar; only blank entries are skipped.
pub fn ticker_options(listings: Vec<TickerListing>) -> Vec<Ticker> {
    let mut tickers: Vec<Ticker> = listings
        .into_iter()
        .filter_map(|listing| match Ticker::from_backend(&listing.ticker) {
            Ok(ticker) => Some(ticker),
            Err(error) => {
                warn!(
                    component = "ticker_selector",
                    event = "option.skipped",
                    error = %error
                );
                None
            }
        })
        .collect();
    tickers.sort();
    tickers.dedup();
    tickers
}

/// Single-select over the backend's allowed measurement periods.
#[derive(Debug, Default)]
pub struct MeasurementPeriodSelector {
    options: LoadSlot<Vec<MeasurementPeriod>>,
}

impl MeasurementPeriodSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &UniverseApi) -> Completion {
        let token = self.begin_load();
        let result = api.measurement_periods().await;
        self.finish(token, result)
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.options.begin()
    }

    /// Apply a result for `token`. Results for stale tokens are dropped.
    pub fn finish(
        &mut self,
        token: RequestToken,
        result: Result<Vec<MeasurementPeriod>, ApiError>,
    ) -> Completion {
        if let Err(error) = &result {
            warn!(
                component = "measurement_period_selector",
                event = "options.load_failed",
                token = %token,
                error = %error
            );
        }
        self.options.complete(token, result)
    }

    pub fn cancel(&mut self) {
        self.options.cancel();
    }

    pub fn state(&self) -> &Loadable<Vec<MeasurementPeriod>> {
        self.options.state()
    }

    /// Options in backend order.
    pub fn options(&self) -> &[MeasurementPeriod] {
        self.options.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn select(
        &self,
        period: MeasurementPeriod,
        set: impl FnOnce(MeasurementPeriod),
    ) -> Result<(), SelectionError> {
        if let Some(options) = self.options.value() {
            if !options.contains(&period) {
                return Err(SelectionError::UnknownOption {
                    value: period.to_string(),
                });
            }
        }
        set(period);
        Ok(())
    }
}
