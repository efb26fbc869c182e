//! Read-only view of one universe plus its short-interest chart.

use serde::Serialize;
use tracing::warn;

use crate::api::{ApiError, UniverseApi};
use crate::domain::{DateRange, ShortInterestChart, ShortInterestSeries, Ticker, Universe};
use crate::loader::{Completion, LoadSlot, Loadable, RequestToken};
use crate::navigation::Route;

const NOT_AVAILABLE: &str = "N/A";

/// Text fields shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniverseSummary {
    pub name: String,
    pub id: String,
    pub date_range: String,
    pub tickers: String,
    pub measurement_period: String,
}

impl UniverseSummary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("name: {}", self.name),
            format!("id: {}", self.id),
            format!("Date range: {}", self.date_range),
            format!("tickers: {}", self.tickers),
            format!("measurement period: {}", self.measurement_period),
        ]
    }
}

/// Inputs captured when a chart load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub token: RequestToken,
    pub tickers: Vec<Ticker>,
    pub range: DateRange,
}

#[derive(Debug, Default)]
pub struct UniverseDetailView {
    universe: Option<Universe>,
    chart: LoadSlot<ShortInterestChart>,
}

impl UniverseDetailView {
    /// Build the view from whatever record navigation handed forward.
    pub fn new(universe: Option<Universe>) -> Self {
        Self {
            universe,
            chart: LoadSlot::new(),
        }
    }

    pub fn from_route(route: &Route) -> Self {
        Self::new(route.universe().cloned())
    }

    pub fn universe(&self) -> Option<&Universe> {
        self.universe.as_ref()
    }

    pub fn summary(&self) -> UniverseSummary {
        match &self.universe {
            Some(universe) => UniverseSummary {
                name: universe.name.clone(),
                id: universe.id.to_string(),
                date_range: universe.date_range.to_string(),
                tickers: universe
                    .tickers
                    .iter()
                    .map(Ticker::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                measurement_period: universe.measurement_period.to_string(),
            },
            None => UniverseSummary {
                name: NOT_AVAILABLE.to_owned(),
                id: NOT_AVAILABLE.to_owned(),
                date_range: NOT_AVAILABLE.to_owned(),
                tickers: NOT_AVAILABLE.to_owned(),
                measurement_period: NOT_AVAILABLE.to_owned(),
            },
        }
    }

    /// Fetch short interest for the record's tickers over its date range.
    ///
    /// Returns `None` when there is no record, or no tickers, so nothing is requested.
    pub async fn load_chart(&mut self, api: &UniverseApi) -> Option<Completion> {
        let request = self.begin_chart()?;
        let result = api.short_interest(&request.tickers, request.range).await;
        Some(self.finish_chart(request.token, result))
    }

    /// Start a chart load for the held record, if it has tickers.
    pub fn begin_chart(&mut self) -> Option<ChartRequest> {
        let universe = self.universe.as_ref().filter(|u| !u.tickers.is_empty())?;
        let tickers = universe.tickers.clone();
        let range = universe.date_range;
        Some(ChartRequest {
            token: self.chart.begin(),
            tickers,
            range,
        })
    }

    pub fn finish_chart(
        &mut self,
        token: RequestToken,
        result: Result<ShortInterestSeries, ApiError>,
    ) -> Completion {
        if let Err(error) = &result {
            warn!(
                component = "universe_detail",
                event = "short_interest.load_failed",
                token = %token,
                error = %error
            );
        }
        self.chart.complete(token, result.map(|series| series.to_chart()))
    }

    pub fn cancel(&mut self) {
        self.chart.cancel();
    }

    pub fn chart_state(&self) -> &Loadable<ShortInterestChart> {
        self.chart.state()
    }

    pub fn chart(&self) -> Option<&ShortInterestChart> {
        self.chart.value()
    }

    /// The Edit action. Requires a record to seed the form.
    pub fn edit(&self) -> Option<Route> {
        self.universe.clone().map(Route::EditUniverse)
    }
}
