use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One short-interest observation for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortInterestPoint {
    pub date: String,
    pub short_interest: f64,
}

/// Short interest keyed by ticker, as returned by `/get_short_interest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortInterestSeries {
    #[serde(default)]
    pub short_interest: BTreeMap<String, Vec<ShortInterestPoint>>,
}

/// A chart row: every ticker's value observed on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

/// Short interest regrouped by date for plotting one line per ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortInterestChart {
    pub series: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ShortInterestSeries {
    pub fn to_chart(&self) -> ShortInterestChart {
        let mut by_date: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
        for (ticker, points) in &self.short_interest {
            for point in points {
                by_date
                    .entry(point.date.as_str())
                    .or_default()
                    .insert(ticker.clone(), point.short_interest);
            }
        }

        let series = self
            .short_interest
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(ticker, _)| ticker.clone())
            .collect();
        let rows = by_date
            .into_iter()
            .map(|(date, values)| ChartRow {
                date: date.to_owned(),
                values,
            })
            .collect();

        ShortInterestChart { series, rows }
    }
}

/// Daily-return volatility summary for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    pub stock_symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub daily_volatility: f64,
    pub mean_daily_return: f64,
    pub min_daily_return: f64,
    pub max_daily_return: f64,
    pub trading_days: u32,
    /// Base64 PNG rendered by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

/// Correlation and beta of a symbol against an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub stock_symbol: String,
    pub index: String,
    pub start_date: String,
    pub end_date: String,
    pub correlation: f64,
    pub beta: f64,
    pub trading_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

/// One institutional holder line from a 13F filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding13F {
    pub holder_name: String,
    pub shares: u64,
    pub filing_date: String,
    pub quarter: String,
}
