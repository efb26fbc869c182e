use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{DateRange, Ticker, ValidationError};

/// Server-assigned universe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniverseId(u64);

impl UniverseId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for UniverseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UniverseId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Measurement period drawn from the backend's allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct MeasurementPeriod(u32);

impl MeasurementPeriod {
    pub const DEFAULT: Self = Self(4);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 || value > i64::from(u32::MAX) {
            return Err(ValidationError::InvalidMeasurementPeriod { value });
        }
        Ok(Self(value as u32))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for MeasurementPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for MeasurementPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for MeasurementPeriod {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MeasurementPeriod> for u32 {
    fn from(value: MeasurementPeriod) -> Self {
        value.0
    }
}

/// A saved universe as read back from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub id: UniverseId,
    pub name: String,
    pub tickers: Vec<Ticker>,
    pub date_range: DateRange,
    #[serde(default)]
    pub measurement_period: MeasurementPeriod,
}

impl Universe {
    pub fn new(
        id: UniverseId,
        name: impl Into<String>,
        tickers: Vec<Ticker>,
        date_range: DateRange,
        measurement_period: MeasurementPeriod,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyUniverseName);
        }

        Ok(Self {
            id,
            name,
            tickers: dedup_preserving_order(tickers),
            date_range,
            measurement_period,
        })
    }
}

/// Write payload for create and edit requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversePayload {
    pub name: String,
    pub tickers: Vec<Ticker>,
    /// Literal `[YYYY-MM-DD, YYYY-MM-DD]` text.
    pub date_range: String,
    pub measurement_period: MeasurementPeriod,
}

impl UniversePayload {
    pub fn new(
        name: impl Into<String>,
        tickers: Vec<Ticker>,
        date_range: DateRange,
        measurement_period: MeasurementPeriod,
    ) -> Self {
        Self {
            name: name.into(),
            tickers,
            date_range: date_range.to_wire_text(),
            measurement_period,
        }
    }

    /// Rebuild the record the backend would return for this payload.
    pub fn into_universe(self, id: UniverseId) -> Result<Universe, ValidationError> {
        let date_range = DateRange::parse_wire_text(&self.date_range)?;
        Universe::new(id, self.name, self.tickers, date_range, self.measurement_period)
    }
}

/// Drop repeated tickers while keeping first-seen order.
pub fn dedup_preserving_order(tickers: Vec<Ticker>) -> Vec<Ticker> {
    let mut unique: Vec<Ticker> = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        if !unique.contains(&ticker) {
            unique.push(ticker);
        }
    }
    unique
}
