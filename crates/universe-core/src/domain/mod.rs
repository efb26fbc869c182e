//! # Domain Models
//!
//! Canonical types for universes and the analytics attached to them.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Universe`] | Saved universe as read from the backend |
//! | [`UniversePayload`] | Create/edit request body |
//! | [`UniverseId`] | Server-assigned identifier |
//! | [`Ticker`] | Validated ticker symbol |
//! | [`DateRange`] | Inclusive `begin <= end` calendar range |
//! | [`MeasurementPeriod`] | Backend-defined period, default 4 |
//! | [`ShortInterestSeries`] | Short interest keyed by ticker |
//! | [`VolatilityReport`] / [`CorrelationReport`] | Single-symbol analytics |
//! | [`Holding13F`] | Institutional holder line |
//!
//! All constructors validate their invariants and return
//! [`ValidationError`](crate::ValidationError) on failure.

mod analytics;
mod date_range;
mod ticker;
mod universe;

pub use analytics::{
    ChartRow, CorrelationReport, Holding13F, ShortInterestChart, ShortInterestPoint,
    ShortInterestSeries, VolatilityReport,
};
pub use date_range::{format_date, parse_date, DateRange};
pub use ticker::{join_tickers, split_list, Ticker};
pub use universe::{
    dedup_preserving_order, MeasurementPeriod, Universe, UniverseId, UniversePayload,
};
