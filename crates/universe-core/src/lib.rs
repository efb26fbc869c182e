//! # Universe Core
//!
//! Domain model, backend client, and view state for the universe admin
//! console.
//!
//! ## Overview
//!
//! A *universe* is a named, saved set of stock tickers with a date range and
//! a measurement period. This crate provides:
//!
//! - **Validated domain types** for universes, tickers, and date ranges
//! - **Typed API client** over a pluggable HTTP transport
//! - **View controllers** for the universe form, list, and detail pages
//! - **Analysis pages** for volatility, correlation, and 13F holdings
//! - **Navigation shell** mapping menu entries onto routes
//! - **Offline fake backend** for tests and demos
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | Stock volatility/correlation page |
//! | [`api`] | Backend client and API errors |
//! | [`config`] | Base URL and timeout configuration |
//! | [`detail_view`] | Single-universe page with short-interest chart |
//! | [`domain`] | Universe, ticker, date range, analytics records |
//! | [`envelope`] | Machine-readable output envelope |
//! | [`error`] | Core error types |
//! | [`fake_backend`] | In-memory backend implementing [`HttpClient`] |
//! | [`form`] | Create/edit form reducer and submit |
//! | [`holdings`] | 13F holdings page |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`list_view`] | Universe table with sort, select, delete |
//! | [`loader`] | Load slots with stale-result discard |
//! | [`navigation`] | Routes, menu, back stack |
//! | [`observability`] | Logging setup |
//! | [`selectors`] | Ticker and measurement period pickers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use universe_core::{ApiConfig, UniverseApi, UniverseListView};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = UniverseApi::new(ApiConfig::from_env()?);
//!     let mut list = UniverseListView::new();
//!     list.load(&api).await;
//!
//!     for row in list.rows() {
//!         println!("{row:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ CLI / UI runtime │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Views & Form     │────▶│ LoadSlot tokens  │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ UniverseApi      │────▶│ HttpClient       │
//! │                  │     │ (reqwest/fake)   │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Domain Models    │
//! └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Nothing in this crate is fatal. Failures surface as typed errors and as
//! operator-visible text on the view that issued the request:
//!
//! ```rust
//! use universe_core::{ApiError, ApiErrorKind};
//!
//! fn describe(error: &ApiError) -> &'static str {
//!     match error.kind() {
//!         ApiErrorKind::Transport => "backend unreachable",
//!         ApiErrorKind::Status if error.is_not_found() => "not found",
//!         ApiErrorKind::Status => "backend rejected the request",
//!         ApiErrorKind::Decode => "unexpected response shape",
//!         ApiErrorKind::InvalidRequest => "request could not be built",
//!     }
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod detail_view;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fake_backend;
pub mod form;
pub mod holdings;
pub mod http_client;
pub mod list_view;
pub mod loader;
pub mod navigation;
pub mod observability;
pub mod selectors;

#[cfg(test)]
mod test_env;

// Analysis pages
pub use analysis::{CorrelationRequest, PageError, StockAnalysisView, VolatilityRequest};
pub use holdings::{quarter_options, Holdings13FView, HoldingsRequest};

// API client
pub use api::{ApiError, ApiErrorKind, TickerListing, UniverseApi};

// Configuration
pub use config::{ApiConfig, ConfigError};

// Domain models
pub use domain::{
    format_date, join_tickers, parse_date, split_list, ChartRow, CorrelationReport, DateRange,
    Holding13F, MeasurementPeriod, ShortInterestChart, ShortInterestPoint, ShortInterestSeries,
    Ticker, Universe, UniversePayload, UniverseId, VolatilityReport,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::ValidationError;

// Offline backend
pub use fake_backend::FakeBackend;

// Form
pub use form::{
    reduce, FieldValue, FormAction, FormMode, FormState, FormValidationError, SubmitOutcome,
    UniverseForm,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Views
pub use detail_view::{ChartRequest, UniverseDetailView, UniverseSummary};
pub use list_view::{DeleteOutcome, ListRow, SortDirection, UniverseListView};
pub use loader::{Completion, LoadSlot, Loadable, RequestToken};
pub use navigation::{MenuItem, NavigationShell, Route};
pub use selectors::{ticker_options, MeasurementPeriodSelector, SelectionError, TickerSelector};

// Logging
pub use observability::{init_logging, logging_config_from_env, LogFormat, LoggingConfig};
