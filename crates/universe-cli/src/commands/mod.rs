mod analysis;
mod delete;
mod form;
mod holdings;
mod list;
mod menu;
mod options;
mod short_interest;
mod show;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use time::{Date, OffsetDateTime};
use tracing::debug;
use universe_core::observability::log_app_start;
use universe_core::{
    ApiConfig, ApiError, DateRange, Envelope, EnvelopeError, FakeBackend, LoggingConfig,
    MeasurementPeriod, PageError, Ticker, Universe, UniverseApi, UniverseId,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Shared inputs for every command.
pub struct Context {
    pub api: UniverseApi,
    pub today: Date,
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(
        mut self,
        code: &str,
        message: &str,
        retryable: Option<bool>,
    ) -> Result<Self, CliError> {
        let mut error = EnvelopeError::new(code, message)?;
        if let Some(retryable) = retryable {
            error = error.with_retryable(retryable);
        }
        self.errors.push(error);
        Ok(self)
    }

    pub fn with_api_error(mut self, message: &str, error: &ApiError) -> Result<Self, CliError> {
        self.errors.push(EnvelopeError::from_api(message, error)?);
        Ok(self)
    }

    /// Map a page action failure: rejected input aborts, API failures go in the envelope.
    pub fn with_page_error(self, error: PageError) -> Result<Self, CliError> {
        match &error {
            PageError::Rejected(message) => Err(CliError::Rejected(message.clone())),
            PageError::Api { message, source } => self.with_api_error(message, source),
        }
    }
}

pub async fn run(cli: &Cli, logging: &LoggingConfig) -> Result<Envelope<Value>, CliError> {
    let config = api_config(cli)?;
    let api = if cli.mock {
        UniverseApi::with_http_client(config.clone(), Arc::new(demo_backend()?))
    } else {
        UniverseApi::new(config.clone())
    };
    log_app_start(logging, &config, cli.mock);

    let context = Context {
        api,
        today: OffsetDateTime::now_utc().date(),
    };

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Tickers => options::tickers(&context).await?,
        Command::Periods => options::periods(&context).await?,
        Command::List(args) => list::run(args, &context).await?,
        Command::Show(args) => show::run(args, &context).await?,
        Command::Create(args) => form::create(args, &context).await?,
        Command::Edit(args) => form::edit(args, &context).await?,
        Command::Delete(args) => delete::run(args, &context).await?,
        Command::ShortInterest(args) => short_interest::run(args, &context).await?,
        Command::Volatility(args) => analysis::volatility(args, &context).await?,
        Command::Correlation(args) => analysis::correlation(args, &context).await?,
        Command::UpdateStocks(args) => analysis::update_stocks(args, &context).await?,
        Command::Holdings(args) => holdings::view(args, &context).await?,
        Command::Update13f(args) => holdings::update(args, &context).await?,
        Command::Menu(args) => menu::run(args)?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(
        component = "universe_cli",
        event = "command.end",
        latency_ms,
        errors = command_result.errors.len()
    );

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let mut metadata = Metadata::new(config.base_url(), cli.mock, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta(SCHEMA_VERSION)?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn api_config(cli: &Cli) -> Result<ApiConfig, CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_base_url(api_url)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        if timeout_ms == 0 {
            return Err(CliError::Rejected(String::from(
                "--timeout-ms must be greater than zero",
            )));
        }
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}

/// Offline backend pre-loaded with one sample universe.
fn demo_backend() -> Result<FakeBackend, CliError> {
    let sample = Universe::new(
        UniverseId::new(1),
        "Mega Caps",
        Ticker::parse_list("AAPL,MSFT,NVDA")?,
        DateRange::parse("2024-01-01", "2024-12-31")?,
        MeasurementPeriod::DEFAULT,
    )?;
    Ok(FakeBackend::with_universes([sample]))
}

/// Parse repeated or comma-joined ticker arguments.
pub fn parse_tickers(raw: &[String]) -> Result<Vec<Ticker>, CliError> {
    let mut tickers = Vec::new();
    for value in raw {
        tickers.extend(Ticker::parse_list(value)?);
    }
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_rejection_aborts_command() {
        let result = CommandResult::ok(Value::Null)
            .with_page_error(PageError::Rejected(String::from("Please select a ticker")));
        assert!(matches!(result, Err(CliError::Rejected(message)) if message == "Please select a ticker"));
    }

    #[test]
    fn api_failure_lands_in_envelope_errors() {
        let error = ApiError::status(503, "HTTP error! status: 503");
        let result = CommandResult::ok(Value::Null)
            .with_api_error("Failed to load universes: HTTP error! status: 503", &error)
            .expect("error should be valid");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "api.status");
        assert_eq!(result.errors[0].retryable, Some(true));
    }

    #[test]
    fn tickers_accept_repeated_and_joined_values() {
        let tickers = parse_tickers(&[String::from("aapl,msft"), String::from("NVDA")])
            .expect("valid tickers");
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }
}
