use serde_json::json;
use universe_core::{ticker_options, Loadable, MeasurementPeriodSelector, TickerSelector};

use super::{CommandResult, Context};
use crate::error::CliError;

pub async fn tickers(ctx: &Context) -> Result<CommandResult, CliError> {
    let selector = ticker_selector(ctx).await;

    let result = CommandResult::ok(json!({ "tickers": selector.options() }));
    match selector.state() {
        Loadable::Failed(message) => result.with_error(
            "tickers.load_failed",
            &format!("Failed to fetch tickers: {message}"),
            Some(true),
        ),
        _ => Ok(result),
    }
}

pub async fn periods(ctx: &Context) -> Result<CommandResult, CliError> {
    let selector = period_selector(ctx).await;

    let result = CommandResult::ok(json!({ "measurement_periods": selector.options() }));
    match selector.state() {
        Loadable::Failed(message) => result.with_error(
            "periods.load_failed",
            &format!("Failed to fetch measurement periods: {message}"),
            Some(true),
        ),
        _ => Ok(result),
    }
}

pub(super) async fn ticker_selector(ctx: &Context) -> TickerSelector {
    let mut selector = TickerSelector::new();
    let token = selector.begin_load();
    let result = ctx.api.tickers().await.map(ticker_options);
    selector.finish(token, result);
    selector
}

pub(super) async fn period_selector(ctx: &Context) -> MeasurementPeriodSelector {
    let mut selector = MeasurementPeriodSelector::new();
    let token = selector.begin_load();
    let result = ctx.api.measurement_periods().await;
    selector.finish(token, result);
    selector
}
