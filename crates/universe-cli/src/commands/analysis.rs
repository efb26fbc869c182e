use serde_json::json;
use universe_core::{parse_date, StockAnalysisView, Ticker};

use super::{CommandResult, Context};
use crate::cli::{CorrelationArgs, DateWindow, UpdateStocksArgs, VolatilityArgs};
use crate::error::CliError;

pub async fn volatility(args: &VolatilityArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut view = StockAnalysisView::new(ctx.today);
    view.select_stock(Some(Ticker::parse(&args.symbol)?));
    apply_window(&mut view, &args.window)?;

    let request = match view.begin_volatility() {
        Ok(request) => request,
        Err(error) => return CommandResult::ok(json!({})).with_page_error(error),
    };
    let result = ctx
        .api
        .volatility(&request.symbol, request.range.begin(), request.range.end())
        .await;
    if let Err(error) = view.finish_volatility(&request, result) {
        return CommandResult::ok(json!({})).with_page_error(error);
    }

    match view.volatility().value() {
        Some(report) => Ok(CommandResult::ok(json!({
            "stock_symbol": report.stock_symbol,
            "start_date": report.start_date,
            "end_date": report.end_date,
            "daily_volatility": report.daily_volatility,
            "mean_daily_return": report.mean_daily_return,
            "min_daily_return": report.min_daily_return,
            "max_daily_return": report.max_daily_return,
            "trading_days": report.trading_days,
        }))),
        None => Ok(CommandResult::ok(json!({}))),
    }
}

pub async fn correlation(
    args: &CorrelationArgs,
    ctx: &Context,
) -> Result<CommandResult, CliError> {
    let mut view = StockAnalysisView::new(ctx.today);
    view.select_stock(Some(Ticker::parse(&args.symbol)?));
    view.set_index(Ticker::parse(&args.index)?);
    apply_window(&mut view, &args.window)?;

    let request = match view.begin_correlation() {
        Ok(request) => request,
        Err(error) => return CommandResult::ok(json!({})).with_page_error(error),
    };
    let result = ctx
        .api
        .correlation(
            &request.symbol,
            &request.index,
            request.range.begin(),
            request.range.end(),
        )
        .await;
    if let Err(error) = view.finish_correlation(&request, result) {
        return CommandResult::ok(json!({})).with_page_error(error);
    }

    match view.correlation().value() {
        Some(report) => Ok(CommandResult::ok(json!({
            "stock_symbol": report.stock_symbol,
            "index": report.index,
            "start_date": report.start_date,
            "end_date": report.end_date,
            "correlation": report.correlation,
            "beta": report.beta,
            "trading_days": report.trading_days,
        }))),
        None => Ok(CommandResult::ok(json!({}))),
    }
}

/// Refresh stock history, or with `--index-only` refresh the index and confirm it landed.
pub async fn update_stocks(
    args: &UpdateStocksArgs,
    ctx: &Context,
) -> Result<CommandResult, CliError> {
    let mut view = StockAnalysisView::new(ctx.today);
    view.set_index(Ticker::parse(&args.index)?);
    view.set_update_days(args.days);

    if args.index_only {
        if let Err(error) = view.update_index(&ctx.api).await {
            return CommandResult::ok(json!({})).with_page_error(error);
        }
        let updated = view.success().map(str::to_owned);
        return match view.check_index(&ctx.api).await {
            Ok(trading_days) => Ok(CommandResult::ok(json!({
                "message": updated,
                "trading_days": trading_days,
                "lines": [updated, view.success()],
            }))),
            Err(error) => CommandResult::ok(json!({ "message": updated })).with_page_error(error),
        };
    }

    view.set_stock_input(args.symbols.as_str());
    match view.update_stocks(&ctx.api).await {
        Ok(_) => Ok(CommandResult::ok(json!({
            "message": view.success(),
            "tickers": view.ticker_options(),
        }))),
        Err(error) => CommandResult::ok(json!({})).with_page_error(error),
    }
}

fn apply_window(view: &mut StockAnalysisView, window: &DateWindow) -> Result<(), CliError> {
    let (default_start, default_end) = view.dates();
    let start = match &window.start {
        Some(raw) => parse_date(raw)?,
        None => default_start,
    };
    let end = match &window.end {
        Some(raw) => parse_date(raw)?,
        None => default_end,
    };
    view.set_dates(start, end);
    Ok(())
}
