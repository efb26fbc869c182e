use serde_json::json;
use universe_core::{Holdings13FView, Ticker};

use super::{CommandResult, Context};
use crate::cli::{HoldingsArgs, Update13fArgs};
use crate::error::CliError;

pub async fn view(args: &HoldingsArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut view = Holdings13FView::new(ctx.today);
    select_quarter(&mut view, args.quarter.as_deref())?;
    view.select_ticker(Some(Ticker::parse(&args.ticker)?));

    let request = match view.begin_holdings() {
        Ok(request) => request,
        Err(error) => return CommandResult::ok(json!({})).with_page_error(error),
    };
    let result = ctx
        .api
        .holdings(&request.ticker, request.quarter.as_deref())
        .await;

    match view.finish_holdings(&request, result) {
        Ok(_) => Ok(CommandResult::ok(json!({
            "ticker": request.ticker,
            "quarter": view.selected_quarter(),
            "quarters": view.quarters(),
            "rows": view.holdings(),
        }))),
        Err(error) => CommandResult::ok(json!({ "quarters": view.quarters() }))
            .with_page_error(error),
    }
}

pub async fn update(args: &Update13fArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut view = Holdings13FView::new(ctx.today);
    select_quarter(&mut view, args.quarter.as_deref())?;

    match view.update_data(&ctx.api).await {
        Ok(result) => Ok(CommandResult::ok(json!({
            "message": view.success(),
            "quarter": view.selected_quarter(),
            "result": result,
        }))),
        Err(error) => CommandResult::ok(json!({})).with_page_error(error),
    }
}

fn select_quarter(view: &mut Holdings13FView, quarter: Option<&str>) -> Result<(), CliError> {
    view.select_quarter(quarter)
        .map_err(|error| CliError::Rejected(error.to_string()))
}
