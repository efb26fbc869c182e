use serde_json::json;
use universe_core::{Loadable, UniverseDetailView, UniverseId};

use super::list::{self, page_error};
use super::{CommandResult, Context};
use crate::cli::ShowArgs;
use crate::error::CliError;

pub async fn run(args: &ShowArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let list_view = list::load(ctx).await;
    if list_view.page_error().is_some() {
        return page_error(CommandResult::ok(json!({ "lines": [] })), &list_view);
    }

    let Some(route) = list_view.open(UniverseId::new(args.id)) else {
        return Err(CliError::UnknownUniverse(args.id));
    };

    let mut detail = UniverseDetailView::from_route(&route);
    if args.chart {
        if let Some(request) = detail.begin_chart() {
            let result = ctx.api.short_interest(&request.tickers, request.range).await;
            detail.finish_chart(request.token, result);
        }
    }

    let summary = detail.summary();
    let mut lines = summary.lines();
    if let Some(chart) = detail.chart() {
        lines.push(format!("short interest: {}", chart.series.join(", ")));
        for row in &chart.rows {
            let values: Vec<String> = row
                .values
                .iter()
                .map(|(ticker, value)| format!("{ticker}={value}"))
                .collect();
            lines.push(format!("  {}  {}", row.date, values.join("  ")));
        }
    }

    let result = CommandResult::ok(json!({
        "route": route.path(),
        "edit_route": detail.edit().map(|edit| edit.path()),
        "summary": summary,
        "chart": detail.chart(),
        "lines": lines,
    }));

    match detail.chart_state() {
        Loadable::Failed(message) => result.with_error(
            "short_interest.load_failed",
            &format!("Failed to fetch short interest: {message}"),
            Some(true),
        ),
        _ => Ok(result),
    }
}
