use serde_json::json;
use universe_core::DateRange;

use super::{parse_tickers, CommandResult, Context};
use crate::cli::ShortInterestArgs;
use crate::error::CliError;

pub async fn run(args: &ShortInterestArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let tickers = parse_tickers(&args.tickers)?;
    let range = DateRange::parse(&args.begin, &args.end)?;

    match ctx.api.short_interest(&tickers, range).await {
        Ok(series) => {
            let chart = series.to_chart();
            Ok(CommandResult::ok(json!({
                "series": chart.series,
                "rows": chart
                    .rows
                    .iter()
                    .map(|row| {
                        let mut cells = serde_json::Map::new();
                        cells.insert(String::from("date"), json!(row.date));
                        for (ticker, value) in &row.values {
                            cells.insert(ticker.clone(), json!(value));
                        }
                        serde_json::Value::Object(cells)
                    })
                    .collect::<Vec<_>>(),
            })))
        }
        Err(error) => CommandResult::ok(json!({ "series": [], "rows": [] })).with_api_error(
            &format!("Failed to fetch short interest: {error}"),
            &error,
        ),
    }
}
