use serde_json::json;
use universe_core::UniverseListView;

use super::{CommandResult, Context};
use crate::cli::ListArgs;
use crate::error::CliError;

pub async fn run(args: &ListArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut view = load(ctx).await;
    if args.desc {
        view.toggle_sort();
    }

    let result = CommandResult::ok(json!({
        "direction": view.direction(),
        "rows": view.rows(),
    }));
    page_error(result, &view)
}

/// Fetch the collection into a fresh list view.
pub(super) async fn load(ctx: &Context) -> UniverseListView {
    let mut view = UniverseListView::new();
    let token = view.begin_load();
    let result = ctx.api.universes().await;
    view.finish_load(token, result);
    view
}

/// Surface the list page error, if any, as an envelope error.
pub(super) fn page_error(
    result: CommandResult,
    view: &UniverseListView,
) -> Result<CommandResult, CliError> {
    match view.page_error() {
        Some(message) => result.with_error("universes.page_error", message, None),
        None => Ok(result),
    }
}
