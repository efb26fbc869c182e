use serde_json::json;
use universe_core::{DeleteOutcome, UniverseId};

use super::list::{self, page_error};
use super::{CommandResult, Context};
use crate::cli::DeleteArgs;
use crate::error::CliError;

pub async fn run(args: &DeleteArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut view = list::load(ctx).await;
    if view.page_error().is_some() {
        return page_error(CommandResult::ok(json!({ "deleted": [] })), &view);
    }

    let known = view.ids();
    let mut warnings = Vec::new();
    for raw in &args.ids {
        let id = UniverseId::new(*raw);
        if !known.contains(&id) {
            warnings.push(format!("universe {raw} not found; skipped"));
        } else if !view.is_selected(id) {
            view.toggle_selected(id);
        }
    }

    match view.delete_selected(&ctx.api).await {
        DeleteOutcome::NothingSelected => Err(CliError::Rejected(String::from(
            "none of the given universe ids exist",
        ))),
        DeleteOutcome::Deleted(ids) => Ok(CommandResult::ok(json!({
            "deleted": ids,
            "rows": view.rows(),
        }))
        .with_warnings(warnings)),
        DeleteOutcome::Failed(error) => {
            let message = view
                .page_error()
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string());
            CommandResult::ok(json!({ "deleted": [] }))
                .with_warnings(warnings)
                .with_api_error(&message, &error)
        }
    }
}
