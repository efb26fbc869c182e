use serde_json::json;
use universe_core::NavigationShell;

use super::CommandResult;
use crate::cli::MenuArgs;
use crate::error::CliError;

pub fn run(args: &MenuArgs) -> Result<CommandResult, CliError> {
    let mut shell = NavigationShell::new();
    if let Some(path) = &args.path {
        if !shell.open_path(path) {
            return Err(CliError::Rejected(format!(
                "'{path}' is not a menu page; open universes from the list"
            )));
        }
    }

    let menu = shell.menu();
    let lines: Vec<String> = menu
        .iter()
        .map(|(label, active)| format!("{} {label}", if *active { ">" } else { " " }))
        .collect();
    let items: Vec<_> = menu
        .iter()
        .map(|(label, active)| json!({ "label": label, "active": active }))
        .collect();

    Ok(CommandResult::ok(json!({
        "current": shell.current().path(),
        "menu": items,
        "lines": lines,
    })))
}
