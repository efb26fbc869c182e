use serde_json::json;
use universe_core::{
    parse_date, FieldValue, Loadable, MeasurementPeriod, SubmitOutcome, UniverseForm, UniverseId,
};

use super::list::{self, page_error};
use super::options::{period_selector, ticker_selector};
use super::{CommandResult, Context};
use crate::cli::{EditArgs, UniverseFields};
use crate::error::CliError;

pub async fn create(args: &UniverseFields, ctx: &Context) -> Result<CommandResult, CliError> {
    let mut form = UniverseForm::create();
    let warnings = apply_fields(&mut form, args, ctx).await?;
    submit(form, ctx).await.map(|result| result.with_warnings(warnings))
}

pub async fn edit(args: &EditArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let list_view = list::load(ctx).await;
    if list_view.page_error().is_some() {
        return page_error(CommandResult::ok(json!({})), &list_view);
    }

    let id = UniverseId::new(args.id);
    let Some(record) = list_view.universes().iter().find(|universe| universe.id == id) else {
        return Err(CliError::UnknownUniverse(args.id));
    };

    let mut form = UniverseForm::edit(record);
    let warnings = apply_fields(&mut form, &args.fields, ctx).await?;
    submit(form, ctx).await.map(|result| result.with_warnings(warnings))
}

/// Push each provided flag into the draft through the same widgets the form uses.
async fn apply_fields(
    form: &mut UniverseForm,
    fields: &UniverseFields,
    ctx: &Context,
) -> Result<Vec<String>, CliError> {
    let mut warnings = Vec::new();

    if let Some(name) = &fields.name {
        form.set_field(FieldValue::Name(name.clone()));
    }

    if !fields.tickers.is_empty() {
        let selector = ticker_selector(ctx).await;
        if let Loadable::Failed(message) = selector.state() {
            warnings.push(format!("ticker options unavailable: {message}"));
        }
        let mut tickers = Vec::new();
        for value in &fields.tickers {
            tickers.extend(selector.resolve_list(value)?);
        }
        selector
            .select(tickers, |selected| form.set_field(FieldValue::Tickers(selected)))
            .map_err(|error| CliError::Rejected(error.to_string()))?;
    }

    if let Some(begin) = &fields.begin {
        form.set_field(FieldValue::BeginDate(Some(parse_date(begin)?)));
    }
    if let Some(end) = &fields.end {
        form.set_field(FieldValue::EndDate(Some(parse_date(end)?)));
    }

    if let Some(period) = fields.period {
        let period = MeasurementPeriod::new(period)?;
        let selector = period_selector(ctx).await;
        if let Loadable::Failed(message) = selector.state() {
            warnings.push(format!("measurement periods unavailable: {message}"));
        }
        selector
            .select(period, |selected| {
                form.set_field(FieldValue::MeasurementPeriod(selected))
            })
            .map_err(|error| CliError::Rejected(error.to_string()))?;
    }

    Ok(warnings)
}

async fn submit(mut form: UniverseForm, ctx: &Context) -> Result<CommandResult, CliError> {
    match form.submit(&ctx.api).await {
        SubmitOutcome::Rejected(reason) => Err(CliError::Rejected(reason.to_string())),
        SubmitOutcome::Saved(route) => Ok(CommandResult::ok(json!({
            "route": route.path(),
            "universe": route.universe(),
        }))),
        SubmitOutcome::Failed(error) => {
            let message = form.error().unwrap_or(error.message()).to_owned();
            CommandResult::ok(json!({ "name": form.state().name }))
                .with_api_error(&message, &error)
        }
    }
}
