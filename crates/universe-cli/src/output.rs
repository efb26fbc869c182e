use std::io::{self, Write};

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use universe_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }

    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    let generated_at = envelope
        .meta
        .generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| envelope.meta.generated_at.to_string());
    writeln!(out, "generated_at: {generated_at}")?;
    writeln!(
        out,
        "api         : {}{}",
        envelope.meta.api_url,
        if envelope.meta.offline { " (offline)" } else { "" }
    )?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    for line in table_lines(&envelope.data)? {
        writeln!(out, "  {line}")?;
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Text lines for `data`. `lines` arrays print verbatim, `rows` arrays of
/// objects print as aligned columns, anything else as pretty JSON.
fn table_lines(data: &Value) -> Result<Vec<String>, CliError> {
    if let Some(lines) = data.get("lines").and_then(Value::as_array) {
        return Ok(lines
            .iter()
            .map(|line| line.as_str().map(str::to_owned).unwrap_or_else(|| line.to_string()))
            .collect());
    }

    if let Some(rows) = data.get("rows").and_then(Value::as_array) {
        if let Some(lines) = column_lines(rows) {
            return Ok(lines);
        }
    }

    Ok(serde_json::to_string_pretty(data)?
        .lines()
        .map(str::to_owned)
        .collect())
}

fn column_lines(rows: &[Value]) -> Option<Vec<String>> {
    let first = rows.first()?.as_object()?;
    let columns: Vec<&String> = first.keys().collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| match row.get(column.as_str()) {
                    Some(Value::String(text)) => text.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = vec![format_row(columns.iter().map(|c| c.as_str()).collect())];
    lines.extend(
        cells
            .iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    Some(lines)
}
