//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use heatly_core::{DeviceResolution, Scalar, WorkflowOutcome};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since detail views don't use the
/// `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Table cell for a raw platform column; absent and null are blank.
pub fn cell(value: Option<&Scalar>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

// ── Workflow outcomes ────────────────────────────────────────────────

#[derive(Tabled)]
struct ResolutionRow {
    #[tabled(rename = "Serial")]
    serial_no: String,
    #[tabled(rename = "GUID")]
    guid: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&DeviceResolution> for ResolutionRow {
    fn from(d: &DeviceResolution) -> Self {
        Self {
            serial_no: d.serial_no.clone(),
            guid: d.guid.clone().unwrap_or_default(),
            status: match d.reason {
                Some(reason) => reason.to_string(),
                None => "resolved".into(),
            },
        }
    }
}

/// Render a workflow outcome.
///
/// Structured formats serialize the whole outcome, audit payloads included.
/// Table shows a status line plus the per-device resolution table.
pub fn render_outcome(format: &OutputFormat, outcome: &WorkflowOutcome) -> Result<String, CliError> {
    render_single(format, outcome, outcome_detail, |o| o.kind.to_string())
}

fn outcome_detail(outcome: &WorkflowOutcome) -> String {
    let status = if outcome.success {
        paint(&outcome.kind.to_string(), Paint::Success)
    } else {
        paint(&outcome.kind.to_string(), Paint::Failure)
    };

    let mut out = format!("{status}: {}", outcome.message);
    let devices = outcome.devices();
    if !devices.is_empty() {
        let rows: Vec<ResolutionRow> = devices.iter().map(ResolutionRow::from).collect();
        out.push('\n');
        out.push_str(&render_table(&rows));
    }
    out
}

// ── Color ────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Paint {
    Success,
    Failure,
}

/// Color only when stdout is a terminal and `NO_COLOR` is unset.
fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn paint(text: &str, paint: Paint) -> String {
    if !should_color() {
        return text.to_owned();
    }
    match paint {
        Paint::Success => text.green().bold().to_string(),
        Paint::Failure => text.red().bold().to_string(),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use heatly_core::{OutcomeDetail, OutcomeKind, UnresolvedReason};

    use super::*;

    fn partial() -> WorkflowOutcome {
        WorkflowOutcome::new(
            OutcomeKind::PartiallySucceeded,
            "provisioned 1 devices; 1 unresolved: [25012509]",
            None,
            OutcomeDetail::Devices(vec![
                DeviceResolution::resolved("25012508", "g-1"),
                DeviceResolution::unresolved("25012509", UnresolvedReason::NotFound),
            ]),
        )
    }

    #[test]
    fn outcome_table_lists_every_device() {
        let out = render_outcome(&OutputFormat::Table, &partial()).unwrap();
        assert!(out.contains("partially_succeeded"));
        assert!(out.contains("25012508"));
        assert!(out.contains("not found"));
    }

    #[test]
    fn outcome_json_keeps_wire_keys() {
        let out = render_outcome(&OutputFormat::JsonCompact, &partial()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["device_info"][1]["found"], false);
    }

    #[test]
    fn cells_show_columns_as_sent() {
        assert_eq!(cell(Some(&Scalar::from("03"))), "03");
        assert_eq!(cell(Some(&Scalar::from(1_i64))), "1");
        assert_eq!(cell(Some(&Scalar::from(serde_json::Value::Null))), "");
        assert_eq!(cell(None), "");
    }

    #[test]
    fn plain_outcome_is_the_kind() {
        let out = render_outcome(&OutputFormat::Plain, &partial()).unwrap();
        assert_eq!(out, "partially_succeeded");
    }
}
