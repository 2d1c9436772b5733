//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use heatly_core::WorkflowOutcome;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is required.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Serial numbers from a file: one per line, blank lines and `#` comments
/// skipped, surrounding whitespace trimmed.
pub fn read_serial_file(path: &Path) -> Result<Vec<String>, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })?;
    Ok(parse_serial_lines(&contents))
}

fn parse_serial_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Print a workflow outcome and turn a failed one into the matching error.
pub fn finish_outcome(outcome: &WorkflowOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_outcome(global.format(), outcome)?;
    output::print_output(&out, global.quiet);

    if outcome.success {
        Ok(())
    } else {
        Err(CliError::from_outcome(outcome.kind, outcome.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_file_skips_blanks_and_comments() {
        let parsed = parse_serial_lines("# west block\n25012508\n\n  25012509  \n#25012510\n");
        assert_eq!(parsed, vec!["25012508", "25012509"]);
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(matches!(confirm("rename", "Proceed?", true), Ok(true)));
    }
}
