//! Command dispatch: bridges CLI args -> platform calls -> output formatting.

pub mod config_cmd;
pub mod equipment;
pub mod meter;
pub mod provision;
pub mod rename;
pub mod util;
pub mod valves;

use heatly_core::Platform;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a platform-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    platform: &Platform,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Provision(args) => provision::handle(platform, args, global).await,
        Command::Rename(args) => rename::handle(platform, args, global).await,
        Command::Valves(args) => valves::handle(platform, args, global).await,
        Command::Equipment(args) => equipment::handle(platform, args, global).await,
        Command::Meter(args) => meter::handle(platform, args, global).await,
        // Handled in `main` before a session is opened.
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "does not need a platform session".into(),
        }),
    }
}
