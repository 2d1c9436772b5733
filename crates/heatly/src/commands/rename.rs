//! `heatly rename`: change a valve's serial number in place.

use tracing::info;

use heatly_core::Platform;

use crate::cli::{GlobalOpts, RenameArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    platform: &Platform,
    args: RenameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let RenameArgs {
        serial,
        address,
        new_serial,
    } = args;

    if !util::confirm(
        "rename",
        &format!("Rename valve '{serial}' at '{address}' to '{new_serial}'?"),
        global.yes,
    )? {
        if !global.quiet {
            eprintln!("Rename cancelled");
        }
        return Ok(());
    }

    info!(%serial, %address, %new_serial, "renaming valve");
    let outcome = platform.rename_device(&serial, &address, &new_serial).await;
    util::finish_outcome(&outcome, global)
}
