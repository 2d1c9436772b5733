//! `heatly provision`: resolve serial numbers and submit one batch.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use heatly_core::Platform;

use crate::cli::{GlobalOpts, OutputFormat, ProvisionArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    platform: &Platform,
    args: ProvisionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut serials = args.serials;
    if let Some(ref path) = args.file {
        serials.extend(util::read_serial_file(path)?);
    }
    info!(count = serials.len(), "provisioning batch");

    // Ctrl-C stops new lookups; the run then reports what it resolved.
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, finishing in-flight lookups");
                cancel.cancel();
            }
        }
    });

    let spinner = spinner(global, serials.len());
    let outcome = platform
        .resolve_and_provision_until(&serials, &cancel)
        .await;
    watcher.abort();
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    util::finish_outcome(&outcome, global)
}

/// Spinner on stderr, only for interactive table output.
fn spinner(global: &GlobalOpts, count: usize) -> Option<ProgressBar> {
    if global.quiet
        || !matches!(global.format(), OutputFormat::Table)
        || !std::io::stderr().is_terminal()
        || count == 0
    {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(format!("resolving {count} serial numbers"));
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}
