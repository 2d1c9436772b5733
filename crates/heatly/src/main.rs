mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use heatly_core::Platform;

use crate::cli::{Cli, Command, GlobalOpts, OutputFormat, ProvisionArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let Cli { global, command } = Cli::parse();

    init_tracing(global.verbose);

    if let Err(err) = run(global, command).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut global: GlobalOpts, command: Command) -> Result<(), CliError> {
    let cfg = heatly_config::load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config file unreadable; using defaults");
        heatly_config::Config::default()
    });

    // `--output` wins over the config file's default.
    if global.output.is_none() {
        global.output = Some(parse_output(&cfg.defaults.output));
    }
    let global = &global;

    match command {
        // Config commands don't need a platform session
        Command::Config(args) => commands::config_cmd::handle(args, global),

        Command::Completions(args) => {
            use clap::CommandFactory;

            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "heatly", &mut std::io::stdout());
            Ok(())
        }

        // Everything else runs inside one scoped session
        cmd => {
            let mut platform_config = config::build_platform_config(global, &cfg)?;
            if let Command::Provision(ProvisionArgs {
                concurrency: Some(n),
                ..
            }) = &cmd
            {
                platform_config.lookup_concurrency = *n;
            }

            tracing::debug!(command = ?cmd, "dispatching command");
            Platform::scoped(platform_config, |platform| async move {
                Ok(commands::dispatch(cmd, &platform, global).await)
            })
            .await?
        }
    }
}

/// Config-file output name; unknown values fall back to table.
fn parse_output(raw: &str) -> OutputFormat {
    OutputFormat::from_str(raw, true).unwrap_or(OutputFormat::Table)
}
