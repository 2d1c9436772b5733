//! Clap derive structures for the `heatly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// heatly -- provision and rename valves on a heat-metering platform
#[derive(Debug, Parser)]
#[command(
    name = "heatly",
    version,
    about = "Provision and rename heat-metering valves from the command line",
    long_about = "Operator tool for a heat-metering platform's maintenance API.\n\n\
        Resolves collector serial numbers and issues them for provisioning in one\n\
        batch, and renames household valves without losing any stored field.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Platform profile to use
    #[arg(long, short = 'p', env = "HEATLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Platform URL (overrides profile)
    #[arg(long, env = "HEATLY_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (overrides profile, env var, and keyring)
    #[arg(long, env = "HEATLY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "HEATLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HEATLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from profile, else 30]
    #[arg(long, env = "HEATLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Selected output format; `main` fills in the config default.
    pub fn format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve collector serial numbers and issue them for provisioning
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// Change a household valve's serial number, keeping every other field
    Rename(RenameArgs),

    /// Query household valves
    #[command(alias = "v")]
    Valves(ValvesArgs),

    /// Query network equipment (collectors)
    #[command(alias = "eq")]
    Equipment(EquipmentArgs),

    /// Query meter readings and communication status
    Meter(MeterArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROVISION / RENAME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Collector serial numbers, in the order results should be reported
    #[arg(value_name = "SERIAL")]
    pub serials: Vec<String>,

    /// Read serial numbers from a file (one per line, `#` starts a comment)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Lookups in flight at once (1-8) [default: from config, else 4]
    #[arg(long, short = 'j')]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Current serial number of the valve
    #[arg(long, short = 's', value_name = "SERIAL")]
    pub serial: String,

    /// Installation address of the valve (picks it out among duplicates)
    #[arg(long, short = 'a')]
    pub address: String,

    /// Serial number to assign
    #[arg(long, short = 'n', value_name = "SERIAL")]
    pub new_serial: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUERIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ValvesArgs {
    #[command(subcommand)]
    pub command: ValvesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ValvesCommand {
    /// Find household valves
    #[command(alias = "ls")]
    Find {
        /// Filter by serial number
        #[arg(long, short = 's')]
        serial: Option<String>,

        /// Search the whole location tree instead of the root node
        #[arg(long)]
        all_nodes: bool,

        /// Max results
        #[arg(long, short = 'l', default_value = "5000")]
        page_size: u32,
    },
}

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    #[command(subcommand)]
    pub command: EquipmentCommand,
}

#[derive(Debug, Subcommand)]
pub enum EquipmentCommand {
    /// Find network equipment
    #[command(alias = "ls")]
    Find {
        /// Filter by serial number
        #[arg(long, short = 's')]
        serial: Option<String>,

        /// Filter by factory ID
        #[arg(long)]
        factory: Option<String>,

        /// Filter by model ID
        #[arg(long)]
        model: Option<String>,

        /// Max results
        #[arg(long, short = 'l', default_value = "2000")]
        page_size: u32,
    },
}

#[derive(Debug, Args)]
pub struct MeterArgs {
    #[command(subcommand)]
    pub command: MeterCommand,
}

#[derive(Debug, Subcommand)]
pub enum MeterCommand {
    /// Current readings and communication status for one valve
    Status {
        /// Valve serial number
        serial: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a profile value
    Set {
        /// Profile key (url, token_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
