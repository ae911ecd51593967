//! Clap derive structures for the `upway` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use upway_core::DataService;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// upway -- read NIBE heat pump telemetry from MyUpway or myUplink
#[derive(Debug, Parser)]
#[command(
    name = "upway",
    version,
    about = "Read heat pump telemetry from MyUpway or myUplink",
    long_about = "Reads current values and history of a NIBE heat pump.\n\n\
        Works against the legacy MyUpway web portal (username/password)\n\
        or the myUplink API (OAuth client credentials).",
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
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "UPWAY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Data service (overrides profile)
    #[arg(long, env = "UPWAY_SERVICE", global = true, ignore_case = true)]
    pub service: Option<ServiceArg>,

    /// MyUpway login email (overrides profile)
    #[arg(long, env = "UPWAY_USERNAME", global = true)]
    pub username: Option<String>,

    /// MyUpway heat pump id (overrides profile)
    #[arg(long, env = "UPWAY_HEATPUMP_ID", global = true)]
    pub heatpump_id: Option<u64>,

    /// myUplink OAuth client id (overrides profile)
    #[arg(long, env = "UPWAY_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UPWAY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "UPWAY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceArg {
    /// Legacy MyUpway web portal
    #[value(name = "myupway", alias = "upway")]
    MyUpway,
    /// myUplink REST API
    #[value(name = "myuplink", alias = "uplink")]
    MyUplink,
}

impl From<ServiceArg> for DataService {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::MyUpway => Self::MyUpway,
            ServiceArg::MyUplink => Self::MyUplink,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read current values
    #[command(alias = "v")]
    Values(ValuesArgs),

    /// Read the history of one variable (MyUpway only)
    #[command(alias = "h")]
    History(HistoryArgs),

    /// List the variables the selected service can report
    #[command(alias = "vars")]
    Variables,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Values / History ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ValuesArgs {
    /// Variables to read, e.g. AVG_OUTDOOR_TEMP (default: all)
    pub variables: Vec<String>,

    /// Log in again if the session is gone
    #[arg(long)]
    pub force_login: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Variable to read, e.g. AVG_OUTDOOR_TEMP
    pub variable: String,

    /// Start of the range (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long)]
    pub start: String,

    /// End of the range (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long)]
    pub stop: String,

    /// Number of samples the portal aggregates into
    #[arg(long, default_value_t = upway_core::DEFAULT_RESOLUTION)]
    pub resolution: u32,

    /// Log in again if the session is gone
    #[arg(long)]
    pub force_login: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// Create initial config file with guided setup
    Init,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password or client secret in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
