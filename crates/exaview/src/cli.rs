//! Clap derive structures for the `exaview` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// exaview -- Exadata inventory and Oracle license usage from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "exaview",
    version,
    about = "Browse Exadata racks and Oracle license usage from the command line",
    long_about = "A read-mostly dashboard over an Ercole-style inventory backend.\n\n\
        Lists and searches Exadata racks (with nested VMs and cell disks),\n\
        edits cluster assignments and RDMA descriptors, and reports Oracle\n\
        database license usage and agreements.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "EXAVIEW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend API root (overrides profile)
    #[arg(long, short = 'b', env = "EXAVIEW_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "EXAVIEW_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EXAVIEW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

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
    #[arg(long, short = 'k', env = "EXAVIEW_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EXAVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Restrict to one environment (e.g. PROD)
    #[arg(long, global = true)]
    pub environment: Option<String>,

    /// Restrict to one location
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// Show the inventory as it was at this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, global = true)]
    pub older_than: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and edit Exadata racks
    #[command(alias = "exa", alias = "x")]
    Exadata(ExadataArgs),

    /// Oracle database license usage and agreements
    #[command(alias = "lic", alias = "l")]
    Licenses(LicensesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXADATA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExadataArgs {
    #[command(subcommand)]
    pub command: ExadataCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExadataCommand {
    /// List racks, optionally filtered by a search term
    #[command(alias = "ls")]
    List {
        /// Case-insensitive term matched against racks, hosts, VMs and cell disks
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Also print which host rows the term matched inside
        #[arg(long, short = 'e')]
        expanded: bool,
    },

    /// Show one rack with its components
    Show {
        /// Rack ID
        rack_id: String,
    },

    /// Replace the cluster names of a component
    ClusterNames {
        /// Rack ID
        rack_id: String,
        /// Component host ID
        host_id: String,
        /// New cluster names (replaces the whole list)
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },

    /// Set the cluster name of one VM
    VmCluster {
        /// Rack ID
        rack_id: String,
        /// Component host ID
        host_id: String,
        /// VM name
        vm: String,
        /// New cluster name
        name: String,
    },

    /// Create or replace a rack's RDMA descriptor
    Rdma {
        /// Rack ID
        rack_id: String,
        /// Switch software version
        #[arg(long)]
        sw_version: String,
        /// Switch name
        #[arg(long)]
        switch_name: String,
        /// Switch model
        #[arg(long)]
        model: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LICENSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LicensesArgs {
    #[command(subcommand)]
    pub command: LicensesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LicensesCommand {
    /// List license agreements
    #[command(group(ArgGroup::new("projection").multiple(false)))]
    Agreements {
        /// Print only agreement numbers
        #[arg(long, group = "projection")]
        numbers: bool,
        /// Print only CSI numbers
        #[arg(long, group = "projection")]
        csi: bool,
        /// Print only reference numbers
        #[arg(long, group = "projection")]
        references: bool,
    },

    /// Hosts covered by one agreement
    Hosts {
        /// Agreement ID
        agreement_id: String,
    },

    /// License usage aggregated per database, host or cluster
    Used {
        /// Aggregation level
        #[arg(long, default_value = "database")]
        by: UsageView,

        /// Case-insensitive term matched against every column
        #[arg(long, short = 's')]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UsageView {
    /// One row per database
    Database,
    /// One row per host
    Host,
    /// One row per cluster
    Cluster,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
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

    /// Display current configuration (tokens redacted)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (backend, token_env, environment, location, ca_cert, insecure, timeout)
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

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
