use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use klistra_core::VERSION;

/// Klistra - encrypted pastes that destroy themselves
#[derive(Parser)]
#[command(name = "klistra")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the paste database
    #[arg(long, global = true, env = "KLISTRA_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log informational events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the database
    Init(InitArgs),

    /// Encrypt and store a new paste
    Create(CreateArgs),

    /// Decrypt and print a paste
    Read(ReadArgs),

    /// Check whether a paste exists and needs a password
    Status(StatusArgs),

    /// Remove expired pastes once
    Sweep,

    /// Remove expired pastes periodically until interrupted
    Daemon(DaemonArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where the database will live
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<String>,

    /// Default paste lifetime (seconds, or e.g. 10m, 1h, 7d)
    #[arg(long, value_name = "DURATION")]
    pub expiry: Option<String>,

    /// Pause between background sweeps (seconds, or e.g. 30s, 5m)
    #[arg(long, value_name = "DURATION")]
    pub sweep_interval: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Paste text (read from stdin when omitted)
    #[arg(long)]
    pub text: Option<String>,

    /// Password for a protected paste
    #[arg(long, env = "KLISTRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Require a password to read the paste (prompts if none given)
    #[arg(long)]
    pub protect: bool,

    /// Paste lifetime (seconds, or e.g. 10m, 1h, 7d)
    #[arg(long, value_name = "DURATION")]
    pub expiry: Option<String>,

    /// Attach a file reference (repeatable)
    #[arg(long = "file", value_name = "REF")]
    pub files: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `read` command
#[derive(Args)]
pub struct ReadArgs {
    /// Paste id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Password for a protected paste
    #[arg(long, env = "KLISTRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Paste id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `daemon` command
#[derive(Args)]
pub struct DaemonArgs {
    /// Pause between sweeps (seconds, or e.g. 30s, 5m)
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,
}
