//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::flags::FlagsPreset;

/// mcinit - Minecraft developer server management
///
/// Creates and manages local dev servers quickly and reproducibly
/// across Windows, macOS, and Linux.
#[derive(Parser, Debug)]
#[command(name = "mcinit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Preview changes without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new server folder with configuration
    Init(InitArgs),

    /// Start the server process
    Start(StartArgs),

    /// Stop the running server gracefully
    Stop(StopArgs),

    /// Restart the server (stop + start)
    Restart(RestartArgs),

    /// Show server status (running/stopped, PID, uptime)
    Status,

    /// Display server logs
    Logs(LogsArgs),

    /// List available versions for a server type
    Versions(VersionsArgs),

    /// Manage the shared jar cache
    Cache(CacheArgs),
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Server type (vanilla|paper|folia|purpur|velocity|waterfall|bungee)
    #[arg(long, default_value = "paper")]
    pub r#type: String,

    /// Minecraft version (required)
    #[arg(long)]
    pub mc: String,

    /// Target directory for server
    #[arg(long, default_value = "./server")]
    pub path: PathBuf,

    /// Server name (default: derived from path)
    #[arg(long)]
    pub name: Option<String>,

    /// Accept Minecraft EULA
    #[arg(long)]
    pub accept_eula: bool,

    /// Total RAM (e.g., 4G) - sets both Xms and Xmx
    #[arg(long, conflicts_with_all = ["xms", "xmx"])]
    pub ram: Option<String>,

    /// Initial heap size (e.g., 2G)
    #[arg(long)]
    pub xms: Option<String>,

    /// Maximum heap size (e.g., 4G)
    #[arg(long)]
    pub xmx: Option<String>,

    /// JVM flags preset
    #[arg(long, default_value = "aikar")]
    pub flags: FlagsPreset,

    /// Server port
    #[arg(long, default_value = "25565")]
    pub port: u16,

    /// Disable server GUI
    #[arg(long)]
    pub nogui: bool,

    /// Add server path to .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// Java version or path (auto|17|21|/path/to/java)
    #[arg(long, default_value = "auto")]
    pub java: String,
}

/// Arguments for the start command
#[derive(Parser, Debug)]
pub struct StartArgs {
    /// Run server in background
    #[arg(long)]
    pub background: bool,

    /// Additional JVM arguments
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub args: String,
}

/// Arguments for the stop command
#[derive(Parser, Debug)]
pub struct StopArgs {
    /// Skip graceful shutdown and kill immediately
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the restart command
#[derive(Parser, Debug)]
pub struct RestartArgs {
    /// Run in background after restart
    #[arg(long)]
    pub background: bool,

    /// Wait time before restart (seconds)
    #[arg(long, default_value = "2")]
    pub wait: u64,
}

/// Arguments for the logs command
#[derive(Parser, Debug)]
pub struct LogsArgs {
    /// Follow log output (like tail -f)
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show (0 = all)
    #[arg(short, long, default_value = "50")]
    pub lines: usize,

    /// Filter lines matching pattern (case-insensitive)
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Show logs since duration (e.g., 10m, 1h)
    #[arg(long)]
    pub since: Option<String>,
}

/// Arguments for the versions command
#[derive(Parser, Debug)]
pub struct VersionsArgs {
    /// Server type to query
    #[arg(long, default_value = "paper")]
    pub r#type: String,

    /// Maximum number of versions to print (0 = all)
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache location, artifact count, and total size
    Info,

    /// Remove all cached jars and metadata
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
