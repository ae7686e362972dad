//! mcinit - Minecraft developer server management
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use mcinit::cli::{Cli, Commands};
use mcinit::error::McinitResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> McinitResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("mcinit=warn"),
        1 => EnvFilter::new("mcinit=info"),
        _ => EnvFilter::new("mcinit=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match cli.command {
        Commands::Init(args) => mcinit::cli::commands::init(args, cli.dry_run).await,
        Commands::Start(args) => mcinit::cli::commands::start(args).await,
        Commands::Stop(args) => mcinit::cli::commands::stop(args).await,
        Commands::Restart(args) => mcinit::cli::commands::restart(args).await,
        Commands::Status => mcinit::cli::commands::status().await,
        Commands::Logs(args) => mcinit::cli::commands::logs(args).await,
        Commands::Versions(args) => mcinit::cli::commands::versions(args).await,
        Commands::Cache(args) => mcinit::cli::commands::cache(args).await,
    }
}
