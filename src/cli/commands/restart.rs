//! Restart command - stop + debounce + start

use console::style;

use crate::cli::args::RestartArgs;
use crate::error::McinitResult;
use crate::server::Manager;

/// Execute the restart command
pub async fn execute(args: RestartArgs) -> McinitResult<()> {
    let mut manager = Manager::new(".")?;
    manager.load_config().await?;

    println!("Restarting server...");
    if args.wait > 0 && manager.is_running().await {
        println!("Waiting {}s between stop and start...", args.wait);
    }

    manager.restart(args.background, args.wait).await?;

    if args.background {
        println!("{} Server restarted in background", style("✓").green());
    } else {
        println!("{} Server stopped", style("✓").green());
    }

    Ok(())
}
