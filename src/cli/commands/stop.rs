//! Stop command - stop the running server

use console::style;

use crate::cli::args::StopArgs;
use crate::error::McinitResult;
use crate::server::Manager;

/// Execute the stop command
pub async fn execute(args: StopArgs) -> McinitResult<()> {
    let manager = Manager::new(".")?;

    if args.force {
        println!("Force stopping server...");
    } else {
        println!("Stopping server gracefully...");
    }

    manager.stop(args.force).await?;

    println!("{} Server stopped", style("✓").green());
    Ok(())
}
