//! Status command - show server status

use console::style;

use crate::error::McinitResult;
use crate::server::Manager;

/// Execute the status command
pub async fn execute() -> McinitResult<()> {
    let manager = Manager::new(".")?;

    if !manager.is_running().await {
        println!("Server status: {}", style("STOPPED").red());
        return Ok(());
    }

    let state = manager.status().await?;

    println!("Server status: {}", style("RUNNING").green());
    println!("PID:     {}", state.pid);
    println!("Uptime:  {}", state.format_uptime());
    println!("Started: {}", state.start_time.format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}
