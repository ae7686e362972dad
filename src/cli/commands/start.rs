//! Start command - start the server process

use console::style;

use crate::cli::args::StartArgs;
use crate::error::McinitResult;
use crate::server::Manager;

/// Execute the start command
pub async fn execute(args: StartArgs) -> McinitResult<()> {
    let mut manager = Manager::new(".")?;
    manager.load_config().await?;

    println!("Starting server...");
    manager.start(args.background, &args.args).await?;

    if args.background {
        println!("{} Server started in background", style("✓").green());
        println!("  Logs with:   mcinit logs --follow");
        println!("  Stop with:   mcinit stop");
    } else {
        // foreground start returns when the server exits
        println!("{} Server stopped", style("✓").green());
    }

    Ok(())
}
