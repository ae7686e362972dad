//! Logs command - view and follow server logs

use tokio::sync::{mpsc, watch};

use crate::cli::args::LogsArgs;
use crate::error::{McinitError, McinitResult};
use crate::logs::{parse_since, LogReader};

/// Execute the logs command
pub async fn execute(args: LogsArgs) -> McinitResult<()> {
    let reader = LogReader::new(std::path::Path::new("."));

    if !reader.exists() {
        return Err(McinitError::LogNotFound(reader.path().to_path_buf()));
    }

    let since = args.since.as_deref().map(parse_since).transpose()?;

    if !args.follow {
        let lines = reader.read(args.lines, args.grep.as_deref(), since).await?;
        for line in lines {
            println!("{}", line);
        }
        return Ok(());
    }

    println!("Following logs (press Ctrl+C to stop)...");

    let (tx, mut rx) = mpsc::channel(100);
    let (stop_tx, stop_rx) = watch::channel(false);
    let grep = args.grep.clone();

    let follower = tokio::spawn(async move { reader.follow(grep, tx, stop_rx).await });

    loop {
        tokio::select! {
            line = rx.recv() => {
                match line {
                    Some(line) => println!("{}", line),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                let _ = stop_tx.send(true);
                break;
            }
        }
    }

    follower
        .await
        .map_err(|e| McinitError::Internal(format!("log follower failed: {}", e)))??;
    Ok(())
}
