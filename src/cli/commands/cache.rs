//! Cache command - inspect and clear the shared jar cache

use console::style;
use std::io::Write;

use crate::cache::Cache;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::error::{McinitError, McinitResult};

/// Execute the cache command
pub async fn execute(args: CacheArgs) -> McinitResult<()> {
    let cache = Cache::open()?;

    match args.action {
        CacheAction::Info => info(&cache),
        CacheAction::Clear { yes } => clear(&cache, yes),
    }
}

fn info(cache: &Cache) -> McinitResult<()> {
    println!("Location:  {}", cache.root().display());
    println!("Artifacts: {}", cache.artifact_count()?);
    println!("Size:      {}", format_size(cache.size()?));
    Ok(())
}

fn clear(cache: &Cache, yes: bool) -> McinitResult<()> {
    if !yes {
        print!("Remove all cached jars at {}? [y/N] ", cache.root().display());
        std::io::stdout()
            .flush()
            .map_err(|e| McinitError::io("flushing stdout", e))?;

        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(|e| McinitError::io("reading confirmation", e))?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted");
            return Ok(());
        }
    }

    cache.clear()?;
    println!("{} Cache cleared", style("✓").green());
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(45 * 1024 * 1024), "45.0 MiB");
    }
}
