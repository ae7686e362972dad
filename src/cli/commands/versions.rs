//! Versions command - list upstream versions for a server type

use console::style;

use crate::cache::Cache;
use crate::cli::args::VersionsArgs;
use crate::error::McinitResult;
use crate::provider::ProviderRegistry;

/// Execute the versions command
pub async fn execute(args: VersionsArgs) -> McinitResult<()> {
    let registry = ProviderRegistry::with_defaults(Cache::open()?);
    let provider = registry.get(&args.r#type)?;

    let versions = provider.available_versions().await?;
    let total = versions.len();

    let shown: Vec<&String> = if args.limit > 0 {
        versions.iter().take(args.limit).collect()
    } else {
        versions.iter().collect()
    };

    println!(
        "{} versions for {}:",
        total,
        style(provider.name()).cyan()
    );
    for version in &shown {
        println!("  {}", version);
    }
    if shown.len() < total {
        println!("  ... and {} more (use --limit 0 for all)", total - shown.len());
    }

    Ok(())
}
