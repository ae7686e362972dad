//! Init command - create a new server directory
//!
//! Downloads the server jar through the cache, writes mcinit.json,
//! eula.txt, server.properties, and startup scripts.

use console::style;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::cache::{Algorithm, Cache};
use crate::cli::args::InitArgs;
use crate::config::{self, Config};
use crate::error::{McinitError, McinitResult};
use crate::flags;
use crate::gitignore;
use crate::java::{self, Detector, Installation};
use crate::provider::ProviderRegistry;
use crate::scripts::ScriptGenerator;
use crate::server::state::STATE_DIR;

/// Execute the init command
pub async fn execute(args: InitArgs, dry_run: bool) -> McinitResult<()> {
    let registry = ProviderRegistry::with_defaults(Cache::open()?);
    if !registry.exists(&args.r#type) {
        return Err(McinitError::ProviderNotFound(args.r#type.clone()));
    }

    let (xms, xmx) = resolve_heap(&args);

    let server_dir = std::path::absolute(&args.path)
        .map_err(|e| McinitError::io("resolving server path", e))?;
    let name = args.name.clone().unwrap_or_else(|| {
        server_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dev-server".to_string())
    });

    println!(
        "Initializing {} server (Minecraft {}) at {}",
        style(&args.r#type).cyan(),
        args.mc,
        server_dir.display()
    );

    if dry_run {
        print_plan(&args, &server_dir, &name, &xms, &xmx);
        return Ok(());
    }

    fs::create_dir_all(&server_dir)
        .await
        .map_err(|e| McinitError::io(format!("creating {}", server_dir.display()), e))?;

    let cfg_path = config::config_path(&server_dir);
    if config::exists(&cfg_path) {
        return Err(McinitError::AlreadyInitialized);
    }

    println!("Detecting Java installation...");
    let java_inst = resolve_java(&args.java).await?;
    if let Err(e) = java::validate_for_minecraft(&java_inst, &args.mc) {
        eprintln!("{} {}", style("Warning:").yellow(), e);
        eprintln!("{} Server may not start correctly", style("Warning:").yellow());
    }
    println!(
        "Found Java {} at {}",
        java_inst.raw_version,
        java_inst.path.display()
    );

    println!(
        "Downloading {} server jar for Minecraft {}...",
        args.r#type, args.mc
    );
    let provider = registry.get(&args.r#type)?;
    let jar = provider.download_jar(&args.mc, "latest").await?;
    debug!("Jar cached at {}", jar.local_path.display());

    let dest_jar = server_dir.join("server.jar");
    fs::copy(&jar.local_path, &dest_jar)
        .await
        .map_err(|e| McinitError::io(format!("copying jar to {}", dest_jar.display()), e))?;
    println!("{} Server jar downloaded", style("✓").green());

    let mut cfg = build_config(&args, &name, &java_inst, &jar.download_url, &jar.checksum, jar.algorithm, &xms, &xmx);
    config::save(&mut cfg, &cfg_path).await?;
    println!("Configuration saved to mcinit.json");

    write_eula(&server_dir, args.accept_eula).await?;
    write_server_properties(&server_dir, args.port).await?;

    println!("Generating startup scripts...");
    let jvm_flags = flags::build_flags(args.flags, &xms, &xmx, &cfg.jvm.custom_flags)?;
    ScriptGenerator::new(&server_dir)
        .generate_all(&java_inst.path, "server.jar", &jvm_flags)
        .await?;

    fs::create_dir_all(server_dir.join(STATE_DIR))
        .await
        .map_err(|e| McinitError::io("creating state directory", e))?;

    if args.gitignore {
        add_gitignore_entry(&server_dir).await;
    }

    println!();
    println!("{} Server initialized successfully!", style("✓").green());
    println!();
    println!("Next steps:");
    println!("  cd {}", args.path.display());
    if !args.accept_eula {
        println!("  # Accept the EULA by editing eula.txt");
    }
    println!("  mcinit start");
    println!();

    Ok(())
}

fn resolve_heap(args: &InitArgs) -> (String, String) {
    if let Some(ram) = &args.ram {
        return (ram.clone(), ram.clone());
    }
    (
        args.xms.clone().unwrap_or_else(|| "2G".to_string()),
        args.xmx.clone().unwrap_or_else(|| "4G".to_string()),
    )
}

fn print_plan(args: &InitArgs, server_dir: &Path, name: &str, xms: &str, xmx: &str) {
    println!("[DRY RUN] Would create server with:");
    println!("  Type:    {}", args.r#type);
    println!("  Version: {}", args.mc);
    println!("  Path:    {}", server_dir.display());
    println!("  Name:    {}", name);
    println!("  RAM:     Xms={} Xmx={}", xms, xmx);
    println!("  Flags:   {}", args.flags);
    println!("  Port:    {}", args.port);
    println!("  EULA:    {}", args.accept_eula);
}

/// Resolve the requested Java: explicit path, explicit major, or best
async fn resolve_java(requested: &str) -> McinitResult<Installation> {
    let detector = Detector::new();

    if requested.is_empty() || requested == "auto" {
        return detector.find_best().await;
    }

    let as_path = Path::new(requested);
    if as_path.exists() {
        return detector.probe(as_path).await;
    }

    let major: u64 = requested
        .parse()
        .map_err(|_| McinitError::JavaInvalid(as_path.to_path_buf()))?;
    detector.find_by_major(major).await
}

#[allow(clippy::too_many_arguments)]
fn build_config(
    args: &InitArgs,
    name: &str,
    java_inst: &Installation,
    download_url: &str,
    checksum: &str,
    algorithm: Algorithm,
    xms: &str,
    xmx: &str,
) -> Config {
    let mut cfg = Config::default();

    cfg.server.server_type = args.r#type.clone();
    cfg.server.minecraft_version = args.mc.clone();
    cfg.server.jar_path = "server.jar".to_string();
    cfg.server.name = name.to_string();
    cfg.server.download_url = download_url.to_string();
    match algorithm {
        Algorithm::Sha256 => cfg.server.sha256 = checksum.to_string(),
        Algorithm::Sha1 => cfg.server.sha1 = checksum.to_string(),
        Algorithm::None => {}
    }

    cfg.java.version = args.java.clone();
    cfg.java.path = java_inst.path.display().to_string();
    cfg.java.detected_version = java_inst.raw_version.clone();

    cfg.jvm.xms = xms.to_string();
    cfg.jvm.xmx = xmx.to_string();
    cfg.jvm.flags = args.flags;

    cfg.server_config.port = args.port;
    cfg.server_config.nogui = args.nogui;

    cfg.eula.accepted = args.accept_eula;
    if args.accept_eula {
        cfg.eula.accepted_at = Some(chrono::Utc::now());
    }

    if let Ok(cache) = Cache::open() {
        cfg.paths.cache_dir = cache.root().display().to_string();
    }
    cfg.paths.server_dir = ".".to_string();

    cfg
}

async fn write_eula(server_dir: &Path, accepted: bool) -> McinitResult<()> {
    let content = format!("# Generated by mcinit\neula={}\n", accepted);
    fs::write(server_dir.join("eula.txt"), content)
        .await
        .map_err(|e| McinitError::io("writing eula.txt", e))
}

async fn write_server_properties(server_dir: &Path, port: u16) -> McinitResult<()> {
    let content = format!("server-port={}\n", port);
    fs::write(server_dir.join("server.properties"), content)
        .await
        .map_err(|e| McinitError::io("writing server.properties", e))
}

async fn add_gitignore_entry(server_dir: &Path) {
    let root = match gitignore::find_git_root(server_dir) {
        Ok(root) => root,
        Err(_) => {
            eprintln!(
                "{} Not in a git repository, skipping .gitignore",
                style("Warning:").yellow()
            );
            return;
        }
    };

    let rel = server_dir
        .strip_prefix(&root)
        .unwrap_or(server_dir)
        .to_string_lossy()
        .into_owned();

    match gitignore::add_to_gitignore(&root, &rel).await {
        Ok(()) => println!("Added {} to .gitignore", rel),
        Err(e) => eprintln!(
            "{} Failed to update .gitignore: {}",
            style("Warning:").yellow(),
            e
        ),
    }
}
