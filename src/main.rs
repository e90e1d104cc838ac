//! porkbun-ddns - keep a Porkbun DNS record on your public IP.

use clap::{Parser, Subcommand};
use porkbun_ddns::config::Config;
use porkbun_ddns::providers::create_provider;
use porkbun_ddns::reconcile::{self, SyncAction};
use porkbun_ddns::Context;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "porkbun-ddns")]
#[command(about = "Keep a Porkbun DNS record pointed at a dynamic public IP")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List identifiers of the configured record
    Status,

    /// Point the record at an IP address
    Update {
        /// Address to publish
        #[arg(long)]
        ip: IpAddr,
    },

    /// Delete the ALIAS record at the configured owner
    DeleteAlias,

    /// Validate configuration
    Validate,

    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn get_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }

    // Default locations
    let candidates = [
        dirs::config_dir().map(|p| p.join("porkbun-ddns/config.toml")),
        Some(PathBuf::from("/etc/porkbun-ddns/config.toml")),
        Some(PathBuf::from("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            return candidate;
        }
    }

    // Return default even if it doesn't exist
    dirs::config_dir()
        .map(|p| p.join("porkbun-ddns/config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = get_config_path(cli.config);

    // Ctrl-C cancels whatever provider call is in flight.
    let ctx = Context::background();
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            signal_ctx.cancel();
        }
    });

    match cli.command {
        Commands::Status => {
            let config = Config::load_from(&config_path)?;
            cmd_status(&ctx, config).await?;
        }
        Commands::Update { ip } => {
            let config = Config::load_from(&config_path)?;
            cmd_update(&ctx, config, ip).await?;
        }
        Commands::DeleteAlias => {
            let config = Config::load_from(&config_path)?;
            cmd_delete_alias(&ctx, config).await?;
        }
        Commands::Validate => {
            let config = Config::load_from(&config_path)?;
            cmd_validate(config)?;
        }
        Commands::Init { force } => {
            cmd_init(&config_path, force)?;
        }
    }

    Ok(())
}

async fn cmd_status(ctx: &Context, config: Config) -> anyhow::Result<()> {
    let provider = create_provider(&config.record, config.request_timeout())?;
    let record_type = config.record.ip_version.record_type();

    println!("porkbun-ddns Status");
    println!("===================\n");
    println!("Record: {} {}", provider.target().fqdn(), record_type);

    let ids = provider.record_ids(ctx, record_type).await?;
    if ids.is_empty() {
        println!("  (no record)");
    }
    for id in ids {
        println!("  id {}", id);
    }

    Ok(())
}

async fn cmd_update(ctx: &Context, config: Config, ip: IpAddr) -> anyhow::Result<()> {
    let expected = config.record.ip_version.record_type();
    if porkbun_ddns::RecordType::for_ip(ip) != expected {
        anyhow::bail!("{} does not fit the configured {} record", ip, expected);
    }

    let provider = create_provider(&config.record, config.request_timeout())?;
    let ctx = match config.request_timeout().checked_mul(4) {
        Some(budget) => ctx.with_timeout(budget),
        None => ctx.clone(),
    };

    match reconcile::sync(&ctx, provider.as_ref(), ip).await {
        Ok(outcome) => {
            match outcome.action {
                SyncAction::Created => println!("OK (created {} -> {})", outcome.domain, ip),
                SyncAction::Updated(n) => {
                    println!("OK (updated {} record(s) {} -> {})", n, outcome.domain, ip)
                }
            }
            Ok(())
        }
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!("Update failed, worth retrying later: {}", e.root_cause());
            }
            Err(e.into())
        }
    }
}

async fn cmd_delete_alias(ctx: &Context, config: Config) -> anyhow::Result<()> {
    let provider = create_provider(&config.record, config.request_timeout())?;
    provider.delete_alias_records(ctx).await?;
    println!("Deleted ALIAS record(s) at {}", provider.target().fqdn());
    Ok(())
}

fn cmd_validate(config: Config) -> anyhow::Result<()> {
    println!("Validating configuration...\n");

    println!(
        "  record: {} {} (ttl {})",
        config.record.domain, config.record.owner, config.record.ttl
    );

    let settings = config.settings()?;
    let providers: Vec<String> = settings.providers().iter().map(|p| p.to_string()).collect();
    println!("  public IP providers: {}", providers.join(", "));
    println!("  public IP timeout: {:?}", settings.timeout());

    println!("\nConfiguration is valid.");
    Ok(())
}

fn cmd_init(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, use --force to overwrite", path.display());
    }

    Config::example().save_to(path)?;
    println!("Wrote example configuration to {}", path.display());
    Ok(())
}
