use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use milk_lifecycle::{PublicView, PublicViewBuilder, QualityStatus};
use milk_server::{AppConfig, MilkServer};
use milk_wallet::{CredentialStore, FileSystemWallet};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(&cli.config, args),
        Command::Config(args) => cmd_config(&cli.config, args, cli.format),
        Command::Wallet(args) => cmd_wallet(&cli.config, args, cli.format),
        Command::View(args) => cmd_view(args, cli.format),
    }
}

/// File settings (when the file exists) with environment overrides on top.
fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let mut config = if path.exists() {
        AppConfig::load(path)?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        AppConfig::default()
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start the async runtime")
}

fn cmd_serve(config_path: &Path, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
    }
    if config.auth.tokens.is_empty() && config.auth.jwt_secret.is_none() {
        tracing::warn!("no auth tokens configured; only the public view will answer");
    }
    let server = MilkServer::from_config(config)?;
    println!(
        "{} Milk Trace on {} (channel {}, chaincode {})",
        "✓".green().bold(),
        server.config().server.bind_addr.to_string().bold(),
        server.config().gateway.channel.cyan(),
        server.config().gateway.chaincode.cyan(),
    );
    println!("  ledger: {}", server.ledger_label().yellow());
    runtime()?.block_on(server.serve())?;
    Ok(())
}

fn cmd_config(config_path: &Path, args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = if args.defaults {
        AppConfig::default()
    } else {
        load_config(config_path)?
    };
    let config = config.redacted();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

fn cmd_wallet(config_path: &Path, args: WalletArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let wallet = FileSystemWallet::new(&config.gateway.wallet_path);
    let rt = runtime()?;
    match args.action {
        WalletAction::List => {
            let names = rt.block_on(wallet.list())?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&names)?),
                OutputFormat::Text if names.is_empty() => {
                    println!("No identities in {}", wallet.root().display());
                }
                OutputFormat::Text => {
                    for name in &names {
                        let marker = if *name == config.gateway.public_identity {
                            " (public)".dimmed().to_string()
                        } else {
                            String::new()
                        };
                        println!("  {}{}", name.yellow(), marker);
                    }
                }
            }
        }
        WalletAction::Show { name } => {
            let identity = rt.block_on(wallet.resolve(&name))?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "name": identity.name,
                        "mspId": identity.msp_id,
                        "certificate": identity.certificate,
                    })
                ),
                OutputFormat::Text => {
                    println!("Identity {}", identity.name.yellow().bold());
                    println!("  MSP: {}", identity.msp_id.cyan());
                    println!("{}", identity.certificate.dimmed());
                }
            }
        }
    }
    Ok(())
}

fn read_payload(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn cmd_view(args: ViewArgs, format: OutputFormat) -> anyhow::Result<()> {
    let batch = read_payload(&args.batch)?;
    let history = match &args.history {
        Some(path) => read_payload(path)?,
        None => "[]".to_string(),
    };
    let view = PublicViewBuilder::build(&batch, &history)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print_view(&view),
    }
    Ok(())
}

fn print_view(view: &PublicView) {
    let status = match view.quality_status {
        QualityStatus::Aprovado => "APROVADO".green().bold(),
        QualityStatus::Reprovado => "REPROVADO".red().bold(),
        QualityStatus::EmAnalise => "EM_ANALISE".yellow().bold(),
    };
    println!("Batch {}  producer {}", view.batch_id.bold(), view.producer_id);
    if let Some(at) = &view.collected_at {
        println!("  Collected: {at}");
    }
    if let Some(p) = &view.processing {
        println!(
            "  Processing: {} at {}, expires {}",
            p.processing_type.to_string().cyan(),
            p.processed_at,
            p.expires_at
        );
    }
    println!("  Quality: {status}");
    println!("  {}", view.quality_note);
    println!("  History: {} transactions", view.history.len());
    for entry in &view.history {
        println!("    {}  {}", entry.tx_id.dimmed(), entry.timestamp);
    }
}
