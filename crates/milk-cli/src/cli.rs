use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "milktrace",
    about = "Milk Trace: batch provenance over a permissioned ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file. Defaults apply when it does not exist.
    #[arg(short, long, global = true, default_value = "milktrace.toml")]
    pub config: PathBuf,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
    /// Inspect the credential wallet
    Wallet(WalletArgs),
    /// Derive the public view from raw ledger payloads
    View(ViewArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr` and `PORT`.
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Ignore the file and environment; print built-in defaults.
    #[arg(long)]
    pub defaults: bool,
}

#[derive(Args)]
pub struct WalletArgs {
    #[command(subcommand)]
    pub action: WalletAction,
}

#[derive(Subcommand)]
pub enum WalletAction {
    /// List identity names
    List,
    /// Show an identity's MSP id and certificate (never the key)
    Show { name: String },
}

#[derive(Args)]
pub struct ViewArgs {
    /// File holding a `ReadBatch` payload
    pub batch: PathBuf,
    /// File holding a `GetHistory` payload; empty history when omitted
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["milktrace", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".into()));
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.config, PathBuf::from("milktrace.toml"));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "milktrace", "config", "-v", "--config", "/etc/milk.toml", "--format", "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/etc/milk.toml"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Config(ConfigArgs { defaults: false })));
    }

    #[test]
    fn parse_wallet_show() {
        let cli = Cli::try_parse_from(["milktrace", "wallet", "show", "appUser"]).unwrap();
        if let Command::Wallet(WalletArgs {
            action: WalletAction::Show { name },
        }) = cli.command
        {
            assert_eq!(name, "appUser");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_view() {
        let cli =
            Cli::try_parse_from(["milktrace", "view", "b1.json", "--history", "h1.json"]).unwrap();
        if let Command::View(args) = cli.command {
            assert_eq!(args.batch, PathBuf::from("b1.json"));
            assert_eq!(args.history, Some(PathBuf::from("h1.json")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn view_requires_batch_file() {
        assert!(Cli::try_parse_from(["milktrace", "view"]).is_err());
    }
}
