//! keyseal CLI
//!
//! Generate elliptic-curve key pairs, keep them password-wrapped on disk,
//! and encrypt text under a key pair, a password, or an ECDH shared secret.

use std::io;
use std::path::PathBuf;

use clap::Parser;

use keyseal_cli::commands::{self, Command};
use keyseal_cli::prompt::EnvOrPrompt;
use keyseal_cli::tracing_init::init_tracing;
use keyseal_crypto::{CurveKind, load_config};

#[derive(Parser, Debug)]
#[command(name = "keyseal")]
#[command(version, about = "Elliptic-curve key pairs and password envelopes", long_about = None)]
struct Cli {
    /// Config file (JSON), applied over the global config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Curve for newly generated keys (overrides config)
    #[arg(long, global = true)]
    curve: Option<CurveKind>,

    /// Fail instead of prompting when KEYSEAL_PASSWORD is unset
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("keyseal=info", cli.log_json);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(curve) = cli.curve {
        config.curve = curve;
    }
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), curve = %config.curve, "starting keyseal");

    let passwords = EnvOrPrompt {
        non_interactive: cli.non_interactive,
    };
    commands::run(cli.command, config, &passwords, &mut io::stdout())
}
