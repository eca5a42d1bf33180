//! # DocuChat CLI (`docuchat`)
//!
//! Starts the DocuChat HTTP server or prints the effective configuration.
//!
//! ## Usage
//!
//! ```bash
//! docuchat [--config ./docuchat.toml] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docuchat serve` | Start the HTTP server |
//! | `docuchat config` | Print the effective configuration as TOML |
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default port (5000) with ./static as web root
//! docuchat serve
//!
//! # Override the port and web root
//! docuchat serve --port 8080 --static-dir ./web/dist
//!
//! # Check what a config file plus $PORT resolves to
//! PORT=9000 docuchat --config ./docuchat.toml config
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docuchat::config::{self, Config};
use docuchat::server;

/// DocuChat — upload plaintext documents and chat about them.
///
/// Settings come from an optional TOML file, then the `PORT` environment
/// variable, then command-line flags.
#[derive(Parser)]
#[command(name = "docuchat", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Serves the JSON API under `/api` and the static web client at `/`.
    /// Stored documents and chat history live in memory only.
    Serve {
        /// Port to listen on (overrides `PORT` and `[server].port`).
        #[arg(long)]
        port: Option<u16>,

        /// Directory served as the web root (overrides `[server].static_dir`).
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML and exit.
    Config,
}

fn init_logging(cfg: &Config, verbose: u8) {
    let level = match verbose {
        0 => cfg.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    cfg.apply_env()?;

    match cli.command {
        Commands::Serve { port, static_dir } => {
            if let Some(port) = port {
                cfg.server.port = port;
            }
            if let Some(dir) = static_dir {
                cfg.server.static_dir = dir;
            }
            init_logging(&cfg, cli.verbose);
            server::run_server(&cfg).await?;
        }
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&cfg).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}
