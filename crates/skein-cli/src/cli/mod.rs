//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use skein_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "skein")]
#[command(version)]
#[command(about = "Terminal client for federated social threads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Inspect threads
    Thread {
        #[command(subcommand)]
        command: ThreadCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ThreadCommands {
    /// Show a thread as an indented transcript
    Show {
        /// Post uri identifying the thread
        #[arg(value_name = "URI")]
        uri: String,

        /// Override the configured service base URL
        #[arg(long, value_name = "URL")]
        service: Option<String>,
    },
    /// Read a single-author chain root to latest
    Unroll {
        /// Post uri identifying the thread
        #[arg(value_name = "URI")]
        uri: String,

        /// Override the configured service base URL
        #[arg(long, value_name = "URL")]
        service: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Persist the default thread view mode ("full" or "linear")
    SetViewMode {
        #[arg(value_name = "MODE")]
        mode: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SKEIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    tracing::debug!(service = %config.service.base_url, "config loaded");

    match cli.command {
        Commands::Thread { command } => match command {
            ThreadCommands::Show { uri, service } => {
                commands::thread::show(&uri, service.as_deref(), &config).await
            }
            ThreadCommands::Unroll { uri, service } => {
                commands::thread::unroll(&uri, service.as_deref(), &config).await
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetViewMode { mode } => commands::config::set_view_mode(&mode),
        },
    }
}
