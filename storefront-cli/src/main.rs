//! Storefront CLI - Command-line interface
//!
//! Provides command-line access to product search, the shopping assistant,
//! catalog uploads and the web server.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use storefront_core::RuntimeMode;
use storefront_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Product search and shopping assistant")]
#[command(version)]
struct Cli {
    /// Runtime mode: production uses Azure services, development runs offline
    #[arg(long, global = true, default_value = "production")]
    mode: RuntimeMode,

    /// Console log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: CliLogLevel,

    /// Directory for the per-run debug log
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), Some(cli.log_dir.as_path()))?;

    if let Err(e) = commands::handle_command(cli.command, cli.mode).await {
        tracing::error!("Command failed: {}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
