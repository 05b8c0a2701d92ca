//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `funceble_worker` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use funceble_worker::initialization::init_logger_with;
use funceble_worker::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(
        config.log_level.clone().into(),
        config.log_format.clone(),
        config.log_file.as_deref(),
    )
    .context("Failed to initialize logger")?;

    if let Err(e) = run_server(config).await {
        eprintln!("funceble_worker error: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
