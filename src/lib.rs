//! funceble_worker library: domain, IP and URL checks behind an HTTP API
//!
//! The worker answers availability, reputation and syntax checks plus a set
//! of list-format converters. Each instance works inside its own workspace,
//! keeps its reference datasets fresh in the background and reports its
//! network location on `/info`.
//!
//! # Example
//!
//! ```no_run
//! use funceble_worker::{run_server, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     data_dir: Some(PathBuf::from("/var/lib/funceble")),
//!     port: 8080,
//!     ..Default::default()
//! };
//!
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a multi-threaded Tokio runtime. Use `#[tokio::main]`
//! in your application.

pub mod checker;
pub mod config;
pub mod converter;
pub mod datasets;
pub mod error_handling;
pub mod initialization;
pub mod location;
pub mod refresh;
pub mod scheduler;
pub mod server;
pub mod shutdown;
pub mod workspace;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use run::run_server;

// Internal run module (process lifecycle)
mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};

    use crate::checker::{BuiltinChecker, Checker};
    use crate::config::{bootstrap, Config, DATASET_REFRESH_INTERVAL, LOCATION_REFRESH_INTERVAL};
    use crate::datasets::DatasetStore;
    use crate::initialization::init_client;
    use crate::location::LocationSlot;
    use crate::refresh::{register_dataset_refresh, register_location_refresh};
    use crate::scheduler::Scheduler;
    use crate::server::{self, AppState, WhoisPolicy};
    use crate::shutdown::shutdown_signal;
    use crate::workspace::Workspace;

    /// Runs the worker until SIGINT or SIGTERM.
    ///
    /// Allocates the workspace, commits the configuration, starts the
    /// scheduled refreshes and serves the API. On shutdown the scheduler is
    /// stopped and the workspace removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is missing, the workspace can't
    /// be created, the committed configuration is invalid or the API can't
    /// bind its address.
    pub async fn run_server(config: Config) -> Result<()> {
        // Installed first so a stop request during startup still cleans up
        let shutdown = shutdown_signal();

        let mut workspace =
            Workspace::create(config.data_dir.as_deref()).context("Failed to set up workspace")?;
        let committed =
            Arc::new(bootstrap(workspace.path()).context("Failed to commit configuration")?);

        let client = init_client().context("Failed to initialize HTTP client")?;
        let sources = config.sources();
        let datasets = Arc::new(DatasetStore::new(
            workspace.path(),
            sources.clone(),
            client.clone(),
        ));
        let location = Arc::new(LocationSlot::new());

        let checker: Arc<dyn Checker> = Arc::new(
            BuiltinChecker::new(Arc::clone(&datasets), Arc::clone(&committed))
                .context("Failed to initialize checker")?,
        );

        let state = AppState {
            checker,
            datasets: Arc::clone(&datasets),
            location: Arc::clone(&location),
            instance_id: Arc::from(workspace.token()),
            whois: WhoisPolicy {
                allow_lookup: config.allow_whois_lookup,
                allow_param: config.allow_whois_lookup_param,
            },
        };

        let mut scheduler = Scheduler::new();
        register_dataset_refresh(&mut scheduler, datasets, DATASET_REFRESH_INTERVAL);
        register_location_refresh(
            &mut scheduler,
            client,
            sources.location,
            location,
            LOCATION_REFRESH_INTERVAL,
        );
        scheduler.start();

        let app = server::router(state, &config.cors_origins);
        let served = server::serve(&config.host, config.port, app, shutdown).await;

        log::info!("Shutting down");
        scheduler.stop().await;
        workspace.destroy().context("Failed to clean up workspace")?;

        served
    }
}
