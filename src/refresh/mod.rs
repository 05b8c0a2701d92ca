//! Background refresh tasks.
//!
//! Two recurring tasks keep the node's shared state fresh:
//! - the dataset refresh (every 24h) re-downloads the reference datasets
//! - the location refresh (every 70 min) updates the Location Record
//!
//! Neither runs at startup. Both contain their own failures, so the returned
//! task future always resolves to `Ok`.

mod datasets;
mod location;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::datasets::DatasetStore;
use crate::location::LocationSlot;
use crate::scheduler::Scheduler;

pub use datasets::{refresh_datasets, RefreshReport};
pub use location::refresh_location;

/// Registers the dataset refresh task.
pub fn register_dataset_refresh(
    scheduler: &mut Scheduler,
    store: Arc<DatasetStore>,
    interval: Duration,
) {
    scheduler.register("dataset refresh", interval, false, move || {
        let store = Arc::clone(&store);
        async move {
            refresh_datasets(&store).await;
            anyhow::Ok(())
        }
        .boxed()
    });
}

/// Registers the location refresh task.
pub fn register_location_refresh(
    scheduler: &mut Scheduler,
    client: reqwest::Client,
    url: String,
    slot: Arc<LocationSlot>,
    interval: Duration,
) {
    scheduler.register("location refresh", interval, false, move || {
        let client = client.clone();
        let url = url.clone();
        let slot = Arc::clone(&slot);
        async move {
            // Already logged as critical by refresh_location
            if let Err(e) = refresh_location(&client, &url, &slot).await {
                log::debug!("Location refresh will retry next interval: {}", e);
            }
            anyhow::Ok(())
        }
        .boxed()
    });
}
