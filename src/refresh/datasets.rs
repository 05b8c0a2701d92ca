//! Dataset refresh cycle.

use strum::IntoEnumIterator;

use crate::datasets::{DatasetKind, DatasetStore};

/// Outcome of one refresh cycle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefreshReport {
    pub refreshed: Vec<DatasetKind>,
    pub failed: Vec<(DatasetKind, String)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Refreshes every dataset, in order, one after the other.
///
/// A failing dataset is logged and skipped; its file and cache are left as
/// they were and it is retried on the next cycle.
pub async fn refresh_datasets(store: &DatasetStore) -> RefreshReport {
    let mut report = RefreshReport::default();

    for kind in DatasetKind::iter() {
        log::info!("Started update of {} dataset", kind);
        match store.refresh(kind).await {
            Ok(bytes) => {
                log::info!("Finished update of {} dataset ({} bytes)", kind, bytes);
                report.refreshed.push(kind);
            }
            Err(e) => {
                log::error!("Failed to update {} dataset: {}", kind, e);
                report.failed.push((kind, e.to_string()));
            }
        }
    }

    if report.is_complete() {
        log::info!("Refreshed all {} datasets", report.refreshed.len());
    } else {
        log::warn!(
            "Dataset refresh finished with {} failure(s); stale copies kept",
            report.failed.len()
        );
    }

    report
}
