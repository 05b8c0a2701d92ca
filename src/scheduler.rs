//! Periodic background tasks.
//!
//! Tasks are registered with a name, an interval and whether they should run
//! as soon as the scheduler starts. Each registration gets its own loop; a
//! run is awaited inline so runs of the same task never overlap, and ticks
//! missed while a run was in flight are skipped.
//!
//! Every run is wrapped in an error boundary: an `Err` or a panic is logged
//! and the loop moves on to the next tick.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Future returned by one run of a task.
pub type TaskFuture = BoxFuture<'static, anyhow::Result<()>>;

type TaskFn = Arc<dyn Fn() -> TaskFuture + Send + Sync>;

struct Registration {
    name: String,
    interval: Duration,
    run_immediately: bool,
    task: TaskFn,
}

/// Owner of the periodic task loops.
pub struct Scheduler {
    pending: Vec<Registration>,
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            handles: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Registers a task.
    ///
    /// With `run_immediately == false` the first run happens one full
    /// `interval` after [`Scheduler::start`].
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        run_immediately: bool,
        task: F,
    ) where
        F: Fn() -> TaskFuture + Send + Sync + 'static,
    {
        self.pending.push(Registration {
            name: name.into(),
            interval,
            run_immediately,
            task: Arc::new(task),
        });
    }

    /// Number of running task loops.
    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Spawns one loop per registered task. Must be called from within a
    /// tokio runtime.
    pub fn start(&mut self) {
        for registration in self.pending.drain(..) {
            log::info!(
                "Scheduling {} every {}s{}",
                registration.name,
                registration.interval.as_secs(),
                if registration.run_immediately {
                    " (starting now)"
                } else {
                    ""
                }
            );
            let shutdown = self.shutdown.clone();
            self.handles
                .push(tokio::spawn(run_loop(registration, shutdown)));
        }
    }

    /// Cancels every loop and waits for them to finish.
    ///
    /// A run in flight is dropped at its next await point.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                log::warn!("Scheduler loop ended abnormally: {}", e);
            }
        }
        log::info!("Scheduler stopped");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_loop(registration: Registration, shutdown: CancellationToken) {
    let Registration {
        name,
        interval,
        run_immediately,
        task,
    } = registration;

    let first_tick = if run_immediately {
        Instant::now()
    } else {
        Instant::now() + interval
    };
    let mut ticker = interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = run_once(&name, &task) => {}
                }
            }
        }
    }

    log::debug!("Task {} stopped", name);
}

/// Runs a task once, containing errors and panics.
async fn run_once(name: &str, task: &TaskFn) {
    log::debug!("Running task {}", name);
    let run = async { task().await };

    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(Ok(())) => log::debug!("Task {} completed", name),
        Ok(Err(e)) => log::error!("Task {} failed: {:#}", name, e),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Task {} panicked: {}", name, message);
        }
    }
}
