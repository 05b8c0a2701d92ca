//! Shutdown signal handling.

use std::future::Future;

/// Returns a future resolving on the first Ctrl-C (SIGINT) or SIGTERM.
///
/// On Unix the signal handlers are installed when this function is called,
/// not when the future is first polled, so a signal arriving between startup
/// and the server loop still triggers a graceful shutdown. Must be called
/// from within a tokio runtime.
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let interrupt = signal(SignalKind::interrupt())
            .map_err(|e| log::error!("Failed to listen for SIGINT: {}", e))
            .ok();
        let terminate = signal(SignalKind::terminate())
            .map_err(|e| log::error!("Failed to listen for SIGTERM: {}", e))
            .ok();

        async move {
            let interrupted = async move {
                match interrupt {
                    Some(mut stream) => {
                        stream.recv().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            };
            let terminated = async move {
                match terminate {
                    Some(mut stream) => {
                        stream.recv().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                () = interrupted => log::info!("Received SIGINT"),
                () = terminated => log::info!("Received SIGTERM"),
            }
        }
    }

    #[cfg(not(unix))]
    {
        async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("Received Ctrl-C"),
                Err(e) => {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}
