//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use crate::error_handling::InitializationError;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// Initializes the DNS resolver used by availability and reputation checks.
///
/// Uses the default upstream configuration with short timeouts so a slow
/// name server can't hold a blocking checker thread for long. Must be called
/// from within a tokio runtime.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature aligned with the
/// other initializers.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    // Subjects are absolute names: never append search domains
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(
        ResolverConfig::default(),
        opts,
    )))
}
