//! HTTP API of the worker.
//!
//! Routes:
//! - `POST /availability/{domain,ip,domain-and-ip,url}` - availability checks
//! - `POST /reputation/{domain,url,ip,domain-and-ip}` - reputation checks
//! - `POST /syntax/{domain,ip,url}` - syntax checks
//! - `POST /tools/converter/*` - line-format converters
//! - `GET /info` - versions, instance id and location of the node
//! - `GET /` - project links

mod error;
mod handlers;
mod types;

use std::future::Future;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub use error::{ApiError, ApiResult};
pub use types::{AppState, WhoisPolicy};

use handlers::converter;

/// Builds the API router. A CORS layer is added when `cors_origins` isn't empty.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let app = Router::new()
        .route("/", get(handlers::links_handler))
        .route("/info", get(handlers::info_handler))
        .route("/availability/domain", post(handlers::availability_domain))
        .route("/availability/ip", post(handlers::availability_ip))
        .route(
            "/availability/domain-and-ip",
            post(handlers::availability_domain_and_ip),
        )
        .route("/availability/url", post(handlers::availability_url))
        .route("/reputation/domain", post(handlers::reputation_domain))
        .route("/reputation/url", post(handlers::reputation_url))
        .route("/reputation/ip", post(handlers::reputation_ip))
        .route(
            "/reputation/domain-and-ip",
            post(handlers::reputation_domain_and_ip),
        )
        .route("/syntax/domain", post(handlers::syntax_domain))
        .route("/syntax/ip", post(handlers::syntax_ip))
        .route("/syntax/url", post(handlers::syntax_url))
        .route("/tools/converter/complements", post(converter::complements))
        .route("/tools/converter/adblock", post(converter::adblock))
        .route("/tools/converter/cidr", post(converter::cidr))
        .route("/tools/converter/wildcard", post(converter::wildcard))
        .route("/tools/converter/hosts", post(converter::hosts))
        .route("/tools/converter/plain", post(converter::plain))
        .route("/tools/converter/rpz", post(converter::rpz))
        .with_state(state);

    match cors_layer(cors_origins) {
        Some(layer) => app.layer(layer),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .collect();
    if origins.is_empty() {
        return None;
    }

    // Credentials rule out wildcards, so "*" mirrors the caller instead
    let allow_origin = if origins.contains(&"*") {
        AllowOrigin::mirror_request()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}

/// Serves the API until `shutdown` resolves.
pub async fn serve<F>(host: &str, port: u16, app: Router, shutdown: F) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to {}:{}: {}", host, port, e))?;

    log::info!("API server listening on http://{}:{}/", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

    Ok(())
}
