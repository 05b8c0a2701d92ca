//! Node information and project links.

use axum::extract::State;
use axum::Json;

use super::super::types::{
    AppState, DocumentationLinks, Links, ProjectLinks, SupportLinks, SystemInfo, VersionInfo,
};
use crate::config::{
    DOCUMENTATION_URL, PROJECT_HOME_URL, PROJECT_REPOSITORY_URL, PROJECT_UPSTREAM_URL,
    SUPPORT_GITHUB_SPONSORS_URL, SUPPORT_KOFI_URL, SUPPORT_PAYPAL_URL,
};

/// Versions, instance id and current location of this node.
pub async fn info_handler(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        version: VersionInfo {
            worker: env!("CARGO_PKG_VERSION").to_string(),
            checker: state.checker.version().to_string(),
        },
        id: state.instance_id.to_string(),
        location: state.location.snapshot(),
    })
}

pub async fn links_handler() -> Json<Links> {
    Json(Links {
        documentation: DocumentationLinks {
            pyfunceble: DOCUMENTATION_URL.to_string(),
        },
        projects: ProjectLinks {
            pyfunceble_web_worker: PROJECT_REPOSITORY_URL.to_string(),
            pyfunceble: PROJECT_HOME_URL.to_string(),
            pyfunceble_github: PROJECT_UPSTREAM_URL.to_string(),
        },
        support: SupportLinks {
            github_sponsors: SUPPORT_GITHUB_SPONSORS_URL.to_string(),
            paypal: SUPPORT_PAYPAL_URL.to_string(),
            kofi: SUPPORT_KOFI_URL.to_string(),
        },
    })
}
