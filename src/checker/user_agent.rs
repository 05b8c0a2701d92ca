//! User-Agent selection for HTTP status probes.
//!
//! The User-Agent comes from the user-agent dataset, indexed by the browser
//! and platform configured in the `user_agent` section. A custom value in
//! that section wins; the built-in default is used when the dataset has no
//! matching entry or couldn't be loaded.

use crate::config::{UserAgentConfig, DEFAULT_USER_AGENT};
use crate::datasets::UserAgentDb;

/// Picks the User-Agent header value to send.
pub fn select_user_agent(config: &UserAgentConfig, db: Option<&UserAgentDb>) -> String {
    if let Some(custom) = config.custom.as_deref().map(str::trim) {
        if !custom.is_empty() {
            return custom.to_string();
        }
    }

    let browser = config.browser.to_lowercase();
    let platform = config.platform.to_lowercase();

    match db
        .and_then(|db| db.get(&browser))
        .and_then(|platforms| platforms.get(&platform))
    {
        Some(user_agent) => user_agent.clone(),
        None => {
            log::debug!(
                "No user agent for {}/{} in dataset, using default",
                browser,
                platform
            );
            DEFAULT_USER_AGENT.to_string()
        }
    }
}
