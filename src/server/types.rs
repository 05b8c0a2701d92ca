//! API state, request and response structures.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::checker::{AvailabilityParams, Checker, ReputationParams};
use crate::datasets::DatasetStore;
use crate::location::{LocationRecord, LocationSlot};

/// Shared state of the API and the scheduled refreshes.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<dyn Checker>,
    pub datasets: Arc<DatasetStore>,
    pub location: Arc<LocationSlot>,
    /// Token of this instance, also the name of its workspace.
    pub instance_id: Arc<str>,
    pub whois: WhoisPolicy,
}

/// Who decides whether availability checks use WHOIS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhoisPolicy {
    /// Operator default.
    pub allow_lookup: bool,
    /// Whether callers may override the default per request.
    pub allow_param: bool,
}

impl WhoisPolicy {
    pub fn resolve(&self, requested: Option<bool>) -> bool {
        if self.allow_param {
            requested.unwrap_or(self.allow_lookup)
        } else {
            self.allow_lookup
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubjectBody {
    pub subject: String,
}

#[derive(Debug, Deserialize)]
pub struct DataBody {
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct RpzBody {
    pub data: String,
    pub soas: Option<Vec<String>>,
}

/// Query options of domain, IP and domain-and-IP availability checks.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AvailabilityQuery {
    pub use_extra_rules: bool,
    pub use_whois_lookup: Option<bool>,
    pub use_dns_lookup: bool,
    pub use_netinfo_lookup: bool,
    pub use_http_code_lookup: bool,
    pub use_reputation_lookup: bool,
    pub do_syntax_check_first: bool,
}

impl Default for AvailabilityQuery {
    fn default() -> Self {
        Self {
            use_extra_rules: true,
            use_whois_lookup: None,
            use_dns_lookup: true,
            use_netinfo_lookup: false,
            use_http_code_lookup: true,
            use_reputation_lookup: false,
            do_syntax_check_first: true,
        }
    }
}

impl AvailabilityQuery {
    pub fn into_params(self, whois: WhoisPolicy) -> AvailabilityParams {
        AvailabilityParams {
            use_extra_rules: self.use_extra_rules,
            use_whois_lookup: whois.resolve(self.use_whois_lookup),
            use_dns_lookup: self.use_dns_lookup,
            use_netinfo_lookup: self.use_netinfo_lookup,
            use_http_code_lookup: self.use_http_code_lookup,
            use_reputation_lookup: self.use_reputation_lookup,
            do_syntax_check_first: self.do_syntax_check_first,
            use_whois_db: false,
        }
    }
}

/// Query options of URL availability checks. The other lookups are fixed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UrlAvailabilityQuery {
    pub use_whois_lookup: Option<bool>,
    pub use_reputation_lookup: bool,
    pub do_syntax_check_first: bool,
}

impl Default for UrlAvailabilityQuery {
    fn default() -> Self {
        Self {
            use_whois_lookup: None,
            use_reputation_lookup: false,
            do_syntax_check_first: true,
        }
    }
}

impl UrlAvailabilityQuery {
    pub fn into_params(self, whois: WhoisPolicy) -> AvailabilityParams {
        AvailabilityParams {
            use_extra_rules: false,
            use_whois_lookup: whois.resolve(self.use_whois_lookup),
            use_dns_lookup: false,
            use_netinfo_lookup: false,
            use_http_code_lookup: true,
            use_reputation_lookup: self.use_reputation_lookup,
            do_syntax_check_first: self.do_syntax_check_first,
            use_whois_db: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReputationQuery {
    pub do_syntax_check_first: bool,
}

impl Default for ReputationQuery {
    fn default() -> Self {
        Self {
            do_syntax_check_first: true,
        }
    }
}

impl From<ReputationQuery> for ReputationParams {
    fn from(query: ReputationQuery) -> Self {
        Self {
            do_syntax_check_first: query.do_syntax_check_first,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComplementsQuery {
    pub include_given: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdblockQuery {
    pub aggressive: bool,
}

/// JSON response of `GET /info`.
#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub version: VersionInfo,
    pub id: String,
    pub location: LocationRecord,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub worker: String,
    pub checker: String,
}

/// JSON response of `GET /`.
#[derive(Debug, Serialize)]
pub struct Links {
    pub documentation: DocumentationLinks,
    pub projects: ProjectLinks,
    pub support: SupportLinks,
}

#[derive(Debug, Serialize)]
pub struct DocumentationLinks {
    pub pyfunceble: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectLinks {
    pub pyfunceble_web_worker: String,
    pub pyfunceble: String,
    pub pyfunceble_github: String,
}

#[derive(Debug, Serialize)]
pub struct SupportLinks {
    pub github_sponsors: String,
    pub paypal: String,
    pub kofi: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whois_param_ignored_unless_allowed() {
        let policy = WhoisPolicy {
            allow_lookup: false,
            allow_param: false,
        };
        assert!(!policy.resolve(Some(true)));

        let policy = WhoisPolicy {
            allow_lookup: true,
            allow_param: false,
        };
        assert!(policy.resolve(Some(false)));
    }

    #[test]
    fn test_whois_param_defaults_to_operator_choice() {
        let policy = WhoisPolicy {
            allow_lookup: true,
            allow_param: true,
        };
        assert!(policy.resolve(None));
        assert!(!policy.resolve(Some(false)));
    }

    #[test]
    fn test_url_query_forces_lookups() {
        let params = UrlAvailabilityQuery::default().into_params(WhoisPolicy::default());
        assert!(!params.use_extra_rules);
        assert!(!params.use_dns_lookup);
        assert!(!params.use_netinfo_lookup);
        assert!(params.use_http_code_lookup);
        assert!(!params.use_whois_db);
    }

    #[test]
    fn test_availability_query_defaults() {
        let params = AvailabilityQuery::default().into_params(WhoisPolicy::default());
        assert_eq!(params, AvailabilityParams::default());
    }
}
