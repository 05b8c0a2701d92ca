//! Checker inputs and results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a subject is checked as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SubjectKind {
    #[strum(serialize = "DOMAIN")]
    Domain,
    #[strum(serialize = "URL")]
    Url,
    #[strum(serialize = "IP")]
    Ip,
    #[strum(serialize = "DOMAIN_AND_IP")]
    DomainAndIp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Availability {
    Active,
    Inactive,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reputation {
    Sane,
    Malicious,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Validity {
    Valid,
    Invalid,
}

/// Options of an availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityParams {
    pub use_extra_rules: bool,
    pub use_whois_lookup: bool,
    pub use_dns_lookup: bool,
    pub use_netinfo_lookup: bool,
    pub use_http_code_lookup: bool,
    pub use_reputation_lookup: bool,
    pub do_syntax_check_first: bool,
    pub use_whois_db: bool,
}

impl Default for AvailabilityParams {
    fn default() -> Self {
        Self {
            use_extra_rules: true,
            use_whois_lookup: false,
            use_dns_lookup: true,
            use_netinfo_lookup: false,
            use_http_code_lookup: true,
            use_reputation_lookup: false,
            do_syntax_check_first: true,
            use_whois_db: false,
        }
    }
}

/// Options of a reputation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationParams {
    pub do_syntax_check_first: bool,
}

impl Default for ReputationParams {
    fn default() -> Self {
        Self {
            do_syntax_check_first: true,
        }
    }
}

/// Syntax flags attached to every status. `None` means "not checked".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntaxFlags {
    pub domain_syntax: Option<bool>,
    pub second_level_domain_syntax: Option<bool>,
    pub subdomain_syntax: Option<bool>,
    pub ip_syntax: Option<bool>,
    pub ipv4_syntax: Option<bool>,
    pub ipv6_syntax: Option<bool>,
    pub ipv4_range_syntax: Option<bool>,
    pub ipv6_range_syntax: Option<bool>,
    pub url_syntax: Option<bool>,
}

impl SyntaxFlags {
    /// Whether the subject is acceptable for a check of the given kind.
    pub fn is_valid_for(&self, kind: SubjectKind) -> bool {
        let domain = self.domain_syntax.unwrap_or(false);
        let ip = self.ip_syntax.unwrap_or(false);
        match kind {
            SubjectKind::Domain => domain,
            SubjectKind::Ip => ip,
            SubjectKind::DomainAndIp => domain || ip,
            SubjectKind::Url => self.url_syntax.unwrap_or(false),
        }
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityStatus {
    pub subject: String,
    pub idna_subject: String,
    pub status: Availability,
    pub status_source: String,
    pub tested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub syntax: SyntaxFlags,
    pub expiration_date: Option<String>,
    pub status_before_extra_rules: Option<Availability>,
    pub status_after_extra_rules: Option<Availability>,
    pub status_source_before_extra_rules: Option<String>,
    pub status_source_after_extra_rules: Option<String>,
    pub dns_lookup: Option<BTreeMap<String, Option<Vec<String>>>>,
    pub netinfo: Option<BTreeMap<String, Option<Vec<String>>>>,
    pub http_status_code: Option<u16>,
    pub params: AvailabilityParams,
}

/// Result of a reputation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationStatus {
    pub subject: String,
    pub idna_subject: String,
    pub status: Reputation,
    pub status_source: String,
    pub tested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub syntax: SyntaxFlags,
    pub dns_lookup: Option<Vec<String>>,
    pub params: ReputationParams,
    pub checker_type: String,
}

/// Result of a syntax check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxStatus {
    pub subject: String,
    pub idna_subject: String,
    pub status: Validity,
    pub status_source: String,
    pub tested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub syntax: SyntaxFlags,
    pub checker_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&Availability::Inactive).unwrap(),
            "\"INACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&Reputation::Malicious).unwrap(),
            "\"MALICIOUS\""
        );
        assert_eq!(serde_json::to_string(&Validity::Valid).unwrap(), "\"VALID\"");
    }

    #[test]
    fn test_subject_kind_names() {
        assert_eq!(SubjectKind::DomainAndIp.to_string(), "DOMAIN_AND_IP");
        assert_eq!(SubjectKind::from_str("URL").unwrap(), SubjectKind::Url);
    }

    #[test]
    fn test_validity_per_kind() {
        let flags = SyntaxFlags {
            domain_syntax: Some(false),
            ip_syntax: Some(true),
            ..Default::default()
        };
        assert!(!flags.is_valid_for(SubjectKind::Domain));
        assert!(flags.is_valid_for(SubjectKind::Ip));
        assert!(flags.is_valid_for(SubjectKind::DomainAndIp));
        assert!(!flags.is_valid_for(SubjectKind::Url));
    }

    #[test]
    fn test_syntax_flags_are_flattened() {
        let status = SyntaxStatus {
            subject: "example.org".to_string(),
            idna_subject: "example.org".to_string(),
            status: Validity::Valid,
            status_source: "SYNTAX".to_string(),
            tested_at: Utc::now(),
            syntax: SyntaxFlags {
                domain_syntax: Some(true),
                ..Default::default()
            },
            checker_type: "DOMAIN".to_string(),
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["domain_syntax"], true);
        assert!(value["ip_syntax"].is_null());
    }
}
