//! The built-in checker.
//!
//! Implements the [`Checker`] seam on top of the reference datasets, the
//! committed configuration and the network lookups of this module. Calls are
//! blocking: datasets are loaded (and downloaded on first use) on the calling
//! thread, then the network lookups are driven on the captured runtime.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hickory_resolver::TokioAsyncResolver;
use tokio::runtime::Handle;

use super::availability::{self, Lookups, Subject, SOURCE_REPUTATION, SOURCE_SYNTAX};
use super::reputation;
use super::syntax;
use super::types::{
    AvailabilityParams, AvailabilityStatus, Reputation, ReputationParams, ReputationStatus,
    SubjectKind, SyntaxFlags, SyntaxStatus, Validity,
};
use super::user_agent::select_user_agent;
use super::{normalize_subject, Checker};
use crate::config::{CommittedConfig, DEFAULT_USER_AGENT};
use crate::datasets::DatasetStore;
use crate::error_handling::{CheckerError, InitializationError};
use crate::initialization::{init_probe_client, init_resolver};

/// Version reported for the built-in checker.
pub const BUILTIN_CHECKER_VERSION: &str = concat!("builtin-", env!("CARGO_PKG_VERSION"));

pub struct BuiltinChecker {
    runtime: Handle,
    datasets: Arc<DatasetStore>,
    config: Arc<CommittedConfig>,
    http: reqwest::Client,
    resolver: Arc<TokioAsyncResolver>,
}

impl BuiltinChecker {
    /// Creates the checker. Must be called from within a tokio runtime.
    pub fn new(
        datasets: Arc<DatasetStore>,
        config: Arc<CommittedConfig>,
    ) -> Result<Self, InitializationError> {
        let runtime = Handle::try_current()
            .map_err(|e| InitializationError::RuntimeError(e.to_string()))?;
        let timeout = Duration::from_secs(config.checker().lookup.timeout);

        Ok(Self {
            runtime,
            datasets,
            http: init_probe_client(timeout)?,
            resolver: init_resolver()?,
            config,
        })
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.config.checker().lookup.timeout)
    }

    fn syntax_flags(&self, kind: SubjectKind, subject: &str) -> Result<SyntaxFlags, CheckerError> {
        if kind == SubjectKind::Ip {
            return Ok(syntax::ip_flags(subject));
        }
        let iana = self.datasets.iana()?;
        let psl = self.datasets.public_suffix()?;
        Ok(syntax::flags_for(kind, subject, &iana, &psl))
    }

    fn whois_server(&self, host: &str) -> Result<Option<String>, CheckerError> {
        let Some(tld) = host.trim_end_matches('.').rsplit('.').next() else {
            return Ok(None);
        };
        let iana = self.datasets.iana()?;
        Ok(iana.get(&tld.to_ascii_lowercase()).cloned().flatten())
    }

    fn user_agent(&self) -> String {
        let db = match self.datasets.user_agents() {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("User agent dataset unavailable: {}", e);
                None
            }
        };
        select_user_agent(&self.config.checker().user_agent, db.as_deref())
    }
}

impl Checker for BuiltinChecker {
    fn version(&self) -> &str {
        BUILTIN_CHECKER_VERSION
    }

    fn availability(
        &self,
        kind: SubjectKind,
        subject: &str,
        params: &AvailabilityParams,
    ) -> Result<AvailabilityStatus, CheckerError> {
        let subject = normalize_subject(subject)?;
        let idna_subject = syntax::to_idna(subject);
        let syntax = self.syntax_flags(kind, subject)?;

        let host = availability::target_host(kind, &idna_subject);
        let whois_server = match host.as_deref() {
            Some(host) if params.use_whois_lookup && !syntax::is_ip(host) => {
                self.whois_server(host)?
            }
            _ => None,
        };
        let reputation = if params.use_reputation_lookup {
            Some(self.datasets.ipv4_reputation()?)
        } else {
            None
        };
        let user_agent = if params.use_http_code_lookup {
            self.user_agent()
        } else {
            DEFAULT_USER_AGENT.to_string()
        };

        let input = Subject {
            kind,
            subject,
            idna_subject,
            syntax,
            whois_server,
            reputation,
            user_agent,
        };
        let lookups = Lookups {
            resolver: &self.resolver,
            http: &self.http,
            timeout: self.lookup_timeout(),
            http_codes: &self.config.checker().http_codes,
        };

        Ok(self
            .runtime
            .block_on(availability::check(&lookups, &input, params)))
    }

    fn reputation(
        &self,
        kind: SubjectKind,
        subject: &str,
        params: &ReputationParams,
    ) -> Result<ReputationStatus, CheckerError> {
        let subject = normalize_subject(subject)?;
        let idna_subject = syntax::to_idna(subject);
        let syntax = self.syntax_flags(kind, subject)?;

        let mut status = ReputationStatus {
            subject: subject.to_string(),
            idna_subject: idna_subject.clone(),
            status: Reputation::Sane,
            status_source: SOURCE_REPUTATION.to_string(),
            tested_at: Utc::now(),
            syntax,
            dns_lookup: None,
            params: params.clone(),
            checker_type: kind.to_string(),
        };

        if params.do_syntax_check_first && !status.syntax.is_valid_for(kind) {
            status.status = Reputation::Invalid;
            status.status_source = SOURCE_SYNTAX.to_string();
            return Ok(status);
        }

        let Some(host) = availability::target_host(kind, &idna_subject) else {
            return Ok(status);
        };
        let db = self.datasets.ipv4_reputation()?;
        let addresses = self
            .runtime
            .block_on(reputation::ipv4_addresses(&host, &self.resolver));

        if !syntax::is_ip(&host) {
            status.dns_lookup = Some(addresses.iter().map(ToString::to_string).collect());
        }
        if reputation::is_malicious(&addresses, &db) {
            status.status = Reputation::Malicious;
        }

        Ok(status)
    }

    fn syntax(&self, kind: SubjectKind, subject: &str) -> Result<SyntaxStatus, CheckerError> {
        let subject = normalize_subject(subject)?;
        let syntax = self.syntax_flags(kind, subject)?;
        let status = if syntax.is_valid_for(kind) {
            Validity::Valid
        } else {
            Validity::Invalid
        };

        Ok(SyntaxStatus {
            subject: subject.to_string(),
            idna_subject: syntax::to_idna(subject),
            status,
            status_source: SOURCE_SYNTAX.to_string(),
            tested_at: Utc::now(),
            syntax,
            checker_type: kind.to_string(),
        })
    }
}
