//! Availability decision pipeline.
//!
//! Lookups run in a fixed order and stop at the first one proving the
//! subject is up: WHOIS, DNS, network info, HTTP status code, reputation.
//! Extra rules may then downgrade an `ACTIVE` result.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hickory_resolver::TokioAsyncResolver;
use reqwest::header::USER_AGENT;
use url::Url;

use super::dns::{self, DnsRecords};
use super::reputation;
use super::types::{
    Availability, AvailabilityParams, AvailabilityStatus, SubjectKind, SyntaxFlags,
};
use super::whois;
use crate::config::HttpCodesConfig;
use crate::datasets::ReputationDb;

pub const SOURCE_SYNTAX: &str = "SYNTAX";
pub const SOURCE_WHOIS: &str = "WHOIS";
pub const SOURCE_DNS: &str = "DNSLOOKUP";
pub const SOURCE_NETINFO: &str = "NETINFO";
pub const SOURCE_HTTP_CODE: &str = "HTTP CODE";
pub const SOURCE_REPUTATION: &str = "REPUTATION";
pub const SOURCE_STDLOOKUP: &str = "STDLOOKUP";
pub const SOURCE_SPECIAL: &str = "SPECIAL";

/// Network handles used by the lookups.
pub(crate) struct Lookups<'a> {
    pub resolver: &'a TokioAsyncResolver,
    pub http: &'a reqwest::Client,
    pub timeout: Duration,
    pub http_codes: &'a HttpCodesConfig,
}

/// Everything known about the subject before any lookup runs.
pub(crate) struct Subject<'a> {
    pub kind: SubjectKind,
    pub subject: &'a str,
    pub idna_subject: String,
    pub syntax: SyntaxFlags,
    pub whois_server: Option<String>,
    pub reputation: Option<Arc<ReputationDb>>,
    pub user_agent: String,
}

/// How an HTTP status code reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpCodeClass {
    Up,
    PotentiallyUp,
    PotentiallyDown,
    Unknown,
}

pub fn classify_http_code(code: u16, codes: &HttpCodesConfig) -> HttpCodeClass {
    if codes.up.contains(&code) {
        HttpCodeClass::Up
    } else if codes.potentially_up.contains(&code) {
        HttpCodeClass::PotentiallyUp
    } else if codes.potentially_down.contains(&code) {
        HttpCodeClass::PotentiallyDown
    } else {
        HttpCodeClass::Unknown
    }
}

/// Downgrades an `ACTIVE` status whose HTTP status code says the content is
/// gone. Returns the new status and source.
pub fn apply_extra_rules(
    status: Availability,
    source: &str,
    http_status_code: Option<u16>,
    codes: &HttpCodesConfig,
) -> (Availability, String) {
    let down = http_status_code
        .is_some_and(|code| classify_http_code(code, codes) == HttpCodeClass::PotentiallyDown);
    if status == Availability::Active && down {
        (Availability::Inactive, SOURCE_SPECIAL.to_string())
    } else {
        (status, source.to_string())
    }
}

/// Host the network lookups target.
pub(crate) fn target_host(kind: SubjectKind, idna_subject: &str) -> Option<String> {
    match kind {
        SubjectKind::Url => Url::parse(idna_subject)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.trim_matches(['[', ']']).to_string())),
        _ => Some(idna_subject.trim_end_matches('.').to_string()),
    }
}

/// URL probed by the HTTP status code lookup.
fn probe_url(kind: SubjectKind, subject: &str, host: &str) -> String {
    match (kind, host.parse::<IpAddr>()) {
        (SubjectKind::Url, _) => subject.to_string(),
        (_, Ok(IpAddr::V6(v6))) => format!("http://[{}]", v6),
        _ => format!("http://{}", host),
    }
}

async fn probe_http_status(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Option<u16> {
    match client
        .get(url)
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => Some(response.status().as_u16()),
        Err(e) => {
            log::debug!("HTTP status lookup of {} failed: {}", url, e);
            None
        }
    }
}

fn base_status(subject: &Subject<'_>, params: &AvailabilityParams) -> AvailabilityStatus {
    AvailabilityStatus {
        subject: subject.subject.to_string(),
        idna_subject: subject.idna_subject.clone(),
        status: Availability::Inactive,
        status_source: SOURCE_STDLOOKUP.to_string(),
        tested_at: Utc::now(),
        syntax: subject.syntax.clone(),
        expiration_date: None,
        status_before_extra_rules: None,
        status_after_extra_rules: None,
        status_source_before_extra_rules: None,
        status_source_after_extra_rules: None,
        dns_lookup: None,
        netinfo: None,
        http_status_code: None,
        params: params.clone(),
    }
}

fn mark_active(status: &mut AvailabilityStatus, source: &str) {
    status.status = Availability::Active;
    status.status_source = source.to_string();
}

/// Runs the availability pipeline.
pub(crate) async fn check(
    lookups: &Lookups<'_>,
    subject: &Subject<'_>,
    params: &AvailabilityParams,
) -> AvailabilityStatus {
    let mut status = base_status(subject, params);

    if params.do_syntax_check_first && !subject.syntax.is_valid_for(subject.kind) {
        status.status = Availability::Invalid;
        status.status_source = SOURCE_SYNTAX.to_string();
        return status;
    }

    let Some(host) = target_host(subject.kind, &subject.idna_subject) else {
        return status;
    };
    let ip = host.parse::<IpAddr>().ok();

    if params.use_whois_lookup && ip.is_none() {
        if let Some(server) = subject.whois_server.as_deref() {
            match whois::query(server, &host, lookups.timeout).await {
                Ok(raw) => {
                    if let Some(date) = whois::extract_expiration_date(&raw) {
                        status.expiration_date = Some(whois::format_expiration_date(&date));
                        mark_active(&mut status, SOURCE_WHOIS);
                    }
                }
                Err(e) => log::debug!("WHOIS lookup of {} failed: {:#}", host, e),
            }
        }
    }

    if status.status != Availability::Active && params.use_dns_lookup {
        let records = match ip {
            Some(ip) => dns::lookup_ptr(ip, lookups.resolver).await,
            None => dns::lookup_domain(&host, lookups.resolver).await,
        };
        if dns::has_records(&records) {
            mark_active(&mut status, SOURCE_DNS);
        }
        status.dns_lookup = Some(records);
    }

    if status.status != Availability::Active && params.use_netinfo_lookup {
        let records: DnsRecords = match ip {
            Some(ip) => dns::lookup_ptr(ip, lookups.resolver).await,
            None => dns::resolve_addresses(&host, lookups.resolver).await,
        };
        if dns::has_records(&records) {
            mark_active(&mut status, SOURCE_NETINFO);
        }
        status.netinfo = Some(records);
    }

    let needs_http_code = status.status != Availability::Active || params.use_extra_rules;
    if params.use_http_code_lookup && needs_http_code {
        let url = probe_url(subject.kind, subject.subject, &host);
        status.http_status_code =
            probe_http_status(lookups.http, &url, &subject.user_agent, lookups.timeout).await;

        if status.status != Availability::Active {
            if let Some(code) = status.http_status_code {
                if matches!(
                    classify_http_code(code, lookups.http_codes),
                    HttpCodeClass::Up | HttpCodeClass::PotentiallyUp
                ) {
                    mark_active(&mut status, SOURCE_HTTP_CODE);
                }
            }
        }
    }

    if status.status != Availability::Active && params.use_reputation_lookup {
        if let Some(db) = subject.reputation.as_deref() {
            let addresses = reputation::ipv4_addresses(&host, lookups.resolver).await;
            if reputation::is_malicious(&addresses, db) {
                mark_active(&mut status, SOURCE_REPUTATION);
            }
        }
    }

    if params.use_extra_rules {
        let (after, source) = apply_extra_rules(
            status.status,
            &status.status_source,
            status.http_status_code,
            lookups.http_codes,
        );
        if after != status.status {
            status.status_before_extra_rules = Some(status.status);
            status.status_source_before_extra_rules = Some(status.status_source.clone());
            status.status_after_extra_rules = Some(after);
            status.status_source_after_extra_rules = Some(source.clone());
            status.status = after;
            status.status_source = source;
        }
    }

    status
}
