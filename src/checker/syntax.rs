//! Syntax rules for domains, IP addresses and URLs.
//!
//! Domain rules need the IANA dataset (known TLDs) and the public suffix
//! dataset (registrable domains); IP rules need nothing.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use super::types::{SubjectKind, SyntaxFlags};
use crate::datasets::{IanaDb, PublicSuffixDb};

const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Converts a subject to its ASCII (punycode) form when it is a domain.
pub fn to_idna(subject: &str) -> String {
    match Host::parse(subject) {
        Ok(Host::Domain(ascii)) => ascii,
        _ => subject.to_string(),
    }
}

pub fn is_ipv4(subject: &str) -> bool {
    subject.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(subject: &str) -> bool {
    subject.parse::<Ipv6Addr>().is_ok()
}

pub fn is_ip(subject: &str) -> bool {
    subject.parse::<IpAddr>().is_ok()
}

/// `addr/prefix` with a prefix in range for the address family.
fn split_range(subject: &str) -> Option<(&str, u8)> {
    let (address, prefix) = subject.split_once('/')?;
    let prefix = prefix.parse::<u8>().ok()?;
    Some((address, prefix))
}

pub fn is_ipv4_range(subject: &str) -> bool {
    split_range(subject).is_some_and(|(address, prefix)| is_ipv4(address) && prefix <= 32)
}

pub fn is_ipv6_range(subject: &str) -> bool {
    split_range(subject).is_some_and(|(address, prefix)| is_ipv6(address) && prefix <= 128)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Whether `subject` is a syntactically valid domain under a known TLD.
pub fn is_domain(subject: &str, iana: &IanaDb) -> bool {
    let ascii = to_idna(subject).to_ascii_lowercase();
    let domain = ascii.strip_suffix('.').unwrap_or(&ascii);

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LENGTH || is_ip(domain) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_valid_label(label)) {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| iana.contains_key(*tld))
}

/// Returns the registrable domain of `domain`: its public suffix plus one
/// label. Unknown TLDs are treated as a single-label suffix.
pub fn registrable_domain(domain: &str, psl: &PublicSuffixDb) -> Option<String> {
    let ascii = to_idna(domain).to_ascii_lowercase();
    let domain = ascii.strip_suffix('.').unwrap_or(&ascii);
    let labels: Vec<&str> = domain.split('.').collect();
    let tld = labels.last()?;

    let mut suffix_len = 1;
    if let Some(suffixes) = psl.get(*tld) {
        for suffix in suffixes {
            if suffix.starts_with('!') {
                continue;
            }
            let suffix_labels: Vec<&str> = suffix.split('.').collect();
            if suffix_labels.len() > labels.len() || suffix_labels.len() <= suffix_len {
                continue;
            }
            let tail = &labels[labels.len() - suffix_labels.len()..];
            let matches = suffix_labels
                .iter()
                .zip(tail)
                .all(|(rule, label)| *rule == "*" || rule == label);
            if matches {
                suffix_len = suffix_labels.len();
            }
        }
    }

    if labels.len() <= suffix_len {
        return None;
    }
    Some(labels[labels.len() - suffix_len - 1..].join("."))
}

/// Whether `subject` is a valid http(s) URL whose host is a valid domain or
/// an IP address.
pub fn is_url(subject: &str, iana: &IanaDb) -> bool {
    let Ok(url) = Url::parse(subject) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => is_domain(domain, iana),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Domain syntax flags. Empty when the subject isn't a domain at all.
pub fn domain_flags(subject: &str, iana: &IanaDb, psl: &PublicSuffixDb) -> SyntaxFlags {
    let valid = is_domain(subject, iana);
    let registrable = if valid {
        registrable_domain(subject, psl)
    } else {
        None
    };
    let normalized = to_idna(subject).to_ascii_lowercase();
    let normalized = normalized.trim_end_matches('.');

    let second_level = registrable.as_deref() == Some(normalized);
    let subdomain = registrable
        .as_deref()
        .is_some_and(|registrable| registrable != normalized);

    SyntaxFlags {
        domain_syntax: Some(valid),
        second_level_domain_syntax: Some(valid && second_level),
        subdomain_syntax: Some(valid && subdomain),
        ..Default::default()
    }
}

pub fn ip_flags(subject: &str) -> SyntaxFlags {
    let ipv4 = is_ipv4(subject);
    let ipv6 = is_ipv6(subject);
    SyntaxFlags {
        ip_syntax: Some(ipv4 || ipv6),
        ipv4_syntax: Some(ipv4),
        ipv6_syntax: Some(ipv6),
        ipv4_range_syntax: Some(is_ipv4_range(subject)),
        ipv6_range_syntax: Some(is_ipv6_range(subject)),
        ..Default::default()
    }
}

pub fn url_flags(subject: &str, iana: &IanaDb) -> SyntaxFlags {
    SyntaxFlags {
        url_syntax: Some(is_url(subject, iana)),
        ..Default::default()
    }
}

/// Every flag relevant for a check of the given kind.
pub fn flags_for(
    kind: SubjectKind,
    subject: &str,
    iana: &IanaDb,
    psl: &PublicSuffixDb,
) -> SyntaxFlags {
    match kind {
        SubjectKind::Domain => domain_flags(subject, iana, psl),
        SubjectKind::Ip => ip_flags(subject),
        SubjectKind::Url => url_flags(subject, iana),
        SubjectKind::DomainAndIp => {
            let domain = domain_flags(subject, iana, psl);
            SyntaxFlags {
                domain_syntax: domain.domain_syntax,
                second_level_domain_syntax: domain.second_level_domain_syntax,
                subdomain_syntax: domain.subdomain_syntax,
                ..ip_flags(subject)
            }
        }
    }
}
