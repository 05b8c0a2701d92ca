//! AdBlock filter line decoding.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

static HOSTNAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?(?:\.[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?)+$")
        .ok()
});

/// Decodes the subjects of an AdBlock filter line.
///
/// Understands network rules (`||example.org^`, `|https://example.org|`) and
/// element hiding rules (`example.org,example.net##.ad`). In aggressive mode
/// the domains listed in `$domain=` options are decoded too, negated or not.
pub fn adblock(data: &str, aggressive: bool) -> Vec<String> {
    let line = data.trim();
    if line.is_empty() || line.starts_with('!') || line.starts_with('[') {
        return Vec::new();
    }

    let mut subjects = Vec::new();

    if let Some((domains, _)) = split_element_hiding(line) {
        for domain in domains.split(',') {
            let domain = domain.trim();
            if domain.starts_with('~') && !aggressive {
                continue;
            }
            push_subject(&mut subjects, domain.trim_start_matches('~'));
        }
        return subjects;
    }

    // Exception rules unblock things, they don't list subjects
    if line.starts_with("@@") {
        return subjects;
    }

    let (pattern, options) = match line.split_once('$') {
        Some((pattern, options)) => (pattern, Some(options)),
        None => (line, None),
    };

    if let Some(host) = network_rule_host(pattern) {
        push_subject(&mut subjects, host);
    }

    if aggressive {
        for domain in options.into_iter().flat_map(option_domains) {
            push_subject(&mut subjects, domain);
        }
    }

    subjects
}

fn split_element_hiding(line: &str) -> Option<(&str, &str)> {
    ["#@#", "#?#", "#$#", "##"]
        .iter()
        .find_map(|marker| line.split_once(marker))
}

fn network_rule_host(pattern: &str) -> Option<&str> {
    let rest = if let Some(rest) = pattern.strip_prefix("||") {
        rest
    } else if let Some(rest) = pattern.strip_prefix('|') {
        rest.split_once("://").map(|(_, rest)| rest)?
    } else {
        return None;
    };

    let end = rest
        .find(|c: char| matches!(c, '^' | '/' | '|' | ':' | '?'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn option_domains(options: &str) -> impl Iterator<Item = &str> {
    options
        .split(',')
        .filter_map(|option| option.trim().strip_prefix("domain="))
        .flat_map(|domains| domains.split('|'))
        .map(|domain| domain.trim().trim_start_matches('~'))
}

fn push_subject(subjects: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim().trim_end_matches('.').to_lowercase();
    let valid = candidate.parse::<IpAddr>().is_ok()
        || HOSTNAME.as_ref().is_some_and(|re| re.is_match(&candidate));
    if valid && !subjects.contains(&candidate) {
        subjects.push(candidate);
    }
}
