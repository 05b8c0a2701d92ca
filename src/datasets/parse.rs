//! Parsers for the reference dataset file formats.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;

/// TLD -> WHOIS server (if the registry publishes one).
pub type IanaDb = HashMap<String, Option<String>>;
/// TLD -> public suffixes under that TLD.
pub type PublicSuffixDb = HashMap<String, Vec<String>>;
/// Known malicious IPv4 addresses.
pub type ReputationDb = HashSet<Ipv4Addr>;
/// Browser -> platform -> user agent.
pub type UserAgentDb = HashMap<String, HashMap<String, String>>;

pub fn parse_iana(bytes: &[u8]) -> Result<IanaDb, String> {
    let raw: HashMap<String, Option<String>> =
        serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    Ok(raw
        .into_iter()
        .map(|(tld, server)| {
            let server = server.filter(|s| !s.trim().is_empty());
            (tld.trim_start_matches('.').to_lowercase(), server)
        })
        .collect())
}

pub fn parse_public_suffix(bytes: &[u8]) -> Result<PublicSuffixDb, String> {
    let raw: HashMap<String, Vec<String>> =
        serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    Ok(raw
        .into_iter()
        .map(|(tld, suffixes)| {
            (
                tld.to_lowercase(),
                suffixes.into_iter().map(|s| s.to_lowercase()).collect(),
            )
        })
        .collect())
}

/// Parses the IPv4 reputation list.
///
/// One entry per line, fields separated by `#`, the first field is the
/// address. Blank lines, comments and unparseable addresses are skipped.
/// A payload without a single address is rejected so an error page served
/// with a 200 can't wipe the list.
pub fn parse_ipv4_reputation(bytes: &[u8]) -> Result<ReputationDb, String> {
    let text = String::from_utf8_lossy(bytes);
    let mut db = HashSet::new();
    let mut non_empty_lines = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        non_empty_lines += 1;
        let address = line.split('#').next().unwrap_or_default().trim();
        if let Ok(ip) = address.parse::<Ipv4Addr>() {
            db.insert(ip);
        }
    }

    if db.is_empty() && non_empty_lines > 0 {
        return Err("no IPv4 address found in reputation data".to_string());
    }
    Ok(db)
}

pub fn parse_user_agents(bytes: &[u8]) -> Result<UserAgentDb, String> {
    let raw: HashMap<String, HashMap<String, Option<String>>> =
        serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    Ok(raw
        .into_iter()
        .map(|(browser, platforms)| {
            let platforms = platforms
                .into_iter()
                .filter_map(|(platform, ua)| ua.map(|ua| (platform.to_lowercase(), ua)))
                .collect();
            (browser.to_lowercase(), platforms)
        })
        .collect())
}
