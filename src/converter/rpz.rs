//! RPZ (response policy zone) policy decoding.

use std::net::{Ipv4Addr, Ipv6Addr};

const IP_TRIGGERS: [&str; 3] = ["rpz-client-ip", "rpz-nsip", "rpz-ip"];
const NSDNAME_TRIGGER: &str = "rpz-nsdname";

/// Decodes the subject of an RPZ policy line.
///
/// Takes the owner name of the record, strips the zone (`soas`) and wildcard
/// parts and turns IP triggers (`32.1.2.0.192.rpz-ip`) back into `IP/prefix`.
/// Comments, zone directives and `rpz-*` action records give nothing.
pub fn rpz(data: &str, soas: &[String]) -> Vec<String> {
    let line = match data.split_once(';') {
        Some((before, _)) => before,
        None => data,
    };
    let line = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };

    let Some(owner) = line.split_whitespace().next() else {
        return Vec::new();
    };
    if owner.starts_with('$') || owner == "@" || owner == "(" || owner == ")" {
        return Vec::new();
    }

    decode_policy(owner, soas).into_iter().collect()
}

fn decode_policy(owner: &str, soas: &[String]) -> Option<String> {
    let mut name = owner.trim_end_matches('.').to_lowercase();

    for soa in soas {
        let soa = soa.trim().trim_end_matches('.').to_lowercase();
        if soa.is_empty() {
            continue;
        }
        if name == soa {
            return None;
        }
        if let Some(stripped) = name.strip_suffix(&format!(".{}", soa)) {
            name = stripped.to_string();
            break;
        }
    }

    while let Some(rest) = name.strip_prefix("*.") {
        name = rest.to_string();
    }

    for trigger in IP_TRIGGERS {
        if let Some(encoded) = name.strip_suffix(&format!(".{}", trigger)) {
            return decode_ip_trigger(encoded);
        }
    }
    if let Some(domain) = name.strip_suffix(&format!(".{}", NSDNAME_TRIGGER)) {
        return Some(domain.to_string());
    }

    if name.is_empty() || name.starts_with("rpz-") {
        return None;
    }
    Some(name)
}

/// `32.1.2.0.192` -> `192.0.2.1/32`, `48.zz.1.db8.2001` -> `2001:db8:1::/48`.
fn decode_ip_trigger(encoded: &str) -> Option<String> {
    let mut labels = encoded.split('.');
    let prefix: u8 = labels.next()?.parse().ok()?;
    let mut parts: Vec<&str> = labels.collect();
    parts.reverse();

    if parts.len() == 4 && prefix <= 32 {
        let address: Ipv4Addr = parts.join(".").parse().ok()?;
        return Some(format!("{}/{}", address, prefix));
    }

    if prefix > 128 {
        return None;
    }
    let joined = parts
        .iter()
        .map(|part| if *part == "zz" { "" } else { part })
        .collect::<Vec<_>>()
        .join(":");
    let candidate = if joined.starts_with(':') {
        format!(":{}", joined)
    } else if joined.ends_with(':') {
        format!("{}:", joined)
    } else {
        joined
    };
    let address: Ipv6Addr = candidate.parse().ok()?;
    Some(format!("{}/{}", address, prefix))
}
