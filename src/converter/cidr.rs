//! IPv4 range expansion.

use std::net::Ipv4Addr;

use crate::config::MAX_CIDR_EXPANSION;

/// Expands an IPv4 range (`192.0.2.0/30`) into its host addresses.
///
/// Anything that isn't an IPv4 range gives an empty list. Ranges larger than
/// the expansion limit are truncated to it.
pub fn cidr(data: &str) -> Vec<String> {
    let Some((address, prefix)) = parse_ipv4_range(data.trim()) else {
        return Vec::new();
    };

    let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    let network = u64::from(u32::from(address) & mask);
    let size = 1u64 << (32 - prefix);

    // Network and broadcast addresses aren't hosts, except for /31 and /32
    let (first, last) = if prefix >= 31 {
        (network, network + size - 1)
    } else {
        (network + 1, network + size - 2)
    };

    let count = (last - first + 1).min(MAX_CIDR_EXPANSION);
    (first..first + count)
        .filter_map(|raw| u32::try_from(raw).ok())
        .map(|raw| Ipv4Addr::from(raw).to_string())
        .collect()
}

fn parse_ipv4_range(data: &str) -> Option<(Ipv4Addr, u32)> {
    let (address, prefix) = data.split_once('/')?;
    let address: Ipv4Addr = address.parse().ok()?;
    let prefix: u32 = prefix.parse().ok()?;
    (prefix <= 32).then_some((address, prefix))
}
