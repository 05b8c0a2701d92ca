//! Reputation lookups against the IPv4 reputation dataset.

use std::net::{IpAddr, Ipv4Addr};

use hickory_resolver::TokioAsyncResolver;

use crate::datasets::ReputationDb;

/// Whether any of the addresses is listed.
pub fn is_malicious(addresses: &[Ipv4Addr], db: &ReputationDb) -> bool {
    addresses.iter().any(|address| db.contains(address))
}

/// IPv4 addresses a host stands for: itself when it is an address,
/// its A records otherwise.
pub async fn ipv4_addresses(host: &str, resolver: &TokioAsyncResolver) -> Vec<Ipv4Addr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => vec![v4],
            IpAddr::V6(_) => Vec::new(),
        };
    }

    match resolver.ipv4_lookup(host).await {
        Ok(lookup) => lookup.iter().map(|a| a.0).collect(),
        Err(e) => {
            log::debug!("No IPv4 address for {}: {}", host, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_malicious() {
        let db: ReputationDb = [Ipv4Addr::new(198, 51, 100, 7)].into_iter().collect();
        assert!(is_malicious(
            &[Ipv4Addr::new(192, 0, 2, 1), Ipv4Addr::new(198, 51, 100, 7)],
            &db
        ));
        assert!(!is_malicious(&[Ipv4Addr::new(192, 0, 2, 1)], &db));
        assert!(!is_malicious(&[], &db));
    }
}
