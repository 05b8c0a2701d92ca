//! DNS lookups (A, AAAA, CNAME, NS, PTR).

use std::collections::BTreeMap;
use std::net::IpAddr;

use hickory_resolver::error::ResolveError;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::{IntoName, Name, TokioAsyncResolver};

/// Record type -> records. `None` when the query itself failed.
pub type DnsRecords = BTreeMap<String, Option<Vec<String>>>;

const DOMAIN_RECORD_TYPES: [RecordType; 4] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::NS,
];

/// Queries one record type.
///
/// "No records" answers are an empty vector; timeouts and other failures are
/// errors.
pub async fn lookup_records<N: IntoName>(
    name: N,
    record_type: RecordType,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, ResolveError> {
    match resolver.lookup(name, record_type).await {
        Ok(lookup) => Ok(lookup
            .iter()
            .filter(|rdata| rdata.record_type() == record_type)
            .map(|rdata| rdata.to_string())
            .collect()),
        Err(e) => {
            let error_msg = e.to_string();
            // "no records found" is expected for many names
            if error_msg.contains("no records found") || error_msg.contains("NXDomain") {
                Ok(Vec::new())
            } else {
                if error_msg.contains("timeout") || error_msg.contains("timed out") {
                    log::warn!("{record_type} lookup timed out: {e}");
                } else {
                    log::warn!("Failed to lookup {record_type} records: {e}");
                }
                Err(e)
            }
        }
    }
}

fn into_entry(result: Result<Vec<String>, ResolveError>) -> Option<Vec<String>> {
    result.ok()
}

/// Queries A, AAAA, CNAME and NS records of a domain.
pub async fn lookup_domain(domain: &str, resolver: &TokioAsyncResolver) -> DnsRecords {
    let mut records = DnsRecords::new();
    for record_type in DOMAIN_RECORD_TYPES {
        let result = lookup_records(domain, record_type, resolver).await;
        records.insert(record_type.to_string(), into_entry(result));
    }
    records
}

/// Queries the PTR records of an address.
pub async fn lookup_ptr(ip: IpAddr, resolver: &TokioAsyncResolver) -> DnsRecords {
    let mut records = DnsRecords::new();
    let result = lookup_records(Name::from(ip), RecordType::PTR, resolver).await;
    records.insert(RecordType::PTR.to_string(), into_entry(result));
    records
}

/// Resolves a host to its addresses, split by family.
pub async fn resolve_addresses(host: &str, resolver: &TokioAsyncResolver) -> DnsRecords {
    let mut records = DnsRecords::new();
    match resolver.lookup_ip(host).await {
        Ok(lookup) => {
            let (v4, v6): (Vec<IpAddr>, Vec<IpAddr>) = lookup.iter().partition(IpAddr::is_ipv4);
            records.insert(
                "A".to_string(),
                Some(v4.iter().map(IpAddr::to_string).collect()),
            );
            records.insert(
                "AAAA".to_string(),
                Some(v6.iter().map(IpAddr::to_string).collect()),
            );
        }
        Err(e) => {
            log::debug!("Address resolution failed for {host}: {e}");
            records.insert("A".to_string(), None);
            records.insert("AAAA".to_string(), None);
        }
    }
    records
}

/// Whether at least one record was found.
pub fn has_records(records: &DnsRecords) -> bool {
    records
        .values()
        .any(|entry| entry.as_ref().is_some_and(|values| !values.is_empty()))
}
