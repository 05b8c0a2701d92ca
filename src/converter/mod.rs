//! Line-format converters.
//!
//! Each converter turns one input line (or subject) into the testable
//! subjects it contains. Converters are pure and never touch the network.

mod adblock;
mod cidr;
mod lines;
mod rpz;

pub use adblock::adblock;
pub use cidr::cidr;
pub use lines::{hosts, plain};
pub use rpz::rpz;

const WWW_PREFIX: &str = "www.";

/// Provides the `www.` complement of a subject.
///
/// `example.org` gives `www.example.org` and the other way round. With
/// `include_given` the subject itself comes first.
pub fn complements(subject: &str, include_given: bool) -> Vec<String> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Vec::new();
    }

    let complement = match subject.strip_prefix(WWW_PREFIX) {
        Some("") => None,
        Some(rest) => Some(rest.to_string()),
        None => Some(format!("{}{}", WWW_PREFIX, subject)),
    };

    let mut result = Vec::with_capacity(2);
    if include_given {
        result.push(subject.to_string());
    }
    result.extend(complement);
    result
}

/// Strips the wildcard in front of a subject (`*.example.org` -> `example.org`).
pub fn wildcard(data: &str) -> String {
    let data = data.trim();
    let mut subject = data;
    while let Some(rest) = subject.strip_prefix("*.") {
        subject = rest;
    }
    subject.trim_start_matches('.').to_string()
}
