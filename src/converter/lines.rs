//! Hosts-file and plain line conversion.

use std::net::IpAddr;

/// Subjects of a hosts-file line (`0.0.0.0 example.org www.example.org`).
pub fn hosts(data: &str) -> Vec<String> {
    subjects_of_line(data)
}

/// Subjects of a plain list line. Plain lists may also carry hosts entries.
pub fn plain(data: &str) -> Vec<String> {
    subjects_of_line(data)
}

fn subjects_of_line(data: &str) -> Vec<String> {
    let line = match data.split_once('#') {
        Some((before, _)) => before,
        None => data,
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let subjects = match tokens.as_slice() {
        [] => return Vec::new(),
        [first, rest @ ..] if !rest.is_empty() && first.parse::<IpAddr>().is_ok() => rest,
        all => all,
    };

    let mut result: Vec<String> = Vec::with_capacity(subjects.len());
    for subject in subjects {
        if !result.iter().any(|known| known == subject) {
            result.push(subject.to_string());
        }
    }
    result
}
