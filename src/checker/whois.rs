//! WHOIS (port 43) lookups and expiration date extraction.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::{MAX_WHOIS_RESPONSE_SIZE, WHOIS_PORT};

/// Keys under which registries publish the expiration date.
const EXPIRATION_MARKERS: [&str; 12] = [
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expiration time",
    "expires on",
    "expires",
    "expire",
    "paid-till",
    "renewal date",
    "free-date",
    "validity",
];

/// Sends a WHOIS query and returns the raw response.
pub async fn query(server: &str, domain: &str, timeout: Duration) -> Result<String, anyhow::Error> {
    query_at(server, WHOIS_PORT, domain, timeout).await
}

async fn query_at(
    server: &str,
    port: u16,
    domain: &str,
    timeout: Duration,
) -> Result<String, anyhow::Error> {
    let exchange = async {
        let mut stream = TcpStream::connect((server, port)).await?;
        stream.write_all(format!("{}\r\n", domain).as_bytes()).await?;

        let mut raw = Vec::new();
        stream
            .take(MAX_WHOIS_RESPONSE_SIZE as u64)
            .read_to_end(&mut raw)
            .await?;
        Ok::<_, std::io::Error>(raw)
    };

    let raw = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| anyhow::anyhow!("WHOIS query to {} timed out", server))??;

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Finds the expiration date in a raw WHOIS response.
pub fn extract_expiration_date(raw: &str) -> Option<DateTime<Utc>> {
    raw.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_lowercase();
        if !EXPIRATION_MARKERS.contains(&key.as_str()) {
            return None;
        }
        parse_date_string(value.trim())
    })
}

/// Formats an expiration date the way it's reported (`02-jan-2030`).
pub fn format_expiration_date(date: &DateTime<Utc>) -> String {
    date.format("%d-%b-%Y").to_string().to_lowercase()
}

/// Attempts to parse a date string in various formats
fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common WHOIS date formats
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%Y.%m.%d",
        "%Y/%m/%d",
        "%d-%b-%Y",
        "%d.%m.%Y",
        "%d/%m/%Y",
    ];

    // Some registries append a timezone name ("2030-01-02 00:00:00 CLST")
    let candidates = [
        date_str,
        date_str
            .rsplit_once(' ')
            .map(|(head, _)| head)
            .unwrap_or(date_str),
    ];

    for candidate in candidates {
        for format in &formats {
            if let Ok(dt) = DateTime::parse_from_str(candidate, format) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive_dt) = chrono::NaiveDateTime::parse_from_str(candidate, format) {
                return Some(naive_dt.and_utc());
            }
            if let Ok(naive_date) = chrono::NaiveDate::parse_from_str(candidate, format) {
                return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_string_iso8601_with_millis() {
        let dt = parse_date_string("2024-01-15T10:30:45.123Z").unwrap();
        assert!(dt.format("%Y-%m-%d").to_string().starts_with("2024-01-15"));
    }

    #[test]
    fn test_parse_date_string_space_separated() {
        let dt = parse_date_string("2024-01-15 10:30:45").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "10:30:45");
    }

    #[test]
    fn test_parse_date_string_dd_mmm_yyyy() {
        let dt = parse_date_string("15-Jan-2024").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_date_string_with_zone_name() {
        let dt = parse_date_string("2024-01-15 10:30:45 CLST").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_date_string_invalid() {
        assert!(parse_date_string("not a date").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_extract_expiration_date() {
        let raw = "Domain Name: EXAMPLE.COM\r\n\
                   Registrar: Example Registrar\r\n\
                   Registry Expiry Date: 2030-08-13T04:00:00Z\r\n\
                   Name Server: A.IANA-SERVERS.NET\r\n";
        let date = extract_expiration_date(raw).unwrap();
        assert_eq!(format_expiration_date(&date), "13-aug-2030");
    }

    #[test]
    fn test_extract_expiration_date_other_marker() {
        let raw = "domain: example.ru\npaid-till: 2031-02-01T00:00:00Z\n";
        let date = extract_expiration_date(raw).unwrap();
        assert_eq!(date.format("%Y").to_string(), "2031");
    }

    #[test]
    fn test_extract_expiration_date_missing() {
        assert!(extract_expiration_date("No match for \"EXAMPLE.INVALID\".\n").is_none());
    }

    #[tokio::test]
    async fn test_query_reads_full_response() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let n = socket.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"example.com\r\n");
            socket
                .write_all(b"Registry Expiry Date: 2030-08-13T04:00:00Z\r\n")
                .await
                .unwrap();
        });

        let raw = query_at("127.0.0.1", port, "example.com", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(extract_expiration_date(&raw).is_some());
    }

    #[tokio::test]
    async fn test_query_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accept but never answer
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let result = query_at("127.0.0.1", port, "example.com", Duration::from_millis(200)).await;
        assert!(result.unwrap_err().to_string().contains("timed out"));
    }
}
