// Shared test helpers: dataset payloads and mock dataset sources.

use httptest::{matchers::*, responders::*, Expectation, Server};

use funceble_worker::config::Sources;

#[allow(dead_code)] // Used by other test files
pub const IANA_JSON: &str = r#"{"com": "whois.verisign-grs.com", "org": "whois.pir.org", "example": null}"#;
#[allow(dead_code)]
pub const PUBLIC_SUFFIX_JSON: &str = r#"{"com": ["com"], "org": ["org"], "uk": ["co.uk", "uk"]}"#;
#[allow(dead_code)]
pub const REPUTATION_DATA: &str = "198.51.100.7#4#2#Malicious Host#US##0,0#11\n";
#[allow(dead_code)]
pub const USER_AGENTS_JSON: &str = r#"{"chrome": {"linux": "Mozilla/5.0 (X11; Linux x86_64) Chrome/131.0"}}"#;

/// Sources pointing every dataset (and the location service) at `server`.
#[allow(dead_code)]
pub fn sources_for(server: &Server) -> Sources {
    Sources {
        iana: server.url("/iana.json").to_string(),
        public_suffix: server.url("/public-suffix.json").to_string(),
        ipv4_reputation: server.url("/reputation.data").to_string(),
        user_agents: server.url("/user_agents.json").to_string(),
        location: server.url("/json").to_string(),
    }
}

/// Serves the four datasets; the IANA one answers with `iana_status`.
#[allow(dead_code)]
pub fn expect_datasets(server: &Server, iana_status: u16) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/reputation.data"))
            .times(1..)
            .respond_with(status_code(200).body(REPUTATION_DATA)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/user_agents.json"))
            .times(1..)
            .respond_with(status_code(200).body(USER_AGENTS_JSON)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/public-suffix.json"))
            .times(1..)
            .respond_with(status_code(200).body(PUBLIC_SUFFIX_JSON)),
    );
    let iana = if iana_status == 200 {
        status_code(200).body(IANA_JSON)
    } else {
        status_code(iana_status).body("Service Unavailable")
    };
    server.expect(
        Expectation::matching(request::method_path("GET", "/iana.json"))
            .times(1..)
            .respond_with(iana),
    );
}
