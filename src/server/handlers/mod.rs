//! API HTTP handlers.

mod checks;
pub mod converter;
mod info;

pub use checks::{
    availability_domain, availability_domain_and_ip, availability_ip, availability_url,
    reputation_domain, reputation_domain_and_ip, reputation_ip, reputation_url, syntax_domain,
    syntax_ip, syntax_url,
};
pub use info::{info_handler, links_handler};
