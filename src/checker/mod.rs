//! Subject checking.
//!
//! The [`Checker`] trait is the seam between the HTTP API and the checking
//! engine. Its methods are blocking; the API runs them on the blocking thread
//! pool. [`BuiltinChecker`] is the engine shipped with the worker.

pub(crate) mod availability;
mod builtin;
pub mod dns;
pub mod reputation;
pub mod syntax;
mod types;
pub mod user_agent;
pub mod whois;

pub use availability::{
    apply_extra_rules, classify_http_code, HttpCodeClass, SOURCE_DNS, SOURCE_HTTP_CODE,
    SOURCE_NETINFO, SOURCE_REPUTATION, SOURCE_SPECIAL, SOURCE_STDLOOKUP, SOURCE_SYNTAX,
    SOURCE_WHOIS,
};
pub use builtin::{BuiltinChecker, BUILTIN_CHECKER_VERSION};
pub use types::{
    Availability, AvailabilityParams, AvailabilityStatus, Reputation, ReputationParams,
    ReputationStatus, SubjectKind, SyntaxFlags, SyntaxStatus, Validity,
};

use crate::error_handling::CheckerError;

/// A checking engine.
///
/// Every method receives the raw subject; implementations reject subjects
/// that are empty after trimming with [`CheckerError::EmptySubject`].
pub trait Checker: Send + Sync {
    /// Version string reported by `/info`.
    fn version(&self) -> &str;

    fn availability(
        &self,
        kind: SubjectKind,
        subject: &str,
        params: &AvailabilityParams,
    ) -> Result<AvailabilityStatus, CheckerError>;

    fn reputation(
        &self,
        kind: SubjectKind,
        subject: &str,
        params: &ReputationParams,
    ) -> Result<ReputationStatus, CheckerError>;

    fn syntax(&self, kind: SubjectKind, subject: &str) -> Result<SyntaxStatus, CheckerError>;
}

/// Trims a subject, rejecting empty ones.
pub fn normalize_subject(subject: &str) -> Result<&str, CheckerError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(CheckerError::EmptySubject);
    }
    Ok(subject)
}
