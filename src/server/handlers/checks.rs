//! Availability, reputation and syntax handlers.
//!
//! Checkers are blocking, so every call runs on the blocking thread pool.

use axum::extract::{Query, State};
use axum::Json;

use super::super::error::{ApiError, ApiResult};
use super::super::types::{
    AppState, AvailabilityQuery, ReputationQuery, SubjectBody, UrlAvailabilityQuery,
};
use crate::checker::{
    normalize_subject, AvailabilityParams, AvailabilityStatus, ReputationParams,
    ReputationStatus, SubjectKind, SyntaxStatus,
};
use crate::error_handling::CheckerError;

async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CheckerError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(job).await??)
}

async fn availability(
    state: AppState,
    kind: SubjectKind,
    body: SubjectBody,
    params: AvailabilityParams,
) -> ApiResult<AvailabilityStatus> {
    normalize_subject(&body.subject)?;
    log::debug!("Availability check of {} ({})", body.subject.trim(), kind);

    let checker = state.checker.clone();
    let status = run_blocking(move || checker.availability(kind, &body.subject, &params)).await?;
    Ok(Json(status))
}

async fn reputation(
    state: AppState,
    kind: SubjectKind,
    body: SubjectBody,
    params: ReputationParams,
) -> ApiResult<ReputationStatus> {
    normalize_subject(&body.subject)?;
    log::debug!("Reputation check of {} ({})", body.subject.trim(), kind);

    let checker = state.checker.clone();
    let status = run_blocking(move || checker.reputation(kind, &body.subject, &params)).await?;
    Ok(Json(status))
}

async fn syntax(state: AppState, kind: SubjectKind, body: SubjectBody) -> ApiResult<SyntaxStatus> {
    normalize_subject(&body.subject)?;

    let checker = state.checker.clone();
    let status = run_blocking(move || checker.syntax(kind, &body.subject)).await?;
    Ok(Json(status))
}

pub async fn availability_domain(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<AvailabilityStatus> {
    let params = query.into_params(state.whois);
    availability(state, SubjectKind::Domain, body, params).await
}

pub async fn availability_ip(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<AvailabilityStatus> {
    let params = query.into_params(state.whois);
    availability(state, SubjectKind::Ip, body, params).await
}

pub async fn availability_domain_and_ip(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<AvailabilityStatus> {
    let params = query.into_params(state.whois);
    availability(state, SubjectKind::DomainAndIp, body, params).await
}

pub async fn availability_url(
    State(state): State<AppState>,
    Query(query): Query<UrlAvailabilityQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<AvailabilityStatus> {
    let params = query.into_params(state.whois);
    availability(state, SubjectKind::Url, body, params).await
}

pub async fn reputation_domain(
    State(state): State<AppState>,
    Query(query): Query<ReputationQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<ReputationStatus> {
    reputation(state, SubjectKind::Domain, body, query.into()).await
}

pub async fn reputation_url(
    State(state): State<AppState>,
    Query(query): Query<ReputationQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<ReputationStatus> {
    reputation(state, SubjectKind::Url, body, query.into()).await
}

pub async fn reputation_ip(
    State(state): State<AppState>,
    Query(query): Query<ReputationQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<ReputationStatus> {
    reputation(state, SubjectKind::Ip, body, query.into()).await
}

pub async fn reputation_domain_and_ip(
    State(state): State<AppState>,
    Query(query): Query<ReputationQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<ReputationStatus> {
    reputation(state, SubjectKind::DomainAndIp, body, query.into()).await
}

pub async fn syntax_domain(
    State(state): State<AppState>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<SyntaxStatus> {
    syntax(state, SubjectKind::Domain, body).await
}

pub async fn syntax_ip(
    State(state): State<AppState>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<SyntaxStatus> {
    syntax(state, SubjectKind::Ip, body).await
}

pub async fn syntax_url(
    State(state): State<AppState>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<SyntaxStatus> {
    syntax(state, SubjectKind::Url, body).await
}
