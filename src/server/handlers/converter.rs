//! Converter handlers.

use axum::extract::Query;
use axum::Json;

use super::super::error::ApiResult;
use super::super::types::{AdblockQuery, ComplementsQuery, DataBody, RpzBody, SubjectBody};
use crate::checker::normalize_subject;
use crate::converter;

pub async fn complements(
    Query(query): Query<ComplementsQuery>,
    Json(body): Json<SubjectBody>,
) -> ApiResult<Vec<String>> {
    let subject = normalize_subject(&body.subject)?;
    Ok(Json(converter::complements(subject, query.include_given)))
}

pub async fn adblock(
    Query(query): Query<AdblockQuery>,
    Json(body): Json<DataBody>,
) -> Json<Vec<String>> {
    Json(converter::adblock(&body.data, query.aggressive))
}

pub async fn cidr(Json(body): Json<DataBody>) -> Json<Vec<String>> {
    Json(converter::cidr(&body.data))
}

pub async fn wildcard(Json(body): Json<DataBody>) -> Json<String> {
    Json(converter::wildcard(&body.data))
}

pub async fn hosts(Json(body): Json<DataBody>) -> Json<Vec<String>> {
    Json(converter::hosts(&body.data))
}

pub async fn plain(Json(body): Json<DataBody>) -> Json<Vec<String>> {
    Json(converter::plain(&body.data))
}

pub async fn rpz(Json(body): Json<RpzBody>) -> Json<Vec<String>> {
    let soas = body.soas.unwrap_or_default();
    Json(converter::rpz(&body.data, &soas))
}
