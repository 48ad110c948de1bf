//! Route handlers.

use am_05_campaign_rewards::{CreateCampaignRequest, FundCampaignRequest, SubmitAnswersRequest};
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use shared_types::LookupQuestion;
use tracing::info;

use crate::http::error::ApiError;
use crate::http::AppState;

/// Header carrying the JSON array of topics a submission targets.
pub const TOPICS_HEADER: &str = "x-topics";

fn parse_topics(headers: &HeaderMap) -> Result<Vec<String>, ApiError> {
    let raw = headers
        .get(TOPICS_HEADER)
        .ok_or_else(|| ApiError::bad_request("Missing x-topics header"))?;
    let raw = raw
        .to_str()
        .map_err(|_| ApiError::bad_request("x-topics header is not valid text"))?;
    serde_json::from_str(raw)
        .map_err(|_| ApiError::bad_request("x-topics header must be a JSON array of strings"))
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let topics = parse_topics(&headers)?;
    let steak = state.host.submit(&body, &topics).await?;
    Ok(Json(steak))
}

pub async fn lookup(
    State(state): State<AppState>,
    question: Result<Json<LookupQuestion>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(question) = question?;
    let response = state.host.lookup(&question).await?;
    Ok(Json(response))
}

pub async fn list_topic_managers(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.host.topic_managers().await)
}

pub async fn list_lookup_services(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.host.lookup_services().await)
}

#[derive(Debug, Deserialize)]
pub struct TopicManagerParams {
    manager: String,
}

pub async fn topic_manager_documentation(
    State(state): State<AppState>,
    params: Result<Query<TopicManagerParams>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(params) = params?;
    state
        .host
        .topic_manager_documentation(&params.manager)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Topic manager {} not found", params.manager)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupServiceParams {
    lookup_service: String,
}

pub async fn lookup_service_documentation(
    State(state): State<AppState>,
    params: Result<Query<LookupServiceParams>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(params) = params?;
    state
        .host
        .lookup_service_documentation(&params.lookup_service)
        .await
        .ok_or_else(|| {
            ApiError::not_found(format!("Lookup service {} not found", params.lookup_service))
        })
}

pub async fn fund(
    State(state): State<AppState>,
    request: Result<Json<FundCampaignRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let response = state
        .campaigns
        .fund(request)
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to process funding"))?;
    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
pub struct FundingRecordsRequest {
    #[serde(default)]
    ids: Option<Vec<String>>,
}

pub async fn funding_records(
    State(state): State<AppState>,
    request: Result<Json<FundingRecordsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = request
        .ok()
        .and_then(|Json(r)| r.ids)
        .ok_or_else(|| ApiError::bad_request("Missing or invalid ids array in request body"))?;
    let records = state
        .campaigns
        .funding_records(&ids)
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to fetch funding records"))?;
    Ok(Json(json!({ "success": true, "fundingRecords": records })))
}

pub async fn funded_ads(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ads = state
        .campaigns
        .funded_ads()
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to fetch funded ads"))?;
    Ok(Json(json!({ "success": true, "ads": ads })))
}

pub async fn submit_answers(
    State(state): State<AppState>,
    request: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let payment = state
        .campaigns
        .submit_answers(request)
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to submit answers"))?;
    info!(
        amount = payment.amount,
        correct = payment.correct_answers,
        "[am-05] Reward issued"
    );
    Ok(Json(payment))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    request: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let created = state
        .campaigns
        .create_campaign(request)
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to create campaign"))?;
    Ok(Json(created))
}

pub async fn advertiser_campaigns(
    State(state): State<AppState>,
    Path(advertiser_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = state
        .campaigns
        .advertiser_campaigns(&advertiser_id)
        .await
        .map_err(|e| ApiError::from_campaign(e, "Failed to fetch campaigns"))?;
    Ok(Json(campaigns))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "ad-node",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
