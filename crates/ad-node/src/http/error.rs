//! HTTP error bodies: `{"error": "..."}` with a 400, 404 or 500 status.

use am_04_lookup_service::LookupError;
use am_05_campaign_rewards::CampaignError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::host::HostError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Log `cause` and answer with the generic `message`.
    pub fn internal(message: impl Into<String>, cause: &dyn std::fmt::Display) -> Self {
        let message = message.into();
        error!("{}: {}", message, cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn from_campaign(e: CampaignError, failure: &str) -> Self {
        match e {
            CampaignError::FundingNotFound(_) => Self::not_found(e.to_string()),
            e if e.is_client_error() => Self::bad_request(e.to_string()),
            e => Self::internal(failure, &e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<HostError> for ApiError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::InvalidBundle(_) => Self::bad_request(e.to_string()),
            HostError::Storage(_) => Self::internal("Failed to submit transaction", &e),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::UnsupportedService(_) | LookupError::InvalidQuery(_) => {
                Self::bad_request(e.to_string())
            }
            LookupError::Storage(_) => Self::internal("Failed to answer lookup", &e),
        }
    }
}
