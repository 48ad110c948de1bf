//! # HTTP Surface
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /submit` | BEEF body, `x-topics` header; returns per-topic instructions |
//! | `POST /lookup` | `{service, query}`; returns an output list or formula |
//! | `GET /listTopicManagers`, `GET /listLookupServiceProviders` | service metadata |
//! | `GET /getDocumentationForTopicManager?manager=` | markdown |
//! | `GET /getDocumentationForLookupServiceProvider?lookupService=` | markdown |
//! | `POST /fund` | store a campaign funding record |
//! | `POST /funding-records` | funding records by campaign id |
//! | `GET /funded-ads` | ids of funded campaigns |
//! | `POST /submit-answers` | score a quiz and pay the reward |
//! | `POST /campaigns` | store a draft campaign and request its funding |
//! | `GET /advertisers/:advertiserId/campaigns` | an advertiser's campaigns |
//! | `GET /health` | liveness |

pub mod error;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::container::{AdNode, HttpConfig, NodeCampaignService};
use crate::host::OverlayHost;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<OverlayHost>,
    pub campaigns: Arc<NodeCampaignService>,
}

impl AppState {
    pub fn new(node: &AdNode) -> Self {
        Self {
            host: Arc::clone(&node.host),
            campaigns: Arc::clone(&node.campaigns),
        }
    }
}

pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        .route("/submit", post(handlers::submit))
        .route("/lookup", post(handlers::lookup))
        .route("/listTopicManagers", get(handlers::list_topic_managers))
        .route("/listLookupServiceProviders", get(handlers::list_lookup_services))
        .route(
            "/getDocumentationForTopicManager",
            get(handlers::topic_manager_documentation),
        )
        .route(
            "/getDocumentationForLookupServiceProvider",
            get(handlers::lookup_service_documentation),
        )
        .route("/fund", post(handlers::fund))
        .route("/funding-records", post(handlers::funding_records))
        .route("/funded-ads", get(handlers::funded_ads))
        .route("/submit-answers", post(handlers::submit_answers))
        .route("/campaigns", post(handlers::create_campaign))
        .route(
            "/advertisers/:advertiser_id/campaigns",
            get(handlers::advertiser_campaigns),
        )
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
