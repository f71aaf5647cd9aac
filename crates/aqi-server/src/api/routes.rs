//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use aqi_core::{BoundingBox, PollutionSources};

use crate::api::envelope::{failure, upstream_status, RouteEnvelope, SourcesEnvelope};
use crate::api::request_id::request_context;
use crate::route_service::RouteRequest;
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/routes", post(plan_routes))
        .route("/v1/routes", post(plan_routes))
        .route("/v1/pollution-sources", post(pollution_sources))
        .layer(middleware::from_fn(request_context))
}

async fn plan_routes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match state.routes.plan(&request).await {
        Ok(response) => Json(RouteEnvelope::from(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesRequest {
    #[serde(default)]
    pub bbox: Vec<f64>,
}

async fn pollution_sources(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SourcesRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let sources = match BoundingBox::from_slice(&request.bbox) {
        Ok(bbox) => match state.sources.count_sources(bbox).await {
            Ok(sources) => sources,
            Err(err) => {
                tracing::error!("Pollution source lookup failed: {}", err);
                return failure(upstream_status(&err), err.to_string());
            }
        },
        Err(err) => {
            tracing::warn!("Invalid bbox received: {}", err);
            PollutionSources::default()
        }
    };

    Json(SourcesEnvelope {
        success: true,
        sources,
    })
    .into_response()
}
