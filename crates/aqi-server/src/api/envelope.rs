//! `{ success, ... }` response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use aqi_core::{PollutionSources, RouteResponse};
use aqi_upstream::UpstreamError;

use crate::error::RouteError;

#[derive(Debug, Serialize)]
pub struct RouteEnvelope {
    pub success: bool,
    #[serde(flatten)]
    pub response: RouteResponse,
}

impl From<RouteResponse> for RouteEnvelope {
    fn from(response: RouteResponse) -> Self {
        Self {
            success: true,
            response,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SourcesEnvelope {
    pub success: bool,
    #[serde(flatten)]
    pub sources: PollutionSources,
}

#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(FailureEnvelope {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn upstream_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = match &self {
            RouteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RouteError::Upstream(err) => upstream_status(err),
        };
        if status.is_server_error() {
            tracing::error!("Route request failed: {}", self);
        }
        failure(status, self.to_string())
    }
}
