use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::system::cache::SnapshotCache;
use crate::system::snapshot::Snapshot;

static DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Hands back the latest published snapshot. Never waits for a sampling
/// pass: before the first one completes this serves the empty snapshot.
pub async fn system_data(
    State(cache): State<SnapshotCache>,
) -> Result<Json<Snapshot>, ApiError> {
    if !cache.is_live() {
        return Err(ApiError::SamplerStopped);
    }
    Ok(Json(cache.current().as_ref().clone()))
}

/// Internal failures surface as a 500 with a generic payload; the process
/// itself keeps serving.
#[derive(Debug)]
pub enum ApiError {
    SamplerStopped,
}

impl ApiError {
    fn message(&self) -> &'static str {
        match self {
            ApiError::SamplerStopped => "sampling task is no longer running",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = self.message(), "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}
