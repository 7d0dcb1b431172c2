//! Request handlers and error mapping.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{ReviewRequest, ReviewResponse};
use crate::review::ReviewError;

use super::AppContext;

/// JSON error response: a status code and a `detail` message body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::InvalidLocator(msg) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ReviewError::RepoNotFound => {
                Self::new(StatusCode::NOT_FOUND, "Repository not found.")
            }
            ReviewError::Fetch(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while fetching the repository.",
            ),
            ReviewError::NoFilesFound => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "No files found in the repository or unable to fetch content.",
            ),
            ReviewError::Generation(msg) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not generate the review: {msg}"),
            ),
        }
    }
}

/// `POST /review` — run the full review pipeline for one submission.
///
/// Body validation (shape and the candidate-level enum) happens here at
/// deserialization, before any collaborator is invoked; failures are 422
/// with a `detail` message.
pub async fn review_code(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    })?;

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        repo = %request.github_repo_url,
        level = %request.candidate_level,
        "review requested"
    );

    let outcome = ctx.service.review(&request).await.map_err(|err| {
        warn!(%request_id, %err, "review failed");
        ApiError::from(err)
    })?;

    Ok(Json(ReviewResponse::new(
        outcome.files_found,
        outcome.summary,
    )))
}

/// `GET /health` — liveness probe.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::constants::VERSION,
        "uptime_secs": ctx.started_at.elapsed().as_secs(),
    }))
}
