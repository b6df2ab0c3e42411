//! HTTP error mapping for the picker API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dam_client::ClientError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg.clone()),
            ApiError::Client(ClientError::Unauthenticated) => {
                warn!("request rejected: no upstream API key");
                (StatusCode::UNAUTHORIZED, "Unauthorized", self.to_string())
            }
            ApiError::Client(e) => {
                error!(error = %e, "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed",
                    e.to_string(),
                )
            }
        };

        (status, Json(json!({ "title": title, "detail": detail }))).into_response()
    }
}
