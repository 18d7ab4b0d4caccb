//! Application error types, rendered as RFC 7807 problem documents.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

pub const MISSING_WEBHOOK_URL: &str =
    "N8N webhook URL not configured. Set N8N:WebhookUrl or N8N_WEBHOOK_URL.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("N8N webhook URL not configured")]
    MissingWebhookUrl,

    /// Connect failure, timeout, or a body that broke off mid-read.
    #[error("Failed to reach n8n webhook: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("n8n returned {status}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("n8n returned malformed JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

/// Problem details body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            kind: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            trace_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_trace_id(mut self, id: Uuid) -> Self {
        self.trace_id = Some(id.to_string());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingWebhookUrl | AppError::MalformedReply(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamStatus { status, .. } => *status,
        }
    }

    pub fn problem(&self) -> Problem {
        let status = self.status();
        match self {
            AppError::BadRequest(m) => Problem::new(status, m.as_str()),
            AppError::MissingWebhookUrl => Problem::new(status, MISSING_WEBHOOK_URL),
            AppError::Unreachable(e) => {
                Problem::new(status, e.to_string()).with_detail("Failed to reach n8n webhook.")
            }
            AppError::UpstreamStatus { status, body } => Problem::new(
                *status,
                format!(
                    "n8n returned {} ({})",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            )
            .with_detail(body.as_str()),
            AppError::MalformedReply(e) => {
                Problem::new(status, "n8n returned malformed JSON").with_detail(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.problem().into_response()
    }
}
