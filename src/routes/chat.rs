use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Problem},
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

/// `POST /chat`: relay one message to the webhook and hand back its reply.
#[utoipa::path(
    post,
    path = "/chat",
    operation_id = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply from the webhook", body = ChatResponse),
        (status = 400, description = "Message missing or body unreadable", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Webhook not configured or reply malformed", body = Problem, content_type = "application/problem+json"),
        (status = 502, description = "Webhook unreachable or timed out", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id);

    match relay(&state, payload).instrument(span).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            if err.status().is_server_error() {
                error!(%request_id, error = %err, "chat request failed");
            } else {
                debug!(%request_id, error = %err, "chat request rejected");
            }
            err.problem().with_trace_id(request_id).into_response()
        }
    }
}

async fn relay(
    state: &SharedState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<ChatResponse> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let message = request
        .text()
        .ok_or_else(|| AppError::BadRequest("Message is required.".to_string()))?;

    let url = state
        .config
        .webhook_url
        .as_deref()
        .ok_or(AppError::MissingWebhookUrl)?;

    let started = Instant::now();
    let reply = state.webhook.forward(url, message).await;
    debug!(
        elapsed_ms = started.elapsed().as_millis(),
        ok = reply.is_ok(),
        "webhook round trip"
    );

    reply
}
