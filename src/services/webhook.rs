// src/services/webhook.rs
use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::{debug, warn};

use crate::{
    error::{AppError, AppResult},
    message::{ChatResponse, WebhookPayload},
};

/// Forwards chat messages to the configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
}

/// What came back from the webhook, before it is turned into a reply.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: String,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// POST `{"message": ...}` to `url` and shape the answer.
    ///
    /// Dropping the returned future aborts the outbound request.
    pub async fn forward(&self, url: &str, message: &str) -> AppResult<ChatResponse> {
        let reply = self.send(url, message).await?;
        reply.into_chat_response()
    }

    async fn send(&self, url: &str, message: &str) -> AppResult<UpstreamReply> {
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { message })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "webhook request failed");
                AppError::Unreachable(e)
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, %status, "failed to read webhook body");
            AppError::Unreachable(e)
        })?;

        debug!(%status, bytes = body.len(), "webhook replied");

        Ok(UpstreamReply {
            status,
            content_type,
            content_length,
            body,
        })
    }
}

impl UpstreamReply {
    pub fn into_chat_response(self) -> AppResult<ChatResponse> {
        if !self.status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: self.status,
                body: self.body,
            });
        }

        if self.status == StatusCode::NO_CONTENT
            || self.content_length == Some(0)
            || self.body.trim().is_empty()
        {
            return Ok(ChatResponse::default());
        }

        if self.is_json() {
            // `null` carries no reply object, so it is relayed as text below.
            if let Some(typed) = serde_json::from_str::<Option<ChatResponse>>(&self.body)? {
                return Ok(typed);
            }
        }

        Ok(ChatResponse::new(self.body))
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|media| media.to_ascii_lowercase().contains("json"))
    }
}
