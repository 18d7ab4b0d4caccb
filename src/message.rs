// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl ChatRequest {
    /// The message, if it carries anything besides whitespace.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Body sent to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    #[serde(default, alias = "Response", deserialize_with = "null_as_empty")]
    pub response: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_messages_have_no_text() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "   \n"}"#).unwrap();
        assert_eq!(req.text(), None);

        let req: ChatRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.text(), None);

        let req: ChatRequest = serde_json::from_str(r#"{"message": null}"#).unwrap();
        assert_eq!(req.text(), None);
    }

    #[test]
    fn accepts_capitalised_field() {
        let req: ChatRequest = serde_json::from_str(r#"{"Message": "hello"}"#).unwrap();
        assert_eq!(req.text(), Some("hello"));
    }

    #[test]
    fn response_field_defaults_to_empty() {
        let resp: ChatResponse = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert_eq!(resp, ChatResponse::default());
    }

    #[test]
    fn null_response_is_empty() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response": null}"#).unwrap();
        assert_eq!(resp, ChatResponse::default());
    }

    #[test]
    fn accepts_capitalised_response_field() {
        let resp: ChatResponse = serde_json::from_str(r#"{"Response": "hi"}"#).unwrap();
        assert_eq!(resp.response, "hi");
    }
}
