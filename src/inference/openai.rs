//! OpenAI chat-completions capability.
//!
//! One non-streaming `POST /chat/completions` per turn. The request carries the
//! whole transcript; the endpoint keeps no conversation state between calls.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::transcript::{Message, Role};
use crate::inference::{ReplyCapability, ReplyError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// The assistant message inside a choice. `content` is null for refusals and
/// tool-only answers, so it stays optional here.
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls the first choice's text out of a response body.
///
/// A choice with null or blank content is still a reply and yields an empty
/// assistant message; only a response without any choice is `EmptyReply`.
fn extract_reply(response: ChatResponse) -> Result<Message, ReplyError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ReplyError::EmptyReply)?;

    let content = choice.message.content.unwrap_or_default();
    if content.trim().is_empty() {
        debug!("Choice carried no text, keeping an empty reply");
    }
    Ok(Message::new(Role::Assistant, content))
}

// ============================================================================
// Capability Implementation
// ============================================================================

pub struct OpenAiChat {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiChat {
    /// Creates the capability bound to `model`.
    ///
    /// A missing key is not an error here; it is reported on the first turn
    /// as `ReplyError::Config`.
    pub fn new(api_key: Option<String>, model: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReplyCapability for OpenAiChat {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn reply(&self, request: &[Message]) -> Result<Message, ReplyError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ReplyError::Config(
                "OpenAI API key is not set (config file or OPENAI_API_KEY env var)".to_string(),
            )
        })?;

        let body = ChatRequest {
            model: &self.model,
            messages: request,
        };

        info!(
            "Chat completion request: model={}, message_count={}",
            self.model,
            request.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Network(e.to_string()))?;

        debug!("OpenAI response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OpenAI API error: {} - {}", status, err_body);
            return Err(ReplyError::Api {
                status,
                message: err_body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReplyError::Parse(e.to_string()))?;

        let reply = extract_reply(parsed)?;
        info!("Chat completion reply: {} bytes", reply.content().len());
        Ok(reply)
    }
}
