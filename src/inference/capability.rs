use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;

use crate::core::config::ResolvedConfig;
use crate::core::error::ChatError;
use crate::core::transcript::Message;

use super::openai::OpenAiChat;

/// The one identifier the registry knows.
pub const OPENAI_CHATGPT: &str = "OpenAI ChatGPT";

/// Errors from a single reply round trip.
/// None of them are retried; the turn is abandoned instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReplyError {
    /// Capability misconfigured (missing API key, bad URL).
    #[error("config error: {0}")]
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// The response body was not what we expected.
    #[error("parse error: {0}")]
    Parse(String),
    /// The endpoint answered without any choice to take a reply from.
    #[error("model returned no reply")]
    EmptyReply,
}

/// The abstract "ask the model" operation.
///
/// Implementations are stateless with respect to the conversation: the whole
/// history arrives with every call.
#[async_trait]
pub trait ReplyCapability: Send + Sync {
    /// Model name shown in the title bar and logs.
    fn model_name(&self) -> &str;

    /// Sends the full history, oldest first, and returns one assistant message.
    async fn reply(&self, request: &[Message]) -> Result<Message, ReplyError>;
}

/// Model choice resolved once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    OpenAi,
    Unsupported(String),
}

impl ModelChoice {
    /// Exact, case-sensitive match against the registered identifiers.
    pub fn parse(identifier: &str) -> Self {
        match identifier {
            OPENAI_CHATGPT => ModelChoice::OpenAi,
            other => ModelChoice::Unsupported(other.to_string()),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            ModelChoice::OpenAi => OPENAI_CHATGPT,
            ModelChoice::Unsupported(id) => id,
        }
    }
}

/// Builds the capability registered for `choice`.
pub fn select_reply_capability(
    choice: &ModelChoice,
    config: &ResolvedConfig,
) -> Result<Arc<dyn ReplyCapability>, ChatError> {
    match choice {
        ModelChoice::OpenAi => {
            info!(
                "Selected {} (model={}, base_url={})",
                OPENAI_CHATGPT, config.openai_model, config.openai_base_url
            );
            Ok(Arc::new(OpenAiChat::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                Some(config.openai_base_url.clone()),
            )))
        }
        ModelChoice::Unsupported(id) => {
            warn!("No reply capability registered for '{}'", id);
            Err(ChatError::UnsupportedModel(id.clone()))
        }
    }
}
