pub mod openai;
pub mod relay;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use super::{ ChatEndpoint, LlmConfig };
use crate::models::chat::ChatMessage;
use self::openai::OpenAIChatClient;
use self::relay::RelayChatClient;

/// Every way a turn can fail. The conversation client treats them all alike.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream HTTP {0}")]
    Status(u16),
    #[error("no content in response")]
    NoContent,
    #[error("no API key found; set a relay URL or provide a local key")]
    MissingApiKey,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the full message list and returns the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

#[derive(Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Reads `choices[0].message.content` out of a chat completion response.
pub fn parse_reply(status: StatusCode, body: &[u8]) -> Result<String, ChatError> {
    if !status.is_success() {
        return Err(ChatError::Status(status.as_u16()));
    }
    let envelope: CompletionEnvelope = serde_json
        ::from_slice(body)
        .map_err(|_| ChatError::NoContent)?;
    envelope.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or(ChatError::NoContent)
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client: Arc<dyn ChatClient> = match &config.endpoint {
        ChatEndpoint::Relay { url } => Arc::new(RelayChatClient::new(url.clone())?),
        ChatEndpoint::Direct { upstream_url, api_key } => {
            Arc::new(
                OpenAIChatClient::new(
                    api_key.clone(),
                    Some(config.model.clone()),
                    Some(upstream_url.clone())
                )?
            )
        }
    };
    Ok(client)
}
