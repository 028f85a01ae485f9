use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::{ parse_reply, ChatClient, ChatError };
use crate::models::chat::{ ChatMessage, RelayRequest };

/// Sends turns through the relay service; the relay adds the credential.
pub struct RelayChatClient {
    http: HttpClient,
    url: String,
}

impl RelayChatClient {
    pub fn new(url: String) -> Result<Self, ChatError> {
        let http = HttpClient::builder().build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl ChatClient for RelayChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = RelayRequest { messages: messages.to_vec() };
        let resp = self.http.post(&self.url).json(&body).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        parse_reply(status, &bytes)
    }
}
