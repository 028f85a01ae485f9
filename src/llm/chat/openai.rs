use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::{ parse_reply, ChatClient, ChatError };
use crate::config::{ DEFAULT_MODEL, DEFAULT_UPSTREAM_URL, MAX_RESPONSE_TOKENS };
use crate::models::chat::ChatMessage;

/// Raw upstream answer, kept as bytes so the relay can pass it through untouched.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub struct OpenAIChatClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a, M: Serialize> {
    model: &'a str,
    messages: &'a [M],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, ChatError> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<M: Serialize + Sync>(
        &self,
        req: &OpenAIChatRequest<'_, M>
    ) -> Result<UpstreamResponse, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let resp = self.http
            .post(&self.base_url)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(req)
            .send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        debug!("Upstream answered {} with {} bytes", status, body.len());
        Ok(UpstreamResponse { status, body })
    }

    /// Relay path: forwards the caller's messages untouched, caps the reply with
    /// `max_completion_tokens` and returns the upstream status and body as they came.
    pub async fn forward(&self, messages: &[Value]) -> Result<UpstreamResponse, ChatError> {
        let req = OpenAIChatRequest {
            model: &self.model,
            messages,
            max_completion_tokens: Some(MAX_RESPONSE_TOKENS),
            max_tokens: None,
        };
        self.post(&req).await
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let req = OpenAIChatRequest {
            model: &self.model,
            messages,
            max_completion_tokens: None,
            max_tokens: Some(MAX_RESPONSE_TOKENS),
        };
        let resp = self.post(&req).await?;
        parse_reply(resp.status, &resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_payload_uses_completion_cap() {
        let messages = vec![ChatMessage::system("p"), ChatMessage::user("q")];
        let req = OpenAIChatRequest {
            model: DEFAULT_MODEL,
            messages: &messages,
            max_completion_tokens: Some(MAX_RESPONSE_TOKENS),
            max_tokens: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "p"},
                    {"role": "user", "content": "q"}
                ],
                "max_completion_tokens": 600
            })
        );
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let client = OpenAIChatClient::new(Some("   ".into()), None, None).unwrap();
        assert!(!client.has_api_key());
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_UPSTREAM_URL);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = OpenAIChatClient::new(None, None, Some("http://127.0.0.1:9".into())).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }
}
