pub mod chat;
use crate::config::{ DEFAULT_MODEL, DEFAULT_UPSTREAM_URL };
use std::fmt;

/// Where a conversation client sends its turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEndpoint {
    /// Through the relay, which holds the key.
    Relay { url: String },
    /// Straight to the upstream API with a locally supplied key.
    Direct { upstream_url: String, api_key: Option<String> },
}

impl fmt::Display for ChatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatEndpoint::Relay { url } => write!(f, "relay ({})", url),
            ChatEndpoint::Direct { upstream_url, api_key } =>
                write!(
                    f,
                    "direct ({}, key {})",
                    upstream_url,
                    if api_key.is_some() { "present" } else { "missing" }
                ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: ChatEndpoint,
    pub model: String,
}

impl LlmConfig {
    /// A non-blank relay address wins; otherwise the direct path is used.
    pub fn from_parts(
        relay_url: Option<String>,
        api_key: Option<String>,
        upstream_url: Option<String>
    ) -> Self {
        let relay_url = relay_url.filter(|u| !u.trim().is_empty());
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let endpoint = match relay_url {
            Some(url) => ChatEndpoint::Relay { url },
            None =>
                ChatEndpoint::Direct {
                    upstream_url: upstream_url.unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
                    api_key,
                },
        };
        Self { endpoint, model: DEFAULT_MODEL.to_string() }
    }
}
