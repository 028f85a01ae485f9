pub mod prompt;

/// Storage key under which the conversation history blob lives.
pub const STATE_KEY: &str = "loreal_chat_history_v1";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const MAX_RESPONSE_TOKENS: u32 = 600;
