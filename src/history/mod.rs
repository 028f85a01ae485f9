mod memory;
mod redis;

pub use self::memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;
use crate::cli::ChatArgs;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("unsupported session store type: {0}")]
    Unsupported(String),
}

/// Key/value blob storage scoped to one chat session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn create_session_store(args: &ChatArgs) -> Result<Arc<dyn SessionStore>, StoreError> {
    match args.session_store.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemorySessionStore::default())),
        "redis" => {
            let store = RedisSessionStore::new(&args.session_host, &args.session_prefix)?;
            info!(
                "Chat history will be stored in redis at {} (session {})",
                args.session_host,
                store.session_id()
            );
            Ok(Arc::new(store))
        }
        other => Err(StoreError::Unsupported(other.to_string())),
    }
}
