use async_trait::async_trait;
use redis::{ Client, AsyncCommands };
use uuid::Uuid;
use super::{ SessionStore, StoreError };

/// Shared Redis, but every client process gets its own session id so
/// histories never leak between sessions.
pub struct RedisSessionStore {
    client: Client,
    key_prefix: String,
    session_id: String,
}

impl RedisSessionStore {
    pub fn new(host: &str, key_prefix: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(host)?,
            key_prefix: key_prefix.to_string(),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}{}:{}", self.key_prefix, self.session_id, key)
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(self.scoped_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let _: () = conn.set(self.scoped_key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let _: i64 = conn.del(self.scoped_key(key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_to_session() {
        let a = RedisSessionStore::new("redis://127.0.0.1:6379", "session:").unwrap();
        let b = RedisSessionStore::new("redis://127.0.0.1:6379", "session:").unwrap();
        let key = a.scoped_key("loreal_chat_history_v1");
        assert!(key.starts_with("session:"));
        assert!(key.ends_with(":loreal_chat_history_v1"));
        assert_ne!(key, b.scoped_key("loreal_chat_history_v1"));
    }
}
