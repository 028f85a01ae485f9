use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use super::{ SessionStore, StoreError };

/// Lives exactly as long as the process, like a browser tab's session storage.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemorySessionStore::default();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "[1]").await.unwrap();
        store.set("k", "[2]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[2]"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
