//! Almacenamiento en memoria para tests y ejecución local sin Supabase

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::storage::ExportStorage;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }
}

#[async_trait]
impl ExportStorage for MemoryStorage {
    async fn ensure_bucket(&self) {}

    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        objects.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        Ok(format!("memory://exports/{}?expiresIn={}", path, ttl.as_secs()))
    }
}
