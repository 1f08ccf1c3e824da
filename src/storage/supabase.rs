//! Supabase Storage vía su API REST

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::storage::ExportStorage;
use crate::utils::errors::{AppError, AppResult};

/// Límite de tamaño por archivo del bucket de exportaciones (50 MB)
const FILE_SIZE_LIMIT: u64 = 50 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

pub struct SupabaseStorage {
    base_url: String,
    service_key: String,
    bucket: String,
    client: Client,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Storage(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

#[async_trait]
impl ExportStorage for SupabaseStorage {
    async fn ensure_bucket(&self) {
        let body = json!({
            "id": self.bucket,
            "name": self.bucket,
            "public": false,
            "file_size_limit": FILE_SIZE_LIMIT,
        });

        let result = self
            .authorized(self.client.post(self.endpoint("bucket")))
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("🪣 Bucket '{}' creado", self.bucket);
            }
            Ok(response) => {
                tracing::debug!("Bucket '{}' no creado ({})", self.bucket, response.status());
            }
            Err(e) => tracing::debug!("Bucket '{}' no creado: {}", self.bucket, e),
        }
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        let url = self.endpoint(&format!("object/{}/{}", self.bucket, path));
        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Falha no upload: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("❌ Subida de {} falló con status {}: {}", path, status, text);
            return Err(AppError::Storage(format!("Falha no upload: {}", status)));
        }

        tracing::debug!("📤 {} subido al bucket {}", path, self.bucket);
        Ok(())
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        let url = self.endpoint(&format!("object/sign/{}/{}", self.bucket, path));
        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Falha ao assinar URL: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Storage(format!(
                "Falha ao assinar URL: {}",
                status
            )));
        }

        let signed: SignResponse = response
            .json()
            .await
            .map_err(|_| AppError::Storage("Falha ao assinar URL: sem URL".to_string()))?;

        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }
}
