//! Almacenamiento de exportaciones
//!
//! Los PDFs generados se suben a un bucket privado y se entregan al cliente
//! mediante una URL firmada de vida corta.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::errors::AppResult;

pub use memory::MemoryStorage;
pub use supabase::SupabaseStorage;

/// Content-Type de los reportes
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Backend de almacenamiento de exportaciones
#[async_trait]
pub trait ExportStorage: Send + Sync {
    /// Crea el bucket si no existe. Los errores se ignoran (el bucket puede existir ya).
    async fn ensure_bucket(&self);

    /// Sube (o reemplaza) el objeto en `path`
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// URL firmada para descargar `path` durante `ttl`
    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<String>;
}
