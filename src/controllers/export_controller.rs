//! Exportación de reportes PDF
//!
//! Genera el PDF, lo sube al bucket de exportaciones y devuelve una URL
//! firmada. El evento de auditoría es best-effort: si falla se registra en
//! el log y la URL se devuelve igual.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::controllers::require_branch;
use crate::dto::visit_dto::HistoryQuery;
use crate::models::{HistoryWindow, VisitEventType};
use crate::repositories::GateStore;
use crate::services::report_service::{
    history_report_path, visit_report_path, ReportRenderer, HISTORY_ROW_LIMIT,
};
use crate::state::AppState;
use crate::storage::{ExportStorage, PDF_CONTENT_TYPE};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::day_range_utc;

pub struct ExportController {
    store: Arc<dyn GateStore>,
    storage: Arc<dyn ExportStorage>,
    renderer: ReportRenderer,
    company_id: Uuid,
    branch_id: Option<Uuid>,
    ttl: Duration,
}

impl ExportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            storage: state.storage.clone(),
            renderer: state.report_renderer(),
            company_id: state.company_id(),
            branch_id: state.branch_id(),
            ttl: state.config.signed_url_ttl,
        }
    }

    /// PDF "Registro de Visita"
    pub async fn export_visit(&self, visit_id: Uuid) -> AppResult<String> {
        let visit = self
            .store
            .visit_detail(self.company_id, visit_id)
            .await?
            .ok_or_else(|| not_found_error("Visita não encontrada."))?;

        let pdf = self.renderer.render_visit(&visit)?;
        let url = self.publish(&visit_report_path(visit_id), pdf).await?;

        self.record(Some(visit_id), VisitEventType::PdfExported, json!({ "url": url }))
            .await;
        Ok(url)
    }

    /// PDF del historial del período en la filial configurada
    pub async fn export_history(&self, query: &HistoryQuery) -> AppResult<String> {
        let range = query.range()?;
        let branch_id = require_branch(self.branch_id)?;
        let (from, to) = day_range_utc(range.start, range.end);

        let window = HistoryWindow {
            from,
            to,
            offset: 0,
            limit: HISTORY_ROW_LIMIT,
        };
        let (visits, total) = self
            .store
            .visit_history(self.company_id, branch_id, &window)
            .await?;
        if total > HISTORY_ROW_LIMIT {
            tracing::warn!(
                "⚠️ Historial con {} registros; el PDF incluye solo {}",
                total,
                HISTORY_ROW_LIMIT
            );
        }

        let (start, end) = (range.start_label(), range.end_label());
        let pdf = self.renderer.render_history(&start, &end, &visits)?;
        let url = self.publish(&history_report_path(&start, &end), pdf).await?;

        self.record(
            None,
            VisitEventType::HistoryPdfExported,
            json!({ "start": start, "end": end, "url": url }),
        )
        .await;
        Ok(url)
    }

    async fn publish(&self, path: &str, pdf: Vec<u8>) -> AppResult<String> {
        self.storage.ensure_bucket().await;
        self.storage.upload(path, pdf, PDF_CONTENT_TYPE).await?;
        let url = self.storage.signed_url(path, self.ttl).await?;
        tracing::info!("📄 Reporte {} exportado", path);
        Ok(url)
    }

    async fn record(
        &self,
        visit_id: Option<Uuid>,
        event_type: VisitEventType,
        meta: serde_json::Value,
    ) {
        if let Err(e) = self.store.record_event(visit_id, event_type, meta).await {
            tracing::warn!("⚠️ No se pudo registrar el evento {}: {}", event_type.as_str(), e);
        }
    }
}
