//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: store de persistencia, almacenamiento de
//! exportaciones y configuración.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::GateStore;
use crate::services::ReportRenderer;
use crate::storage::ExportStorage;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GateStore>,
    pub storage: Arc<dyn ExportStorage>,
    pub config: Arc<EnvironmentConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GateStore>,
        storage: Arc<dyn ExportStorage>,
        config: EnvironmentConfig,
    ) -> Self {
        Self {
            store,
            storage,
            config: Arc::new(config),
        }
    }

    /// Empresa a la que pertenecen todas las operaciones
    pub fn company_id(&self) -> Uuid {
        self.config.company_id
    }

    /// Filial configurada, si la hay
    pub fn branch_id(&self) -> Option<Uuid> {
        self.config.default_branch_id
    }

    pub fn report_renderer(&self) -> ReportRenderer {
        ReportRenderer::new(self.config.report_utc_offset)
    }
}
