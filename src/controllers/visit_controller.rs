//! Ciclo de vida de las visitas
//!
//! Una visita se abre en el check-in y se cierra una única vez en el
//! check-out. Cada transición queda registrada en `visit_events` dentro de
//! la misma transacción que la modifica.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::controllers::require_branch;
use crate::dto::visit_dto::{Checkin, HistoryPage, HistoryQuery};
use crate::models::{HistoryWindow, NewVisit, Visit, VisitDetail};
use crate::repositories::GateStore;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::day_range_utc;

const OPEN_VISIT_EXISTS: &str = "Veículo já possui uma visita em aberto.";

pub struct VisitController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
    branch_id: Option<Uuid>,
}

impl VisitController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
            branch_id: state.branch_id(),
        }
    }

    pub async fn check_in(&self, checkin: Checkin) -> AppResult<Visit> {
        let branch_id = require_branch(self.branch_id)?;

        if let Some(person_id) = checkin.person_id {
            if self
                .store
                .find_person(self.company_id, person_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound("Pessoa não encontrada.".to_string()));
            }
        }

        if let Some(vehicle_id) = checkin.vehicle_id {
            if self
                .store
                .find_vehicle(self.company_id, vehicle_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound("Veículo não encontrado.".to_string()));
            }
            if self
                .store
                .find_open_visit(self.company_id, branch_id, vehicle_id)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(OPEN_VISIT_EXISTS.to_string()));
            }
        }

        let visit = self
            .store
            .open_visit(&NewVisit {
                company_id: self.company_id,
                branch_id,
                person_id: checkin.person_id,
                vehicle_id: checkin.vehicle_id,
                purpose: checkin.purpose,
            })
            .await
            .map_err(|e| e.on_conflict(OPEN_VISIT_EXISTS))?;

        tracing::info!("🟢 Check-in {} ({})", visit.id, visit.purpose);
        Ok(visit)
    }

    pub async fn check_out(&self, visit_id: Uuid) -> AppResult<Visit> {
        let branch_id = require_branch(self.branch_id)?;

        let visit = self
            .store
            .find_visit(visit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visita não encontrada.".to_string()))?;

        if !visit.belongs_to(self.company_id, branch_id) {
            return Err(AppError::Forbidden(
                "Visita não pertence à organização atual.".to_string(),
            ));
        }

        let closed = self
            .store
            .close_visit(visit_id, self.company_id, branch_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::Conflict("Visita já foi encerrada.".to_string()))?;

        tracing::info!("🔴 Check-out {}", closed.id);
        Ok(closed)
    }

    pub async fn list_open(&self) -> AppResult<Vec<VisitDetail>> {
        let branch_id = require_branch(self.branch_id)?;
        self.store.list_open_visits(self.company_id, branch_id).await
    }

    pub async fn history(&self, query: &HistoryQuery) -> AppResult<HistoryPage> {
        let branch_id = require_branch(self.branch_id)?;
        let range = query.range()?;
        let (page, page_size) = query.pagination();
        let (from, to) = day_range_utc(range.start, range.end);

        let window = HistoryWindow {
            from,
            to,
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        };
        let (data, total) = self
            .store
            .visit_history(self.company_id, branch_id, &window)
            .await?;

        Ok(HistoryPage::new(data, page, page_size, total))
    }
}
