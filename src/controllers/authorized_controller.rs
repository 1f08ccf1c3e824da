use std::sync::Arc;
use uuid::Uuid;

use crate::dto::authorized_dto::AuthorizedResponse;
use crate::models::{Authorized, NewAuthorized};
use crate::repositories::GateStore;
use crate::services::{ensure_person, ensure_vehicle};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

const ALREADY_AUTHORIZED: &str = "Esta placa já está autorizada.";

pub struct AuthorizedController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
}

impl AuthorizedController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Authorized>> {
        self.store.list_authorized(self.company_id).await
    }

    /// Autoriza la placa y garantiza que existan la persona y el vehículo
    pub async fn create(&self, entry: NewAuthorized) -> AppResult<AuthorizedResponse> {
        let (person_id, vehicle_id) = self.ensure_entities(&entry).await?;

        let created = self
            .store
            .insert_authorized(self.company_id, &entry)
            .await
            .map_err(|e| e.on_conflict(ALREADY_AUTHORIZED))?;

        tracing::info!("✅ Placa {} autorizada para {}", created.plate, created.name);
        Ok(AuthorizedResponse {
            entry: created,
            person_id,
            vehicle_id,
        })
    }

    pub async fn update(&self, id: Uuid, entry: NewAuthorized) -> AppResult<AuthorizedResponse> {
        let (person_id, vehicle_id) = self.ensure_entities(&entry).await?;

        let updated = self
            .store
            .update_authorized(self.company_id, id, &entry)
            .await
            .map_err(|e| e.on_conflict(ALREADY_AUTHORIZED))?
            .ok_or_else(|| not_found_error("Autorização não encontrada."))?;

        Ok(AuthorizedResponse {
            entry: updated,
            person_id,
            vehicle_id,
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_authorized(self.company_id, id).await? {
            return Err(not_found_error("Autorização não encontrada."));
        }
        Ok(())
    }

    async fn ensure_entities(&self, entry: &NewAuthorized) -> AppResult<(Uuid, Uuid)> {
        let store = self.store.as_ref();
        let person_id = ensure_person(store, self.company_id, &entry.name).await?;
        let vehicle_id = ensure_vehicle(store, self.company_id, &entry.plate, None, None).await?;
        Ok((person_id, vehicle_id))
    }
}
