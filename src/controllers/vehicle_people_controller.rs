use std::sync::Arc;
use uuid::Uuid;

use crate::dto::vehicle_person_dto::VehiclePersonPair;
use crate::models::VehiclePersonLink;
use crate::repositories::GateStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct VehiclePeopleController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
}

impl VehiclePeopleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
        }
    }

    pub async fn list(&self, vehicle_id: Option<Uuid>) -> AppResult<Vec<VehiclePersonLink>> {
        self.store.list_links(self.company_id, vehicle_id).await
    }

    /// Vincula una persona a un vehículo; ambos deben ser de la empresa
    pub async fn link(&self, pair: VehiclePersonPair) -> AppResult<()> {
        if self
            .store
            .find_vehicle(self.company_id, pair.vehicle_id)
            .await?
            .is_none()
        {
            return Err(not_found_error("Veículo não encontrado."));
        }
        if self
            .store
            .find_person(self.company_id, pair.person_id)
            .await?
            .is_none()
        {
            return Err(not_found_error("Pessoa não encontrada."));
        }

        self.store
            .link(self.company_id, pair.vehicle_id, pair.person_id)
            .await
            .map_err(|e| e.on_conflict("Esta pessoa já está vinculada a este veículo."))?;

        tracing::info!("🔗 Persona {} vinculada al vehículo {}", pair.person_id, pair.vehicle_id);
        Ok(())
    }

    /// Desvincula; no falla si el vínculo no existía
    pub async fn unlink(&self, pair: VehiclePersonPair) -> AppResult<()> {
        let removed = self
            .store
            .unlink(self.company_id, pair.vehicle_id, pair.person_id)
            .await?;
        if !removed {
            tracing::debug!(
                "Vínculo {} / {} inexistente",
                pair.vehicle_id,
                pair.person_id
            );
        }
        Ok(())
    }
}
