use std::sync::Arc;
use uuid::Uuid;

use crate::models::{NewVehicle, Vehicle};
use crate::repositories::GateStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

const DUPLICATE_PLATE: &str = "Esta placa já está cadastrada nesta empresa.";
const VEHICLE_NOT_FOUND: &str = "Veículo não encontrado.";

pub struct VehicleController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.store.list_vehicles(self.company_id).await
    }

    pub async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let created = self
            .store
            .insert_vehicle(self.company_id, &vehicle)
            .await
            .map_err(|e| e.on_conflict(DUPLICATE_PLATE))?;

        tracing::info!("🚗 Vehículo registrado: {} ({})", created.plate, created.id);
        Ok(created)
    }

    /// Reemplaza placa, modelo y color
    pub async fn update(&self, id: Uuid, vehicle: NewVehicle) -> AppResult<Vehicle> {
        self.store
            .update_vehicle(self.company_id, id, &vehicle)
            .await
            .map_err(|e| e.on_conflict(DUPLICATE_PLATE))?
            .ok_or_else(|| not_found_error(VEHICLE_NOT_FOUND))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_vehicle(self.company_id, id).await? {
            return Err(not_found_error(VEHICLE_NOT_FOUND));
        }
        tracing::info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }
}
