use std::sync::Arc;
use uuid::Uuid;

use crate::dto::lookup_dto::PlateLookup;
use crate::models::AuthorizedSummary;
use crate::repositories::GateStore;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::Plate;

/// Visitas recientes incluidas en la consulta de un vehículo registrado
const RECENT_VISITS: i64 = 20;

pub struct LookupController {
    store: Arc<dyn GateStore>,
    company_id: Uuid,
    branch_id: Option<Uuid>,
}

impl LookupController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            company_id: state.company_id(),
            branch_id: state.branch_id(),
        }
    }

    /// Vehículo registrado, placa autorizada o nada, en ese orden
    pub async fn lookup_plate(&self, raw: &str) -> AppResult<PlateLookup> {
        let Some(plate) = Plate::parse(raw) else {
            return Ok(PlateLookup::None);
        };

        if let Some(vehicle) = self
            .store
            .find_vehicle_by_plate(self.company_id, &plate)
            .await?
        {
            let visits = match self.branch_id {
                Some(branch_id) => {
                    self.store
                        .recent_visits_for_vehicle(
                            self.company_id,
                            branch_id,
                            vehicle.id,
                            RECENT_VISITS,
                        )
                        .await?
                }
                None => Vec::new(),
            };
            let people = self
                .store
                .people_for_vehicle(self.company_id, vehicle.id)
                .await?;

            return Ok(PlateLookup::Registered {
                vehicle,
                visits,
                people,
            });
        }

        if let Some(entry) = self
            .store
            .find_authorized_by_plate(self.company_id, &plate)
            .await?
        {
            return Ok(PlateLookup::Authorized {
                authorized: AuthorizedSummary::from(entry),
            });
        }

        Ok(PlateLookup::None)
    }
}
