use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{parse_id, RequestSchema};

/// Cuerpo de vínculo / desvínculo vehículo-persona
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePersonRequest {
    pub vehicle_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
}

/// Par ya validado
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePersonPair {
    pub vehicle_id: Uuid,
    pub person_id: Uuid,
}

impl RequestSchema for VehiclePersonRequest {
    type Valid = VehiclePersonPair;

    fn finish(self) -> AppResult<VehiclePersonPair> {
        match (self.vehicle_id, self.person_id) {
            (Some(vehicle_id), Some(person_id)) => Ok(VehiclePersonPair {
                vehicle_id,
                person_id,
            }),
            _ => Err(AppError::BadRequest(
                "vehicleId e personId são obrigatórios.".to_string(),
            )),
        }
    }
}

/// `?vehicleId=` opcional del listado
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePeopleQuery {
    pub vehicle_id: Option<String>,
}

impl VehiclePeopleQuery {
    pub fn vehicle_id(&self) -> AppResult<Option<Uuid>> {
        match self.vehicle_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_id(raw).map(Some),
        }
    }
}
