use serde::Deserialize;
use validator::Validate;

use crate::models::NewVehicle;
use crate::utils::errors::AppResult;
use crate::utils::validation::{blank_as_none, require_plate, RequestSchema};

/// Request para crear o reemplazar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct VehicleRequest {
    #[serde(default)]
    pub plate: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 60, message = "Modelo muito longo."))]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 30, message = "Cor muito longa."))]
    pub color: Option<String>,
}

impl RequestSchema for VehicleRequest {
    type Valid = NewVehicle;

    fn finish(self) -> AppResult<NewVehicle> {
        Ok(NewVehicle {
            plate: require_plate(&self.plate)?,
            model: self.model,
            color: self.color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[test]
    fn test_vehicle_request_normalizes_plate() {
        let request: VehicleRequest =
            serde_json::from_str(r#"{"plate":"abc-1234","model":" Gol ","color":""}"#).unwrap();
        let vehicle = request.finish().unwrap();
        assert_eq!(vehicle.plate.as_str(), "ABC1234");
        assert_eq!(vehicle.model.as_deref(), Some("Gol"));
        assert_eq!(vehicle.color, None);
    }

    #[test]
    fn test_vehicle_request_plate_messages() {
        let missing: VehicleRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(missing.finish(), Err(AppError::BadRequest(m)) if m == "Placa é obrigatória."));

        let invalid: VehicleRequest = serde_json::from_str(r#"{"plate":"12"}"#).unwrap();
        assert!(matches!(invalid.finish(), Err(AppError::BadRequest(m)) if m == "Placa inválida."));
    }
}
