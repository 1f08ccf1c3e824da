use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Authorized, NewAuthorized};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{require_plate, RequestSchema};

const FIELDS_REQUIRED: &str = "Placa, nome e departamento são obrigatórios.";

/// Request para autorizar una placa
#[derive(Debug, Deserialize, Validate)]
pub struct AuthorizedRequest {
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Nome muito longo."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Departamento muito longo."))]
    pub department: String,
}

impl RequestSchema for AuthorizedRequest {
    type Valid = NewAuthorized;

    fn finish(self) -> AppResult<NewAuthorized> {
        let name = self.name.trim();
        let department = self.department.trim();
        if self.plate.trim().is_empty() || name.is_empty() || department.is_empty() {
            return Err(AppError::BadRequest(FIELDS_REQUIRED.to_string()));
        }

        Ok(NewAuthorized {
            plate: require_plate(&self.plate)?,
            name: name.to_string(),
            department: department.to_string(),
        })
    }
}

/// Entrada autorizada junto con la persona y el vehículo resueltos
#[derive(Debug, Serialize)]
pub struct AuthorizedResponse {
    #[serde(flatten)]
    pub entry: Authorized,
    #[serde(rename = "personId")]
    pub person_id: Uuid,
    #[serde(rename = "vehicleId")]
    pub vehicle_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_required() {
        for body in [
            r#"{"plate":"ABC1234","name":"Ana"}"#,
            r#"{"plate":"","name":"Ana","department":"TI"}"#,
            r#"{"plate":"ABC1234","name":" ","department":"TI"}"#,
        ] {
            let request: AuthorizedRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(request.finish(), Err(AppError::BadRequest(m)) if m == FIELDS_REQUIRED));
        }
    }

    #[test]
    fn test_response_flattens_entry() {
        let response = AuthorizedResponse {
            entry: Authorized {
                id: Uuid::nil(),
                plate: "ABC1234".into(),
                name: "Ana".into(),
                department: "TI".into(),
            },
            person_id: Uuid::nil(),
            vehicle_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["plate"], "ABC1234");
        assert!(json.get("personId").is_some());
        assert!(json.get("vehicleId").is_some());
    }
}
