//! Vínculo muchos-a-muchos entre vehículos y personas (`vehicle_people`)

use serde::Serialize;
use uuid::Uuid;

use crate::models::person::PersonRef;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePersonLink {
    pub vehicle_id: Uuid,
    pub person_id: Uuid,
    pub person: PersonRef,
}
