//! Controladores
//!
//! Lógica de cada recurso de la API. Se construyen por petición a partir de
//! `AppState` y trabajan siempre dentro de la empresa configurada.

use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

pub mod authorized_controller;
pub mod export_controller;
pub mod lookup_controller;
pub mod person_controller;
pub mod vehicle_controller;
pub mod vehicle_people_controller;
pub mod visit_controller;

pub use authorized_controller::AuthorizedController;
pub use export_controller::ExportController;
pub use lookup_controller::LookupController;
pub use person_controller::PersonController;
pub use vehicle_controller::VehicleController;
pub use vehicle_people_controller::VehiclePeopleController;
pub use visit_controller::VisitController;

/// Filial obligatoria para las operaciones de visitas
pub(crate) fn require_branch(branch_id: Option<Uuid>) -> AppResult<Uuid> {
    branch_id.ok_or_else(|| AppError::Config("DEFAULT_BRANCH_ID not configured".to_string()))
}
