//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! La placa siempre se guarda normalizada.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::validation::Plate;

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// Datos validados de un vehículo (alta o reemplazo completo)
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub plate: Plate,
    pub model: Option<String>,
    pub color: Option<String>,
}
