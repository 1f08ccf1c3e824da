//! Modelo de Authorized
//!
//! Entrada de la lista de placas autorizadas. Es independiente de los
//! registros de Vehicle y Person.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::validation::Plate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Authorized {
    pub id: Uuid,
    pub plate: String,
    pub name: String,
    pub department: String,
}

/// Vista reducida devuelta por la consulta de placa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedSummary {
    pub plate: String,
    pub name: String,
    pub department: String,
}

impl From<Authorized> for AuthorizedSummary {
    fn from(entry: Authorized) -> Self {
        Self {
            plate: entry.plate,
            name: entry.name,
            department: entry.department,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthorized {
    pub plate: Plate,
    pub name: String,
    pub department: String,
}
