//! Modelo de Visit y VisitEvent
//!
//! Una visita nace abierta (`checkout_time = NULL`) en el check-in y se cierra
//! una única vez en el check-out. Los eventos son un log de auditoría append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Motivo por defecto de una visita
pub const DEFAULT_PURPOSE: &str = "despacho";

/// Visit principal - mapea a la tabla visits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Visit {
    pub id: Uuid,
    pub company_id: Uuid,
    pub branch_id: Uuid,
    pub person_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub purpose: String,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
}

impl Visit {
    pub fn is_open(&self) -> bool {
        self.checkout_time.is_none()
    }

    pub fn belongs_to(&self, company_id: Uuid, branch_id: Uuid) -> bool {
        self.company_id == company_id && self.branch_id == branch_id
    }
}

/// Datos para abrir una visita
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub company_id: Uuid,
    pub branch_id: Uuid,
    pub person_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub purpose: String,
}

/// Tipo de evento de auditoría
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitEventType {
    Checkin,
    Checkout,
    PdfExported,
    HistoryPdfExported,
}

impl VisitEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitEventType::Checkin => "checkin",
            VisitEventType::Checkout => "checkout",
            VisitEventType::PdfExported => "pdf_exported",
            VisitEventType::HistoryPdfExported => "history_pdf_exported",
        }
    }
}

/// Fila de visit_events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitEvent {
    pub visit_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub event_type: VisitEventType,
    pub meta: serde_json::Value,
}

/// Datos de la persona incluidos en listados de visitas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitPerson {
    pub full_name: String,
    pub doc_number: Option<String>,
}

/// Datos del vehículo incluidos en listados de visitas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitVehicle {
    pub plate: String,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// Visita con persona, vehículo y filial resueltos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitDetail {
    pub id: Uuid,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub purpose: String,
    pub person: Option<VisitPerson>,
    pub vehicle: Option<VisitVehicle>,
    pub branch_name: Option<String>,
}

/// Fila plana producida por el JOIN de visitas; se convierte a `VisitDetail`
#[derive(Debug, Clone, FromRow)]
pub struct VisitDetailRow {
    pub id: Uuid,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub purpose: String,
    pub person_full_name: Option<String>,
    pub person_doc_number: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_color: Option<String>,
    pub branch_name: Option<String>,
}

impl From<VisitDetailRow> for VisitDetail {
    fn from(row: VisitDetailRow) -> Self {
        Self {
            id: row.id,
            checkin_time: row.checkin_time,
            checkout_time: row.checkout_time,
            purpose: row.purpose,
            person: row.person_full_name.map(|full_name| VisitPerson {
                full_name,
                doc_number: row.person_doc_number,
            }),
            vehicle: row.vehicle_plate.map(|plate| VisitVehicle {
                plate,
                model: row.vehicle_model,
                color: row.vehicle_color,
            }),
            branch_name: row.branch_name,
        }
    }
}

/// Entrada del historial corto de un vehículo (consulta por placa)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VisitStamp {
    pub id: Uuid,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
}

/// Filtro de historial: visitas con entrada o salida dentro de `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub offset: i64,
    pub limit: i64,
}

impl HistoryWindow {
    /// Una visita coincide si su entrada o su salida cae en el intervalo
    pub fn matches(&self, checkin: DateTime<Utc>, checkout: Option<DateTime<Utc>>) -> bool {
        let inside = |t: DateTime<Utc>| t >= self.from && t <= self.to;
        inside(checkin) || checkout.map(inside).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_history_window_matches_checkin_or_checkout() {
        let window = HistoryWindow {
            from: at(10, 0),
            to: at(12, 23),
            offset: 0,
            limit: 10,
        };
        assert!(window.matches(at(11, 8), None));
        assert!(window.matches(at(9, 8), Some(at(10, 9))));
        assert!(!window.matches(at(9, 8), None));
        assert!(!window.matches(at(8, 8), Some(at(9, 9))));
        assert!(!window.matches(at(13, 8), Some(at(13, 9))));
    }

    #[test]
    fn test_detail_row_without_joins() {
        let row = VisitDetailRow {
            id: Uuid::new_v4(),
            checkin_time: at(1, 8),
            checkout_time: None,
            purpose: DEFAULT_PURPOSE.to_string(),
            person_full_name: None,
            person_doc_number: None,
            vehicle_plate: Some("ABC1234".into()),
            vehicle_model: None,
            vehicle_color: Some("prata".into()),
            branch_name: None,
        };
        let detail = VisitDetail::from(row);
        assert!(detail.person.is_none());
        assert_eq!(detail.vehicle.unwrap().color.as_deref(), Some("prata"));
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(VisitEventType::Checkin.as_str(), "checkin");
        assert_eq!(
            serde_json::to_value(VisitEventType::HistoryPdfExported).unwrap(),
            "history_pdf_exported"
        );
    }
}
