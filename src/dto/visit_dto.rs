use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{visit::DEFAULT_PURPOSE, Visit, VisitDetail};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{blank_as_none, parse_date, RequestSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MIN_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 50;
/// Página más alta aceptada; el offset `(page - 1) * page_size` siempre cabe en i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

const RANGE_REQUIRED: &str = "Parâmetros obrigatórios: start e end (YYYY-MM-DD).";

/// Request de check-in
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    pub person_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Motivo muito longo."))]
    pub purpose: Option<String>,
}

/// Check-in validado
#[derive(Debug, Clone, PartialEq)]
pub struct Checkin {
    pub person_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub purpose: String,
}

impl RequestSchema for CheckinRequest {
    type Valid = Checkin;

    fn finish(self) -> AppResult<Checkin> {
        Ok(Checkin {
            person_id: self.person_id,
            vehicle_id: self.vehicle_id,
            purpose: self
                .purpose
                .unwrap_or_else(|| DEFAULT_PURPOSE.to_string()),
        })
    }
}

/// Respuesta `{ ok: true, visit }`
#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub ok: bool,
    pub visit: Visit,
}

impl VisitResponse {
    pub fn new(visit: Visit) -> Self {
        Self { ok: true, visit }
    }
}

/// Query del historial y de su exportación. Los números llegan como texto
/// para que un valor no numérico caiga en el default en vez de rechazar la petición.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Período validado (días completos, inclusivo)
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_label(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl HistoryQuery {
    pub fn range(&self) -> AppResult<DateRange> {
        let parse = |value: &Option<String>| value.as_deref().and_then(parse_date);
        match (parse(&self.start), parse(&self.end)) {
            (Some(start), Some(end)) => Ok(DateRange { start, end }),
            _ => Err(AppError::BadRequest(RANGE_REQUIRED.to_string())),
        }
    }

    /// Página acotada a [1, MAX_PAGE] y tamaño de página acotado a [5, 50]
    pub fn pagination(&self) -> (i64, i64) {
        let number = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<i64>().ok())
        };
        let page = number(&self.page).unwrap_or(1).clamp(1, MAX_PAGE);
        let page_size = number(&self.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        (page, page_size)
    }
}

/// Total de páginas; nunca menor que 1
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    let pages = (total + page_size - 1) / page_size;
    pages.max(1)
}

/// Página del historial
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub ok: bool,
    pub data: Vec<VisitDetail>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl HistoryPage {
    pub fn new(data: Vec<VisitDetail>, page: i64, page_size: i64, total: i64) -> Self {
        Self {
            ok: true,
            data,
            page,
            page_size,
            total,
            total_pages: total_pages(total, page_size),
        }
    }
}
