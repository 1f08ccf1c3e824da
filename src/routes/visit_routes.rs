use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::VisitController;
use crate::dto::visit_dto::{CheckinRequest, HistoryPage, HistoryQuery, VisitResponse};
use crate::dto::ApiResponse;
use crate::models::VisitDetail;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_id, Valid};

pub fn create_visit_router() -> Router<AppState> {
    Router::new()
        .route("/checkin", post(check_in))
        .route("/:id/checkout", post(check_out))
        .route("/open", get(list_open))
        .route("/history", get(history))
}

async fn check_in(
    State(state): State<AppState>,
    Valid(checkin): Valid<CheckinRequest>,
) -> Result<Json<VisitResponse>, AppError> {
    let controller = VisitController::new(&state);
    let visit = controller.check_in(checkin).await?;
    Ok(Json(VisitResponse::new(visit)))
}

async fn check_out(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VisitResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = VisitController::new(&state);
    let visit = controller.check_out(id).await?;
    Ok(Json(VisitResponse::new(visit)))
}

async fn list_open(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VisitDetail>>>, AppError> {
    let controller = VisitController::new(&state);
    let visits = controller.list_open().await?;
    Ok(Json(ApiResponse::success(visits)))
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, AppError> {
    let controller = VisitController::new(&state);
    let page = controller.history(&query).await?;
    Ok(Json(page))
}
