use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};

use crate::controllers::ExportController;
use crate::dto::visit_dto::HistoryQuery;
use crate::dto::UrlResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_id;

pub fn create_export_router() -> Router<AppState> {
    Router::new()
        .route("/visit/:id", post(export_visit))
        .route("/history", post(export_history))
}

async fn export_visit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = ExportController::new(&state);
    let url = controller.export_visit(id).await?;
    Ok(Json(UrlResponse::new(url)))
}

async fn export_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<UrlResponse>, AppError> {
    let controller = ExportController::new(&state);
    let url = controller.export_history(&query).await?;
    Ok(Json(UrlResponse::new(url)))
}
