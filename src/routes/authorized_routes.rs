use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::AuthorizedController;
use crate::dto::authorized_dto::{AuthorizedRequest, AuthorizedResponse};
use crate::dto::{ApiResponse, OkResponse};
use crate::models::Authorized;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_id, Valid};

pub fn create_authorized_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authorized).post(create_authorized))
        .route("/:id", put(update_authorized).delete(delete_authorized))
}

async fn list_authorized(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Authorized>>>, AppError> {
    let controller = AuthorizedController::new(&state);
    let entries = controller.list().await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn create_authorized(
    State(state): State<AppState>,
    Valid(entry): Valid<AuthorizedRequest>,
) -> Result<Json<ApiResponse<AuthorizedResponse>>, AppError> {
    let controller = AuthorizedController::new(&state);
    let response = controller.create(entry).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_authorized(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Valid(entry): Valid<AuthorizedRequest>,
) -> Result<Json<ApiResponse<AuthorizedResponse>>, AppError> {
    let id = parse_id(&id)?;
    let controller = AuthorizedController::new(&state);
    let response = controller.update(id, entry).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn delete_authorized(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = AuthorizedController::new(&state);
    controller.delete(id).await?;
    Ok(Json(OkResponse::new()))
}
