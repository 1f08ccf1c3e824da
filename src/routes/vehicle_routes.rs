use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::VehicleRequest;
use crate::dto::{ApiResponse, OkResponse};
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_id, Valid};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", put(update_vehicle).delete(delete_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let controller = VehicleController::new(&state);
    let vehicles = controller.list().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Valid(vehicle): Valid<VehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let created = controller.create(vehicle).await?;
    Ok(Json(ApiResponse::success(created)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Valid(vehicle): Valid<VehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let id = parse_id(&id)?;
    let controller = VehicleController::new(&state);
    let updated = controller.update(id, vehicle).await?;
    Ok(Json(ApiResponse::success(updated)))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = VehicleController::new(&state);
    controller.delete(id).await?;
    Ok(Json(OkResponse::new()))
}
