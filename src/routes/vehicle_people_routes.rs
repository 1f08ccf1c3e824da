use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::VehiclePeopleController;
use crate::dto::vehicle_person_dto::{VehiclePeopleQuery, VehiclePersonRequest};
use crate::dto::{ApiResponse, OkResponse};
use crate::models::VehiclePersonLink;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::Valid;

pub fn create_vehicle_people_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_links).post(link_person).delete(unlink_person),
    )
}

async fn list_links(
    State(state): State<AppState>,
    Query(query): Query<VehiclePeopleQuery>,
) -> Result<Json<ApiResponse<Vec<VehiclePersonLink>>>, AppError> {
    let vehicle_id = query.vehicle_id()?;
    let controller = VehiclePeopleController::new(&state);
    let links = controller.list(vehicle_id).await?;
    Ok(Json(ApiResponse::success(links)))
}

async fn link_person(
    State(state): State<AppState>,
    Valid(pair): Valid<VehiclePersonRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let controller = VehiclePeopleController::new(&state);
    controller.link(pair).await?;
    Ok(Json(OkResponse::new()))
}

async fn unlink_person(
    State(state): State<AppState>,
    Valid(pair): Valid<VehiclePersonRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let controller = VehiclePeopleController::new(&state);
    controller.unlink(pair).await?;
    Ok(Json(OkResponse::new()))
}
