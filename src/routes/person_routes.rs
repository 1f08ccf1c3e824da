use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::PersonController;
use crate::dto::person_dto::{CreatePersonRequest, UpdatePersonRequest};
use crate::dto::{ApiResponse, OkResponse};
use crate::models::Person;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_id, Valid};

pub fn create_person_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_people).post(create_person))
        .route("/:id", put(update_person).delete(delete_person))
}

async fn list_people(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Person>>>, AppError> {
    let controller = PersonController::new(&state);
    let people = controller.list().await?;
    Ok(Json(ApiResponse::success(people)))
}

async fn create_person(
    State(state): State<AppState>,
    Valid(person): Valid<CreatePersonRequest>,
) -> Result<Json<ApiResponse<Person>>, AppError> {
    let controller = PersonController::new(&state);
    let created = controller.create(person).await?;
    Ok(Json(ApiResponse::success(created)))
}

async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Valid(changes): Valid<UpdatePersonRequest>,
) -> Result<Json<ApiResponse<Person>>, AppError> {
    let id = parse_id(&id)?;
    let controller = PersonController::new(&state);
    let updated = controller.update(id, changes).await?;
    Ok(Json(ApiResponse::success(updated)))
}

async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = PersonController::new(&state);
    controller.delete(id).await?;
    Ok(Json(OkResponse::new()))
}
